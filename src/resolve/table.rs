//! Static English -> Chinese university name table.

use std::collections::HashMap;

use itertools::Itertools;

/// Known names in lookup order. Order matters: fuzzy matching returns the
/// first entry that fits.
pub const UNIVERSITY_NAMES: &[(&str, &str)] = &[
    // United States
    ("Massachusetts Institute of Technology (MIT)", "麻省理工学院"),
    ("Stanford University", "斯坦福大学"),
    ("Harvard University", "哈佛大学"),
    ("California Institute of Technology (Caltech)", "加州理工学院"),
    ("University of Chicago", "芝加哥大学"),
    ("University of Pennsylvania", "宾夕法尼亚大学"),
    ("Yale University", "耶鲁大学"),
    ("Columbia University", "哥伦比亚大学"),
    ("Princeton University", "普林斯顿大学"),
    ("Cornell University", "康奈尔大学"),
    // United Kingdom
    ("University of Oxford", "牛津大学"),
    ("University of Cambridge", "剑桥大学"),
    ("Imperial College London", "帝国理工学院"),
    ("UCL (University College London)", "伦敦大学学院"),
    ("London School of Economics and Political Science (LSE)", "伦敦政治经济学院"),
    ("King's College London", "伦敦国王学院"),
    ("University of Edinburgh", "爱丁堡大学"),
    ("University of Manchester", "曼彻斯特大学"),
    ("University of Warwick", "华威大学"),
    // Mainland China
    ("Tsinghua University", "清华大学"),
    ("Peking University", "北京大学"),
    ("Fudan University", "复旦大学"),
    ("Zhejiang University", "浙江大学"),
    ("Shanghai Jiao Tong University", "上海交通大学"),
    ("University of Science and Technology of China", "中国科学技术大学"),
    ("Nanjing University", "南京大学"),
    ("Sun Yat-sen University", "中山大学"),
    ("Tongji University", "同济大学"),
    ("Wuhan University", "武汉大学"),
    ("Harbin Institute of Technology", "哈尔滨工业大学"),
    ("Beijing Normal University", "北京师范大学"),
    ("Xi'an Jiaotong University", "西安交通大学"),
    ("Xi'an Jiaotong Liverpool University", "西交利物浦大学"),
    ("Huazhong University of Science and Technology", "华中科技大学"),
    ("Tianjin University", "天津大学"),
    ("Nankai University", "南开大学"),
    ("Beijing Institute of Technology", "北京理工大学"),
    ("Beihang University (former BUAA)", "北京航空航天大学"),
    ("Shandong University", "山东大学"),
    ("South China University of Technology", "华南理工大学"),
    ("Xiamen University", "厦门大学"),
    ("University of Science and Technology Beijing", "北京科技大学"),
    ("Shanghai University", "上海大学"),
    ("Sichuan University", "四川大学"),
    ("Southeast University", "东南大学"),
    ("Jilin University", "吉林大学"),
    ("Central South University", "中南大学"),
    ("China University of Geosciences", "中国地质大学"),
    ("East China Normal University", "华东师范大学"),
    ("Northwestern Polytechnical University", "西北工业大学"),
    ("Dalian University of Technology", "大连理工大学"),
    ("East China University of Science and Technology", "华东理工大学"),
    ("Hunan University", "湖南大学"),
    ("University of Electronic Science and Technology of China", "电子科技大学"),
    ("China Agricultural University", "中国农业大学"),
    ("Nanjing University of Science and Technology", "南京理工大学"),
    ("Renmin (People's) University of China", "中国人民大学"),
    ("Shenzhen University", "深圳大学"),
    ("Soochow University", "苏州大学"),
    ("Chongqing University", "重庆大学"),
    ("Beijing University of Technology", "北京工业大学"),
    ("Jinan University (China)", "暨南大学"),
    ("Lanzhou University", "兰州大学"),
    ("Northwest University (China)", "西北大学"),
    ("Beijing Foreign Studies University", "北京外国语大学"),
    ("Beijing Jiaotong University", "北京交通大学"),
    ("Beijing University of Chinese Medicine", "北京中医药大学"),
    ("Beijing University of Posts and Telecommunications", "北京邮电大学"),
    ("Harbin Engineering University", "哈尔滨工程大学"),
    ("Nanjing University of Aeronautics and Astronautics", "南京航空航天大学"),
    ("Wuhan University of Technology", "武汉理工大学"),
    ("China University of Political Science and Law", "中国政法大学"),
    ("Shanghai International Studies University", "上海外国语大学"),
    ("University of International Business and Economics", "对外经济贸易大学"),
    ("Shanghai University of Finance and Economics", "上海财经大学"),
    ("Southwest University", "西南大学"),
    ("Southern University of Science and Technology (SUSTech)", "南方科技大学"),
    ("Asia University Taiwan", "台湾亚洲大学"),
    ("Beijing University of Chemical Technology", "北京化工大学"),
    ("Chaoyang University of Technology", "台湾朝阳科技大学"),
    ("China University of Mining and Technology", "中国矿业大学"),
    ("China University of Petroleum, Beijing", "中国石油大学（北京）"),
    ("Donghua University", "东华大学"),
    ("Hohai University", "河海大学"),
    ("Huazhong Agricultural University", "华中农业大学"),
    ("Jiangnan University", "江南大学"),
    ("Kaohsiung Medical University", "台湾高雄医学大学"),
    ("Nanjing Agricultural University", "南京农业大学"),
    ("Nanjing Normal University", "南京师范大学"),
    ("National Chiao Tung University", "台湾国立交通大学"),
    ("National Yang Ming University", "台湾国立阳明大学"),
    ("Northwest Agriculture and Forestry University", "西北农林科技大学"),
    ("Ocean University of China", "中国海洋大学"),
    ("Shanghai Normal University", "上海师范大学"),
    ("Zhengzhou University", "郑州大学"),
    // Hong Kong
    ("The University of Hong Kong", "香港大学"),
    ("The Hong Kong University of Science and Technology", "香港科技大学"),
    ("The Chinese University of Hong Kong (CUHK)", "香港中文大学"),
    ("City University of Hong Kong (CityUHK)", "香港城市大学"),
    ("The Hong Kong Polytechnic University", "香港理工大学"),
    ("Hong Kong Baptist University", "香港浸会大学"),
    ("Lingnan University, Hong Kong", "香港岭南大学"),
    // Taiwan
    ("National Taiwan University (NTU)", "国立台湾大学"),
    ("National Tsing Hua University - NTHU", "国立清华大学"),
    ("National Cheng Kung University (NCKU)", "国立成功大学"),
    ("National Yang Ming Chiao Tung University (NYCU)", "国立阳明交通大学"),
    ("National Taiwan University of Science and Technology (Taiwan Tech)", "国立台湾科技大学"),
    ("National Taiwan Normal University (NTNU)", "国立台湾师范大学"),
    ("Taipei Medical University (TMU)", "台北医学大学"),
    ("National Sun Yat-sen University", "国立中山大学"),
    ("National Taipei University of Technology", "国立台北科技大学"),
    ("Chang Gung University", "长庚大学"),
    ("National Central University", "国立中央大学"),
    ("National Chengchi University", "国立政治大学"),
    ("National Chung Hsing University", "国立中兴大学"),
    ("National Chung Cheng University", "国立中正大学"),
    ("Chang Jung Christian University", "长荣大学"),
    ("Chung Yuan Christian University", "中原大学"),
    ("Feng Chia University", "逢甲大学"),
    ("Fu Jen Catholic University", "辅仁大学"),
    ("National Dong Hwa University", "国立东华大学"),
    ("National Taiwan Ocean University", "国立台湾海洋大学"),
    ("Yuan Ze University", "元智大学"),
    ("National Taipei University", "国立台北大学"),
    ("Soochow University (Taiwan)", "东吴大学"),
    ("Tamkang University", "淡江大学"),
    ("Tunghai University", "东海大学"),
    // Macau
    ("University of Macau", "澳门大学"),
    ("Macau University of Science and Technology", "澳门科技大学"),
    // Elsewhere
    ("University of Tokyo", "东京大学"),
    ("Kyoto University", "京都大学"),
    ("Seoul National University", "首尔国立大学"),
    ("National University of Singapore (NUS)", "新加坡国立大学"),
    ("Nanyang Technological University, Singapore (NTU)", "南洋理工大学"),
    ("University of Melbourne", "墨尔本大学"),
    ("Australian National University (ANU)", "澳大利亚国立大学"),
    ("University of Sydney", "悉尼大学"),
    ("University of Toronto", "多伦多大学"),
    ("McGill University", "麦吉尔大学"),
];

/// Unify typographic apostrophes and collapse whitespace runs.
pub fn normalize(name: &str) -> String {
    name.replace(['\u{2018}', '\u{2019}'], "'")
        .split_whitespace()
        .join(" ")
}

/// Drop a parenthesized suffix: "Jinan University (China)" -> "Jinan University".
pub fn strip_qualifier(name: &str) -> &str {
    name.split('(').next().unwrap_or_default().trim()
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    stripped: String,
    name: String,
}

/// Name table keyed by normalized English name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl MappingTable {
    pub fn builtin() -> Self {
        Self::from_pairs(UNIVERSITY_NAMES.iter().copied())
    }

    /// Keys that normalize to the same text collapse into one entry at the
    /// first position; the later value wins.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = MappingTable::default();
        for (english, localized) in pairs {
            let key = normalize(english);
            match table.index.get(&key) {
                Some(&i) => table.entries[i].name = localized.to_string(),
                None => {
                    table.index.insert(key.clone(), table.entries.len());
                    table.entries.push(Entry {
                        stripped: strip_qualifier(&key).to_string(),
                        key,
                        name: localized.to_string(),
                    });
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Equality on the normalized key.
    pub fn exact(&self, normalized: &str) -> Option<&str> {
        self.index
            .get(normalized)
            .map(|&i| self.entries[i].name.as_str())
    }

    /// First entry whose stripped key equals the stripped input, or whose
    /// full key contains it (prefix matches included).
    pub fn fuzzy(&self, normalized: &str) -> Option<&str> {
        let wanted = strip_qualifier(normalized);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.stripped == wanted || e.key.contains(wanted))
            .map(|e| e.name.as_str())
    }
}
