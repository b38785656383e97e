//! Stage 4: project resolved records into the display list.
//!
//! name  = title_zh (records without one are dropped)
//! value = overall_score, rank = rank, date = year, logo = logo
//! sorted by (date, rank_key)

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::Result;
use crate::record::{DisplayItem, RankingRecord};
use crate::store::{self, DataLayout};

/// Sort key for records without a usable rank.
pub const UNRANKED: u32 = 9999;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayStats {
    pub files: usize,
    pub failed: usize,
    pub items: usize,
    pub dropped: usize,
    pub per_year: BTreeMap<String, usize>,
}

impl DisplayStats {
    pub fn print(&self) {
        println!(
            "Wrote {} display items from {} files ({} without a name, {} failed).",
            self.items, self.files, self.dropped, self.failed
        );
        for (year, n) in &self.per_year {
            println!("  {}: {}", year, n);
        }
    }
}

/// "87" -> 87, "501-510" -> 501, anything else -> UNRANKED.
pub fn rank_key(rank: &str) -> u32 {
    if !rank.is_empty() && rank.chars().all(|c| c.is_ascii_digit()) {
        return rank.parse().unwrap_or(UNRANKED);
    }
    match rank.split_once('-') {
        Some((start, _)) => start.trim().parse().unwrap_or(UNRANKED),
        None => UNRANKED,
    }
}

/// Display items for one year's resolved records.
pub fn project(year: &str, records: &[RankingRecord]) -> Vec<DisplayItem> {
    records
        .iter()
        .filter_map(|r| {
            let name = r.resolved_name()?;
            Some(DisplayItem {
                name: name.to_string(),
                value: r.overall_score.clone().unwrap_or_default(),
                rank: r.rank.clone().unwrap_or_default(),
                date: year.to_string(),
                logo: r.logo.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Stable sort by year (string order; years share a width) then rank key.
pub fn sort_items(items: &mut [DisplayItem]) {
    items.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| rank_key(&a.rank).cmp(&rank_key(&b.rank)))
    });
}

pub fn run(layout: &DataLayout) -> Result<DisplayStats> {
    let files: Vec<_> = store::list_json(&layout.parsed_dir())?
        .into_iter()
        .filter_map(|p| store::translated_year(&p).map(|year| (year, p)))
        .collect();
    let mut stats = DisplayStats::default();
    if files.is_empty() {
        println!("No translated files in {:?}. Run 'translate' first.", layout.parsed_dir());
        return Ok(stats);
    }

    let mut items = Vec::new();

    for (year, path) in files {
        stats.files += 1;
        let records: Vec<RankingRecord> = match store::read_json(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                stats.failed += 1;
                continue;
            }
        };
        let projected = project(&year, &records);
        stats.dropped += records.len() - projected.len();
        stats.per_year.insert(year, projected.len());
        items.extend(projected);
    }

    // Keep the previous rank.json when nothing could be read.
    if stats.failed == stats.files {
        warn!("No readable translated files; {:?} left unchanged", layout.rank_file());
        return Ok(stats);
    }

    sort_items(&mut items);
    stats.items = items.len();
    store::write_json(&layout.rank_file(), &items)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(title: &str, name: Option<&str>, rank: &str) -> RankingRecord {
        let mut r = RankingRecord::new(title, "Taiwan");
        r.rank = Some(rank.to_string());
        r.overall_score = Some("50.1".into());
        r.set_resolution(name.map(str::to_string));
        r
    }

    #[test]
    fn rank_keys() {
        assert_eq!(rank_key("87"), 87);
        assert_eq!(rank_key("501-510"), 501);
        assert_eq!(rank_key(""), UNRANKED);
        assert_eq!(rank_key("N/A"), UNRANKED);
        assert_eq!(rank_key("=12"), UNRANKED);
        assert_eq!(rank_key("abc-def"), UNRANKED);
        assert_eq!(rank_key("1201-1400"), 1201);
    }

    #[test]
    fn unresolved_records_are_dropped() {
        let mut unprocessed = RankingRecord::new("Never Seen", "Taiwan");
        unprocessed.rank = Some("3".into());
        let records = vec![
            resolved("A", Some("甲"), "10"),
            resolved("B", None, "5"),
            resolved("C", Some(""), "7"),
            unprocessed,
        ];
        let items = project("2023", &records);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "甲");
        assert_eq!(items[0].date, "2023");
        assert_eq!(items[0].logo, "");
    }

    #[test]
    fn sorted_by_year_then_rank() {
        let mut items = project(
            "2024",
            &[
                resolved("A", Some("甲"), ""),
                resolved("B", Some("乙"), "501-510"),
                resolved("C", Some("丙"), "87"),
            ],
        );
        items.extend(project("2023", &[resolved("D", Some("丁"), "900")]));
        sort_items(&mut items);

        let order: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i.date.as_str(), i.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("2023", "丁"), ("2024", "丙"), ("2024", "乙"), ("2024", "甲")]
        );
    }

    fn existing_rank_file(layout: &DataLayout) {
        let item = DisplayItem {
            name: "清华大学".into(),
            value: "83.4".into(),
            rank: "17".into(),
            date: "2022".into(),
            logo: String::new(),
        };
        store::write_json(&layout.rank_file(), &vec![item]).unwrap();
    }

    #[test]
    fn empty_parsed_dir_leaves_rank_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        existing_rank_file(&layout);
        std::fs::create_dir_all(layout.parsed_dir()).unwrap();

        let stats = run(&layout).unwrap();
        assert_eq!(stats.files, 0);
        let kept: Vec<DisplayItem> = store::read_json(&layout.rank_file()).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn unreadable_inputs_leave_rank_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        existing_rank_file(&layout);
        std::fs::create_dir_all(layout.parsed_dir()).unwrap();
        std::fs::write(layout.translated_file("2023"), "[ broken").unwrap();

        let stats = run(&layout).unwrap();
        assert_eq!(stats.failed, 1);
        let kept: Vec<DisplayItem> = store::read_json(&layout.rank_file()).unwrap();
        assert_eq!(kept[0].name, "清华大学");
    }
}
