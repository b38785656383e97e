//! Stage 1: merge scraped fragments into one list per ranking year.
//!
//! year = leading four digits of the fragment's file stem ("2022-500.json" -> "2022")
//! records = the fragment's `score_nodes`, appended in file order

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::record::{Fragment, RankingRecord};
use crate::store::{self, DataLayout};

pub type YearBuckets = BTreeMap<String, Vec<RankingRecord>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub files: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Year files that could not be written.
    pub write_failed: usize,
    pub years: usize,
    pub records: usize,
}

impl MergeStats {
    pub fn print(&self) {
        println!(
            "Merged {} records into {} years ({} files, {} skipped, {} failed, {} not written).",
            self.records, self.years, self.files, self.skipped, self.failed, self.write_failed
        );
    }
}

pub fn run(layout: &DataLayout) -> Result<MergeStats> {
    let files = store::list_json(&layout.slice_dir())?;
    let (buckets, mut stats) = collect(&files);

    for (year, records) in &buckets {
        let out = layout.merge_dir().join(format!("{}.json", year));
        if let Err(e) = store::write_json(&out, records) {
            warn!("Could not write {}: {}", year, e);
            stats.write_failed += 1;
            continue;
        }
        println!("  {} -> {} records ({:?})", year, records.len(), out);
    }

    stats.years = buckets.len() - stats.write_failed;
    stats.records = buckets.values().map(Vec::len).sum();
    Ok(stats)
}

/// Group fragment files into year buckets. Bad files are logged and skipped.
pub fn collect(files: &[impl AsRef<Path>]) -> (YearBuckets, MergeStats) {
    let mut buckets = YearBuckets::new();
    let mut stats = MergeStats::default();

    for path in files {
        let path = path.as_ref();
        stats.files += 1;

        let Some(year) = year_prefix(path) else {
            warn!("No year prefix in {:?}, skipping", path);
            stats.skipped += 1;
            continue;
        };

        match read_fragment(path) {
            Ok(nodes) => {
                info!("{:?}: {} records for {}", path, nodes.len(), year);
                buckets.entry(year).or_default().extend(nodes);
            }
            Err(e) => {
                warn!("Skipping fragment: {}", e);
                stats.failed += 1;
            }
        }
    }

    (buckets, stats)
}

pub fn read_fragment(path: &Path) -> Result<Vec<RankingRecord>> {
    let fragment: Fragment = store::read_json(path)?;
    fragment.score_nodes.ok_or_else(|| PipelineError::MissingKey {
        path: path.to_path_buf(),
        key: "score_nodes",
    })
}

/// Leading four-digit year of the file stem.
pub fn year_prefix(path: &Path) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\d{4})").unwrap());
    let stem = path.file_stem()?.to_str()?;
    re.captures(stem).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fragment(titles: &[&str]) -> String {
        let nodes: Vec<_> = titles
            .iter()
            .map(|t| serde_json::json!({ "title": t, "country": "Taiwan" }))
            .collect();
        serde_json::json!({ "score_nodes": nodes, "page": 1 }).to_string()
    }

    #[test]
    fn year_from_stem() {
        assert_eq!(year_prefix(Path::new("slice/2022-500.json")), Some("2022".into()));
        assert_eq!(year_prefix(Path::new("slice/2024.json")), Some("2024".into()));
        assert_eq!(year_prefix(Path::new("slice/page-2022.json")), None);
        assert_eq!(year_prefix(Path::new("slice/202.json")), None);
    }

    #[test]
    fn bucket_length_is_sum_of_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("2022-1.json");
        let b = dir.path().join("2022-2.json");
        let c = dir.path().join("2023-1.json");
        let bad = dir.path().join("latest.json");
        fs::write(&a, fragment(&["A", "B"])).unwrap();
        fs::write(&b, fragment(&["C", "D", "E"])).unwrap();
        fs::write(&c, fragment(&["F"])).unwrap();
        fs::write(&bad, fragment(&["G"])).unwrap();

        let (buckets, stats) = collect(&[a, b, c, bad]);
        assert_eq!(buckets["2022"].len(), 5);
        assert_eq!(buckets["2023"].len(), 1);
        assert_eq!(buckets.len(), 2);
        assert_eq!(stats.skipped, 1);

        let mut titles: Vec<&str> = buckets["2022"].iter().map(|r| r.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
        assert!(buckets.values().flatten().all(|r| r.title != "G"));
    }

    #[test]
    fn malformed_fragments_do_not_stop_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("2022-1.json");
        let no_key = dir.path().join("2022-2.json");
        let good = dir.path().join("2022-3.json");
        fs::write(&broken, "{ not json").unwrap();
        fs::write(&no_key, r#"{"nodes": []}"#).unwrap();
        fs::write(&good, fragment(&["A"])).unwrap();

        let (buckets, stats) = collect(&[broken, no_key, good]);
        assert_eq!(stats.failed, 2);
        assert_eq!(buckets["2022"].len(), 1);
    }

    #[test]
    fn unwritable_year_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        fs::create_dir_all(layout.slice_dir()).unwrap();
        fs::write(layout.slice_dir().join("2022-1.json"), fragment(&["A"])).unwrap();
        fs::write(layout.slice_dir().join("2023-1.json"), fragment(&["B"])).unwrap();
        // A directory where the 2022 output file should go.
        fs::create_dir_all(layout.merge_dir().join("2022.json")).unwrap();

        let stats = run(&layout).unwrap();
        assert_eq!(stats.write_failed, 1);
        assert_eq!(stats.years, 1);
        let written: Vec<RankingRecord> =
            store::read_json(&layout.merge_dir().join("2023.json")).unwrap();
        assert_eq!(written.len(), 1);
    }
}
