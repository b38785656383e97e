//! Stage 3: attach `title_zh` to every domestic record.
//!
//! reads  parsed/<year>.json
//! writes parsed/<year>_with_chinese.json

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::error::Result;
use crate::record::RankingRecord;
use crate::resolve::ResolverChain;
use crate::store::{self, DataLayout, TRANSLATED_SUFFIX};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveStats {
    pub files: usize,
    /// Files that could not be read or written.
    pub failed: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Already carried a name from an earlier run.
    pub kept: usize,
}

impl ResolveStats {
    pub fn add(&mut self, other: &ResolveStats) {
        self.files += other.files;
        self.failed += other.failed;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.kept += other.kept;
    }

    pub fn print(&self) {
        println!(
            "Resolved {} names ({} kept from earlier runs), {} unresolved, across {} files ({} failed).",
            self.resolved, self.kept, self.unresolved, self.files, self.failed
        );
    }
}

/// Resolve every record in place. Never fails; misses become `null`.
pub fn resolve_records(
    chain: &mut ResolverChain,
    records: &mut [RankingRecord],
    pb: &ProgressBar,
) -> ResolveStats {
    let mut stats = ResolveStats::default();

    for (i, record) in records.iter_mut().enumerate() {
        pb.inc(1);

        if let Some(name) = record.resolved_name() {
            pb.println(format!("{:3}. {} -> {} [kept]", i + 1, record.title, name));
            stats.kept += 1;
            continue;
        }

        if record.title.trim().is_empty() {
            warn!("Record {} has no title", i + 1);
            record.set_resolution(None);
            stats.unresolved += 1;
            continue;
        }

        match chain.resolve(&record.title) {
            Some(hit) => {
                pb.println(format!(
                    "{:3}. {} -> {} [{}]",
                    i + 1,
                    record.title,
                    hit.name,
                    hit.tier
                ));
                record.set_resolution(Some(hit.name));
                stats.resolved += 1;
            }
            None => {
                pb.println(format!("{:3}. {} -> null", i + 1, record.title));
                record.set_resolution(None);
                stats.unresolved += 1;
            }
        }
    }

    stats
}

pub fn run(layout: &DataLayout, chain: &mut ResolverChain) -> Result<ResolveStats> {
    let files: Vec<_> = store::list_json(&layout.parsed_dir())?
        .into_iter()
        .filter(|p| store::translated_year(p).is_none())
        .collect();
    let mut total = ResolveStats::default();

    for path in files {
        let Some(year) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        total.files += 1;
        let mut records: Vec<RankingRecord> = match store::read_json(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                total.failed += 1;
                continue;
            }
        };

        // Pick up names from an earlier run so only the misses hit the network again.
        let out = layout.translated_file(&year);
        if out.exists() {
            carry_over(&mut records, &out);
        }

        println!("{}: {} records", year, records.len());
        let pb = ProgressBar::new(records.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        let stats = resolve_records(chain, &mut records, &pb);
        pb.finish_and_clear();

        if let Err(e) = store::write_json(&out, &records) {
            warn!("Could not write {:?}: {}", out, e);
            total.failed += 1;
            continue;
        }
        println!(
            "  -> {}{}.json ({} resolved, {} kept, {} unresolved)",
            year, TRANSLATED_SUFFIX, stats.resolved, stats.kept, stats.unresolved
        );
        total.add(&stats);
    }

    Ok(total)
}

/// Copy non-empty names from a previous output onto records with the same title.
fn carry_over(records: &mut [RankingRecord], previous: &std::path::Path) {
    let earlier: Vec<RankingRecord> = match store::read_json(previous) {
        Ok(r) => r,
        Err(e) => {
            warn!("Ignoring previous output {:?}: {}", previous, e);
            return;
        }
    };
    for record in records.iter_mut().filter(|r| r.title_zh.is_none()) {
        let name = earlier
            .iter()
            .find(|e| e.title == record.title)
            .and_then(|e| e.resolved_name());
        if let Some(name) = name {
            record.set_resolution(Some(name.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::table::MappingTable;

    fn rec(title: &str) -> RankingRecord {
        RankingRecord::new(title, "China (Mainland)")
    }

    #[test]
    fn resolves_and_marks_misses_as_null() {
        let mut chain = ResolverChain::local(MappingTable::builtin());
        let mut records = vec![rec("Peking University"), rec("Atlantis Institute"), rec("")];
        let stats = resolve_records(&mut chain, &mut records, &ProgressBar::hidden());

        assert_eq!(records[0].title_zh, Some(Some("北京大学".to_string())));
        assert_eq!(records[1].title_zh, Some(None));
        assert_eq!(records[2].title_zh, Some(None));
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.unresolved, 2);
        assert_eq!(stats.kept, 0);
    }

    #[test]
    fn already_resolved_records_are_untouched() {
        let mut chain = ResolverChain::local(MappingTable::builtin());
        let mut records = vec![rec("Peking University")];
        records[0].set_resolution(Some("北大".into()));

        let stats = resolve_records(&mut chain, &mut records, &ProgressBar::hidden());
        assert_eq!(records[0].resolved_name(), Some("北大"));
        assert_eq!(stats.kept, 1);

        let before = records.clone();
        resolve_records(&mut chain, &mut records, &ProgressBar::hidden());
        assert_eq!(records, before);
    }

    #[test]
    fn rerun_keeps_earlier_names() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let mut earlier = rec("Atlantis Institute");
        earlier.set_resolution(Some("亚特兰蒂斯学院".into()));
        store::write_json(&layout.translated_file("2022"), &vec![earlier]).unwrap();
        store::write_json(
            &layout.parsed_dir().join("2022.json"),
            &vec![rec("Atlantis Institute"), rec("Peking University")],
        )
        .unwrap();

        let mut chain = ResolverChain::local(MappingTable::builtin());
        let stats = run(&layout, &mut chain).unwrap();
        assert_eq!(
            stats,
            ResolveStats { files: 1, failed: 0, resolved: 1, unresolved: 0, kept: 1 }
        );

        let out: Vec<RankingRecord> = store::read_json(&layout.translated_file("2022")).unwrap();
        assert_eq!(out[0].resolved_name(), Some("亚特兰蒂斯学院"));
        assert_eq!(out[1].resolved_name(), Some("北京大学"));
    }

    #[test]
    fn bad_files_are_counted_and_the_rest_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let parsed = layout.parsed_dir();
        store::write_json(&parsed.join("2021.json"), &vec![rec("Peking University")]).unwrap();
        store::write_json(&parsed.join("2022.json"), &vec![rec("Peking University")]).unwrap();
        store::write_json(&parsed.join("2023.json"), &vec![rec("Fudan University")]).unwrap();
        std::fs::write(parsed.join("2021.json"), "{ not json").unwrap();
        // A directory where the 2022 output file should go.
        std::fs::create_dir_all(layout.translated_file("2022")).unwrap();

        let mut chain = ResolverChain::local(MappingTable::builtin());
        let stats = run(&layout, &mut chain).unwrap();
        assert_eq!(stats.files, 3);
        assert_eq!(stats.failed, 2);

        let out: Vec<RankingRecord> = store::read_json(&layout.translated_file("2023")).unwrap();
        assert_eq!(out[0].resolved_name(), Some("复旦大学"));
    }
}
