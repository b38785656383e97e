//! Stage 2: keep only Greater China universities.
//!
//! country must equal one of DOMESTIC_REGIONS exactly (case-sensitive)
//! records without a country are dropped

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::Result;
use crate::record::RankingRecord;
use crate::store::{self, DataLayout};

pub const DOMESTIC_REGIONS: [&str; 4] = ["China (Mainland)", "Hong Kong SAR", "Macau SAR", "Taiwan"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStats {
    pub files: usize,
    pub failed: usize,
    pub input: usize,
    pub kept: usize,
}

impl FilterStats {
    pub fn print(&self) {
        println!(
            "Kept {} of {} records across {} files ({} failed).",
            self.kept, self.input, self.files, self.failed
        );
    }
}

pub fn is_domestic(record: &RankingRecord) -> bool {
    record
        .country
        .as_deref()
        .is_some_and(|c| DOMESTIC_REGIONS.contains(&c))
}

/// Stable filter over one year's records.
pub fn retain_domestic(records: Vec<RankingRecord>) -> Vec<RankingRecord> {
    records.into_iter().filter(is_domestic).collect()
}

/// Region -> record count, for the per-file summary.
pub fn region_counts(records: &[RankingRecord]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        let region = r.country.as_deref().unwrap_or("Unknown");
        *counts.entry(region).or_insert(0) += 1;
    }
    counts
}

pub fn run(layout: &DataLayout) -> Result<FilterStats> {
    let files = store::list_json(&layout.merge_dir())?;
    let mut stats = FilterStats::default();

    for path in files {
        stats.files += 1;
        let records: Vec<RankingRecord> = match store::read_json(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                stats.failed += 1;
                continue;
            }
        };

        let input = records.len();
        let domestic = retain_domestic(records);
        let Some(name) = path.file_name() else {
            continue;
        };
        let out = layout.parsed_dir().join(name);
        if let Err(e) = store::write_json(&out, &domestic) {
            warn!("Could not write {:?}: {}", out, e);
            stats.failed += 1;
            continue;
        }

        println!("  {:?}: {} -> {} domestic", name, input, domestic.len());
        for (region, n) in region_counts(&domestic) {
            println!("    {:<18} {}", region, n);
        }

        stats.input += input;
        stats.kept += domestic.len();
    }

    Ok(stats)
}
