//! Find records the resolver left without a name.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::record::RankingRecord;
use crate::store::{self, DataLayout};

#[derive(Debug, Default)]
pub struct Untranslated {
    /// year -> titles, in file order
    pub by_year: BTreeMap<String, Vec<String>>,
}

impl Untranslated {
    pub fn total(&self) -> usize {
        self.by_year.values().map(Vec::len).sum()
    }

    /// Titles that failed in more than one year, with those years.
    pub fn repeated(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (year, titles) in &self.by_year {
            for title in titles {
                seen.entry(title.as_str()).or_default().push(year.as_str());
            }
        }
        seen.retain(|_, years| years.len() > 1);
        seen
    }

    pub fn unique_titles(&self) -> BTreeSet<&str> {
        self.by_year
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

pub fn unresolved_titles(records: &[RankingRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.resolved_name().is_none())
        .map(|r| r.title.clone())
        .collect()
}

pub fn scan(layout: &DataLayout) -> Result<Untranslated> {
    let mut found = Untranslated::default();
    for path in store::list_json(&layout.parsed_dir())? {
        let Some(year) = store::translated_year(&path) else {
            continue;
        };
        match store::read_json::<Vec<RankingRecord>>(&path) {
            Ok(records) => {
                found.by_year.insert(year, unresolved_titles(&records));
            }
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }
    Ok(found)
}

pub fn print(found: &Untranslated) {
    for (year, titles) in &found.by_year {
        println!("\n=== {} ===", year);
        if titles.is_empty() {
            println!("All names resolved.");
            continue;
        }
        for (i, title) in titles.iter().enumerate() {
            println!("{:2}. {}", i + 1, title);
        }
        println!("Subtotal: {}", titles.len());
    }

    println!("\n{}", "=".repeat(60));
    println!("Unresolved: {}", found.total());

    let repeated = found.repeated();
    if !repeated.is_empty() {
        println!("\nUnresolved in several years:");
        for (title, years) in repeated {
            println!("  {} ({})", title, years.join(", "));
        }
    }
}

/// Write the de-duplicated, sorted title list; returns how many were written.
pub fn export(layout: &DataLayout, found: &Untranslated) -> Result<usize> {
    let titles = found.unique_titles();
    let mut body = String::from("Unresolved university names\n");
    body.push_str(&"=".repeat(50));
    body.push_str("\n\n");
    for (i, title) in titles.iter().enumerate() {
        body.push_str(&format!("{:2}. {}\n", i + 1, title));
    }

    let path = layout.untranslated_file();
    fs::write(&path, body).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;
    println!("Exported {} names to {:?}", titles.len(), path);
    Ok(titles.len())
}
