//! Read-only summaries of `display/rank.json`.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::display::rank_key;
use crate::error::Result;
use crate::record::DisplayItem;
use crate::store::{self, DataLayout};

const LOGO_WIDTH: usize = 50;
const TOP_N: usize = 10;

pub struct Preview {
    pub latest_year: String,
    pub top: Vec<DisplayItem>,
    pub total: usize,
    pub scored: usize,
    pub not_available: usize,
}

pub struct Analysis {
    pub per_year: BTreeMap<String, usize>,
    pub total: usize,
    pub with_score: usize,
    pub with_logo: usize,
    pub latest_year: String,
    pub top: Vec<DisplayItem>,
}

fn has_real_score(item: &DisplayItem) -> bool {
    !item.value.is_empty() && item.value != "n/a"
}

fn latest_year(items: &[DisplayItem]) -> Option<String> {
    items.iter().map(|i| i.date.clone()).max()
}

/// First `limit` scored items of the latest year, by rank.
pub fn preview(items: &[DisplayItem], limit: usize) -> Option<Preview> {
    let latest = latest_year(items)?;
    let top = items
        .iter()
        .filter(|i| i.date == latest && has_real_score(i))
        .sorted_by_key(|i| rank_key(&i.rank))
        .take(limit)
        .cloned()
        .collect();

    Some(Preview {
        latest_year: latest,
        top,
        total: items.len(),
        scored: items.iter().filter(|i| has_real_score(i)).count(),
        not_available: items.iter().filter(|i| i.value == "n/a").count(),
    })
}

pub fn analyze(items: &[DisplayItem]) -> Option<Analysis> {
    let latest = latest_year(items)?;
    let per_year = items
        .iter()
        .map(|i| i.date.clone())
        .counts()
        .into_iter()
        .collect();
    let top = items
        .iter()
        .filter(|i| i.date == latest)
        .sorted_by_key(|i| rank_key(&i.rank))
        .take(TOP_N)
        .cloned()
        .collect();

    Some(Analysis {
        per_year,
        total: items.len(),
        with_score: items.iter().filter(|i| !i.value.is_empty()).count(),
        with_logo: items.iter().filter(|i| !i.logo.is_empty()).count(),
        latest_year: latest,
        top,
    })
}

pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn load(layout: &DataLayout) -> Result<Option<Vec<DisplayItem>>> {
    let path = layout.rank_file();
    if !path.exists() {
        println!("{:?} not found. Run 'display' first.", path);
        return Ok(None);
    }
    store::read_json(&path).map(Some)
}

pub fn print_preview(layout: &DataLayout, limit: usize) -> Result<()> {
    let Some(items) = load(layout)? else {
        return Ok(());
    };
    let Some(p) = preview(&items, limit) else {
        println!("Display list is empty.");
        return Ok(());
    };

    println!("Top {} scored universities for {}", limit, p.latest_year);
    println!("{}", "=".repeat(60));
    for (i, item) in p.top.iter().enumerate() {
        println!("{}. {} ({})", i + 1, item.name, item.date);
        println!("   Rank:  {}", item.rank);
        println!("   Score: {}", item.value);
        println!("   Logo:  {}", truncate(&item.logo, LOGO_WIDTH));
        println!();
    }
    println!("Total:      {}", p.total);
    println!("With score: {}", p.scored);
    println!("Score n/a:  {}", p.not_available);
    Ok(())
}

pub fn print_analysis(layout: &DataLayout) -> Result<()> {
    let Some(items) = load(layout)? else {
        return Ok(());
    };
    let Some(a) = analyze(&items) else {
        println!("Display list is empty.");
        return Ok(());
    };

    println!("Display data report");
    println!("{}", "=".repeat(50));
    println!("Per year:");
    for (year, n) in &a.per_year {
        println!("  {}: {}", year, n);
    }
    println!(
        "\nWith score: {} / {} ({:.1}%)",
        a.with_score,
        a.total,
        percent(a.with_score, a.total)
    );
    println!(
        "With logo:  {} / {} ({:.1}%)",
        a.with_logo,
        a.total,
        percent(a.with_logo, a.total)
    );
    println!("\nTop {} in {}:", TOP_N, a.latest_year);
    for item in &a.top {
        println!("  {:>9}. {}", item.rank, item.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, date: &str, rank: &str, value: &str, logo: &str) -> DisplayItem {
        DisplayItem {
            name: name.into(),
            value: value.into(),
            rank: rank.into(),
            date: date.into(),
            logo: logo.into(),
        }
    }

    fn sample() -> Vec<DisplayItem> {
        vec![
            item("丁", "2023", "20", "70.0", "L"),
            item("甲", "2024", "30", "60.1", ""),
            item("乙", "2024", "5", "n/a", "L"),
            item("丙", "2024", "12", "80.2", "L"),
            item("戊", "2024", "", "", ""),
        ]
    }

    #[test]
    fn preview_takes_latest_scored_by_rank() {
        let p = preview(&sample(), 5).unwrap();
        assert_eq!(p.latest_year, "2024");
        let names: Vec<&str> = p.top.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["丙", "甲"]);
        assert_eq!(p.total, 5);
        assert_eq!(p.scored, 3);
        assert_eq!(p.not_available, 1);

        assert_eq!(preview(&sample(), 1).unwrap().top.len(), 1);
    }

    #[test]
    fn analysis_counts() {
        let a = analyze(&sample()).unwrap();
        assert_eq!(a.per_year["2023"], 1);
        assert_eq!(a.per_year["2024"], 4);
        assert_eq!(a.with_score, 4);
        assert_eq!(a.with_logo, 3);
        let names: Vec<&str> = a.top.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["乙", "丙", "甲", "戊"]);
    }

    #[test]
    fn empty_list_has_no_report() {
        assert!(preview(&[], 5).is_none());
        assert!(analyze(&[]).is_none());
    }

    #[test]
    fn truncates_long_logos() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(1, 0), 0.0);
    }
}
