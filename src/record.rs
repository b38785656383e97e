use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One university's entry for one ranking year.
///
/// Fields the pipeline does not look at are kept in `extra` so every stage
/// writes back what it read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub overall_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// `None` = not processed yet, `Some(None)` = unresolved (written as null).
    #[serde(
        default,
        deserialize_with = "present_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub title_zh: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RankingRecord {
    pub fn new(title: &str, country: &str) -> Self {
        RankingRecord {
            title: title.to_string(),
            country: Some(country.to_string()),
            ..Default::default()
        }
    }

    /// Localized name, if a non-empty one has been attached.
    pub fn resolved_name(&self) -> Option<&str> {
        match &self.title_zh {
            Some(Some(name)) if !name.is_empty() => Some(name.as_str()),
            _ => None,
        }
    }

    /// Attach the resolver's outcome; empty strings are stored as null.
    pub fn set_resolution(&mut self, name: Option<String>) {
        self.title_zh = Some(name.filter(|n| !n.is_empty()));
    }
}

/// One scraped page of ranking results.
#[derive(Debug, Deserialize)]
pub struct Fragment {
    pub score_nodes: Option<Vec<RankingRecord>>,
}

/// The projected shape consumed by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub name: String,
    pub value: String,
    pub rank: String,
    pub date: String,
    pub logo: String,
}

/// Scraped scores and ranks show up as both strings and bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
