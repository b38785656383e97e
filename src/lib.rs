//! QS ranking data pipeline.
//!
//! Runs 4 stages, each reading the previous stage's files:
//!   1. merge       raw/slice/*.json        -> raw/merge/<year>.json
//!   2. filter      raw/merge/<year>.json   -> parsed/<year>.json
//!   3. translate   parsed/<year>.json      -> parsed/<year>_with_chinese.json
//!   4. display     parsed/*_with_chinese   -> display/rank.json

pub mod display;
pub mod error;
pub mod filter;
pub mod http;
pub mod merge;
pub mod record;
pub mod report;
pub mod resolve;
pub mod settings;
pub mod store;
pub mod translate;
pub mod untranslated;

pub use error::{PipelineError, Result};
pub use record::{DisplayItem, RankingRecord};
pub use settings::Settings;
pub use store::DataLayout;
