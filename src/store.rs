//! On-disk layout shared by every stage, plus JSON read/write helpers.
//!
//! ```text
//! <data_dir>/raw/slice/*.json               scraped fragments
//! <data_dir>/raw/merge/<year>.json          merged per year
//! <data_dir>/parsed/<year>.json             domestic only
//! <data_dir>/parsed/<year>_with_chinese.json
//! <data_dir>/display/rank.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, Result};

pub const TRANSLATED_SUFFIX: &str = "_with_chinese";

#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slice_dir(&self) -> PathBuf {
        self.root.join("raw").join("slice")
    }

    pub fn merge_dir(&self) -> PathBuf {
        self.root.join("raw").join("merge")
    }

    pub fn parsed_dir(&self) -> PathBuf {
        self.root.join("parsed")
    }

    pub fn display_dir(&self) -> PathBuf {
        self.root.join("display")
    }

    pub fn rank_file(&self) -> PathBuf {
        self.display_dir().join("rank.json")
    }

    pub fn untranslated_file(&self) -> PathBuf {
        self.root.join("untranslated_universities.txt")
    }

    pub fn translated_file(&self, year: &str) -> PathBuf {
        self.parsed_dir()
            .join(format!("{}{}.json", year, TRANSLATED_SUFFIX))
    }
}

/// Year encoded in a `<year>_with_chinese.json` file name.
pub fn translated_year(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    stem.strip_suffix(TRANSLATED_SUFFIX).map(str::to_string)
}

/// `*.json` files directly under `dir`, sorted by path.
pub fn list_json(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingInput(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` to `path`, replacing the whole file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let body = serde_json::to_string_pretty(value).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_year_from_file_name() {
        assert_eq!(
            translated_year(Path::new("data/parsed/2023_with_chinese.json")),
            Some("2023".to_string())
        );
        assert_eq!(translated_year(Path::new("data/parsed/2023.json")), None);
    }

    #[test]
    fn list_json_requires_directory() {
        let err = list_json(Path::new("definitely/not/here")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }

    #[test]
    fn write_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_json(&layout.translated_file("2024"), &vec![1, 2, 3]).unwrap();
        std::fs::write(layout.parsed_dir().join("notes.txt"), "x").unwrap();

        let files = list_json(&layout.parsed_dir()).unwrap();
        assert_eq!(files, vec![layout.translated_file("2024")]);
        let back: Vec<u32> = read_json(&files[0]).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
