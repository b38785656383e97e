//! Layered configuration: defaults, then `config.ini`, then `QS_*` env vars.
//!
//! ```ini
//! [paths]
//! data_dir = data
//!
//! [translate]
//! ; youdao | baidu | google | none
//! provider = youdao
//! pause_ms = 1000
//! pause_every = 10
//! timeout_secs = 20
//!
//! [baidu]
//! app_id =
//! secret_key =
//!
//! [proxy]
//! enabled = false
//! host = 127.0.0.1
//! port = 10809
//! ```
//!
//! Environment overrides use `__` between section and key, e.g.
//! `QS_TRANSLATE__PROVIDER=google`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::http::{HttpConfig, ProxyConfig};
use crate::store::DataLayout;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Youdao,
    Baidu,
    Google,
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathSettings {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateSettings {
    pub provider: ProviderKind,
    pub pause_ms: u64,
    pub pause_every: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaiduSettings {
    pub app_id: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub paths: PathSettings,
    pub translate: TranslateSettings,
    pub baidu: BaiduSettings,
    pub proxy: ProxySettings,
    #[serde(skip)]
    raw: Config,
}

impl Settings {
    /// Load settings; a missing file just means defaults plus environment.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let raw = Config::builder()
            .set_default("paths.data_dir", "data")?
            .set_default("translate.provider", "youdao")?
            .set_default("translate.pause_ms", 1000_i64)?
            .set_default("translate.pause_every", 10_i64)?
            .set_default("translate.timeout_secs", 20_i64)?
            .set_default("baidu.app_id", "")?
            .set_default("baidu.secret_key", "")?
            .set_default("proxy.enabled", false)?
            .set_default("proxy.host", "127.0.0.1")?
            .set_default("proxy.port", 10809_i64)?
            .add_source(File::from(path).format(FileFormat::Ini).required(false))
            .add_source(
                Environment::with_prefix("QS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = raw.clone().try_deserialize()?;
        settings.raw = raw;
        Ok(settings)
    }

    /// Raw string lookup by `[section]` and key.
    pub fn get_option(&self, section: &str, key: &str) -> Option<String> {
        self.raw.get_string(&format!("{}.{}", section, key)).ok()
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.paths.data_dir)
    }

    pub fn http(&self) -> HttpConfig {
        let proxy = self.proxy.enabled.then(|| ProxyConfig {
            host: self.proxy.host.clone(),
            port: self.proxy.port,
        });
        HttpConfig {
            timeout: Duration::from_secs(self.translate.timeout_secs),
            proxy,
        }
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.translate.pause_ms)
    }
}
