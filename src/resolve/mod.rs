//! Localized-name resolution: an ordered chain of lookup tiers.
//!
//! exact table match -> fuzzy table match -> remote translation provider

pub mod local;
pub mod remote;
pub mod table;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::http;
use crate::settings::{ProviderKind, Settings};
use local::{ExactLookup, FuzzyLookup};
use remote::{Baidu, Google, RemoteLookup, Translator, Youdao};
use table::MappingTable;

/// One resolution tier.
pub trait NameResolver {
    fn tier(&self) -> &'static str;

    fn resolve(&self, title: &str) -> Option<String>;

    /// Remote tiers count towards the request throttle.
    fn is_remote(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub tier: &'static str,
}

/// Pauses after every `every`-th remote request. Best effort only.
#[derive(Debug, Clone)]
pub struct Throttle {
    every: usize,
    pause: Duration,
    requests: usize,
}

impl Throttle {
    pub fn new(every: usize, pause: Duration) -> Self {
        Throttle {
            every,
            pause,
            requests: 0,
        }
    }

    pub fn disabled() -> Self {
        Throttle::new(0, Duration::ZERO)
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Count one request; returns true when this request triggered a pause.
    pub fn record_request(&mut self) -> bool {
        self.requests += 1;
        if self.every == 0 || self.requests % self.every != 0 {
            return false;
        }
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        true
    }
}

pub struct ResolverChain {
    tiers: Vec<Box<dyn NameResolver>>,
    throttle: Throttle,
}

impl ResolverChain {
    pub fn new(tiers: Vec<Box<dyn NameResolver>>, throttle: Throttle) -> Self {
        ResolverChain { tiers, throttle }
    }

    /// Exact and fuzzy tiers over the built-in table, no network.
    pub fn local(table: MappingTable) -> Self {
        let table = Arc::new(table);
        ResolverChain::new(
            vec![
                Box::new(ExactLookup::new(Arc::clone(&table))),
                Box::new(FuzzyLookup::new(table)),
            ],
            Throttle::disabled(),
        )
    }

    pub fn with_tier(mut self, tier: Box<dyn NameResolver>) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Built-in table plus the configured remote provider.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let chain = ResolverChain::local(MappingTable::builtin()).with_throttle(Throttle::new(
            settings.translate.pause_every,
            settings.pause(),
        ));

        let client = || http::build_client(&settings.http());
        let translator: Box<dyn Translator> = match settings.translate.provider {
            ProviderKind::Disabled => {
                info!("Remote translation disabled");
                return Ok(chain);
            }
            ProviderKind::Youdao => Box::new(Youdao::new(client()?)),
            ProviderKind::Google => Box::new(Google::new(client()?)),
            ProviderKind::Baidu => Box::new(Baidu::new(
                client()?,
                &settings.baidu.app_id,
                &settings.baidu.secret_key,
            )?),
        };
        info!("Remote translation via {}", translator.provider());
        Ok(chain.with_tier(Box::new(RemoteLookup::new(translator))))
    }

    pub fn tiers(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.tier()).collect()
    }

    pub fn remote_requests(&self) -> usize {
        self.throttle.requests()
    }

    /// Try each tier in order; the first hit wins.
    pub fn resolve(&mut self, title: &str) -> Option<Resolution> {
        for tier in &self.tiers {
            let hit = tier.resolve(title);
            if tier.is_remote() {
                self.throttle.record_request();
            }
            if let Some(name) = hit.filter(|n| !n.is_empty()) {
                return Some(Resolution {
                    name,
                    tier: tier.tier(),
                });
            }
        }
        None
    }
}
