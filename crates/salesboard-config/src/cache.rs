//! Live configuration shared between the loader and in-flight report requests.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::loader::{from_env, ConfigLoader};
use crate::schema::Config;
use salesboard_common::Result;

/// Holds the active configuration.
///
/// Each request reads one [`Arc<Config>`] snapshot; a swap never changes a
/// snapshot already handed out.
pub struct ConfigCache {
    config: ArcSwap<Config>,
}

impl ConfigCache {
    /// Creates a cache around an already validated configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    /// The current snapshot.
    pub fn get(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Validates `config` and makes it current, returning the previous snapshot.
    ///
    /// An invalid configuration leaves the current one in place.
    pub fn replace(&self, config: Config) -> Result<Arc<Config>> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "Rejected configuration update");
            return Err(e);
        }
        Ok(self.config.swap(Arc::new(config)))
    }

    /// Re-reads `loader`'s file, applies environment overrides and swaps it in.
    pub fn reload(&self, loader: &ConfigLoader) -> Result<()> {
        let config = from_env(loader.load()?)?;
        self.replace(config)?;
        info!(path = %loader.path().display(), "Configuration reloaded");
        Ok(())
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
