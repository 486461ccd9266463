//! Centralized configuration and builder for the debug data reader.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - DebugConfig::from_env() reads DBG_* env vars on top of defaults.
//! - DebuggerBuilder returns a DebugConfig, which Debugger consumes.
//!
//! Defaults mirror a development setup: local (non-partitioned) storage,
//! one second between manifest re-reads, five retries for the toolbar fetch.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{DEFAULT_PANEL, DEFAULT_PANELS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TOOLBAR_RETRIES};
use crate::storage::StorageMode;

/// Top-level configuration for the reader side.
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Base directory holding index.data/<tag>.data (local) or dated partitions.
    /// Env: DBG_DATA_PATH (default "./runtime/debug")
    pub data_path: PathBuf,

    /// Local (single directory) vs partitioned (per-day subdirectories) layout.
    /// Env: DBG_LOCAL = 0|1|true|false (default true)
    pub local: bool,

    /// Fixed delay between manifest re-reads while waiting for a tag.
    /// Env: DBG_RETRY_BACKOFF_MS (default 1000)
    pub retry_backoff_ms: u64,

    /// Retry bound for the toolbar fetch (issued right after the response).
    /// Env: DBG_TOOLBAR_RETRIES (default 5)
    pub toolbar_retries: u32,

    /// Registered panel ids, in display order.
    /// Env: DBG_PANELS = "config,request,log,..." (comma separated)
    pub panels: Vec<String>,

    /// Panel shown when the requested one is unknown.
    /// Env: DBG_DEFAULT_PANEL (default "log")
    pub default_panel: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./runtime/debug"),
            local: true,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            toolbar_retries: DEFAULT_TOOLBAR_RETRIES,
            panels: DEFAULT_PANELS.iter().map(|s| s.to_string()).collect(),
            default_panel: DEFAULT_PANEL.to_string(),
        }
    }
}

fn env_flag(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl DebugConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("DBG_DATA_PATH") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.data_path = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("DBG_LOCAL") {
            cfg.local = env_flag(&v);
        }

        if let Ok(v) = std::env::var("DBG_RETRY_BACKOFF_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                cfg.retry_backoff_ms = n;
            }
        }

        if let Ok(v) = std::env::var("DBG_TOOLBAR_RETRIES") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.toolbar_retries = n;
            }
        }

        if let Ok(v) = std::env::var("DBG_PANELS") {
            let ids: Vec<String> = v
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
            if !ids.is_empty() {
                cfg.panels = ids;
            }
        }

        if let Ok(v) = std::env::var("DBG_DEFAULT_PANEL") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.default_panel = s.to_string();
            }
        }

        cfg
    }

    pub fn mode(&self) -> StorageMode {
        if self.local {
            StorageMode::Local
        } else {
            StorageMode::Partitioned
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_data_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.data_path = p.into();
        self
    }

    pub fn with_local(mut self, on: bool) -> Self {
        self.local = on;
        self
    }

    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn with_toolbar_retries(mut self, n: u32) -> Self {
        self.toolbar_retries = n;
        self
    }

    pub fn with_panels<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.panels = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_panel<S: Into<String>>(mut self, id: S) -> Self {
        self.default_panel = id.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for DebugConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DebugConfig {{ \
             data_path: {}, \
             mode: {}, \
             retry_backoff_ms: {}, \
             toolbar_retries: {}, \
             panels: [{}], \
             default_panel: {} \
             }}",
            self.data_path.display(),
            if self.local { "local" } else { "partitioned" },
            self.retry_backoff_ms,
            self.toolbar_retries,
            self.panels.join(","),
            self.default_panel,
        )
    }
}

/// Lightweight builder that produces a DebugConfig.
/// Feeds `Debugger::new`.
#[derive(Clone, Debug)]
pub struct DebuggerBuilder {
    cfg: DebugConfig,
}

impl Default for DebuggerBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: DebugConfig::from_env(),
        }
    }
}

impl DebuggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: DebugConfig::default(),
        }
    }

    pub fn data_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.cfg.data_path = p.into();
        self
    }

    pub fn local(mut self, on: bool) -> Self {
        self.cfg.local = on;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.cfg.retry_backoff_ms = ms;
        self
    }

    pub fn toolbar_retries(mut self, n: u32) -> Self {
        self.cfg.toolbar_retries = n;
        self
    }

    pub fn panels<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.panels = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_panel<S: Into<String>>(mut self, id: S) -> Self {
        self.cfg.default_panel = id.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> DebugConfig {
        self.cfg
    }
}
