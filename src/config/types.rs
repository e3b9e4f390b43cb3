use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub foreground: ForegroundConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the shared counter record lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding namespace documents. Defaults to
    /// `<data_dir>/countersync`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Namespace (one document per namespace).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Key of the counter entry inside the namespace.
    #[serde(default = "default_key")]
    pub key: String,
}

impl StoreConfig {
    /// Resolved directory for namespace documents.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("countersync")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: default_namespace(),
            key: default_key(),
        }
    }
}

/// Broadcast channel sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Messages buffered per subscriber before the oldest are dropped.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Foreground container behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForegroundConfig {
    /// Reconcile as soon as a value-changed broadcast arrives while mounted,
    /// in addition to the resume-time pass.
    #[serde(default = "default_true")]
    pub reconcile_on_broadcast: bool,
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            reconcile_on_broadcast: true,
        }
    }
}

/// Home-screen widget provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Ids of the placed widget instances.
    #[serde(default = "default_instances")]
    pub instances: Vec<u32>,
    /// Periodic redraw interval. 0 disables the periodic trigger.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            instances: default_instances(),
            refresh_interval_seconds: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_namespace() -> String {
    "counter_prefs".to_string()
}

fn default_key() -> String {
    "saved_count".to_string()
}

fn default_capacity() -> usize {
    16
}

fn default_true() -> bool {
    true
}

fn default_instances() -> Vec<u32> {
    vec![1]
}

fn default_refresh_interval() -> u64 {
    1800
}

fn default_log_level() -> String {
    "warn".to_string()
}
