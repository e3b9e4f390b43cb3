mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    BroadcastConfig, Config, ForegroundConfig, LoggingConfig, StoreConfig, WidgetConfig,
};
