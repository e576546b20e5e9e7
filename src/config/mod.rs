pub mod manager;
pub mod models;

pub use manager::{get_config_dir, ConfigManager};
pub use models::GlobalConfig;
