pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_config, load_config_dir};
