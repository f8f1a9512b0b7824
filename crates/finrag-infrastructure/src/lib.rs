pub mod config_service;
pub mod file_loader;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::file_loader::read_file_selection;
pub use crate::paths::FinragPaths;
