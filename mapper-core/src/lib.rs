pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use config::{determine_mappings_path, get_settings_path, Settings};
pub use error::{LookupKind, MapperError, Result};
pub use mapper::{IdGenerator, UuidMapper, UuidV4Generator};
pub use models::{Entry, UuidMappings};
pub use storage::{Storage, DEFAULT_MAPPINGS_FILE};
