pub mod loader;
pub mod ports;
pub mod types;

pub use loader::ConfigLoader;
pub use ports::PortCategoryIndex;
pub use types::{GlobalConfig, ToolConfig};
