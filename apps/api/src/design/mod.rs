pub mod handlers;
pub mod registry;
pub mod resolver;

pub use registry::DesignRegistry;
pub use resolver::{resolve_configuration, resolve_design, ResolvedStyle};
