pub mod engine;
pub mod placement;
pub mod tree;

pub use engine::compose;
pub use tree::RenderTree;
