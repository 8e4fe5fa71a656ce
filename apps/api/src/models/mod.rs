pub mod content;
pub mod design;
pub mod section;
