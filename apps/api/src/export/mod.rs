//! Export pipeline: painted surface → bitmap → paged PDF or single image, and
//! content → plain text.
//!
//! Raster and PDF exports need a painted surface; text export reads content
//! directly and cannot fail.

pub mod handlers;
pub mod paginate;
pub mod raster;
pub mod text;

use thiserror::Error;

pub use paginate::{plan_pages, PageSlice};
pub use raster::ImageFormat;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document has not been rendered yet")]
    RenderNotReady,

    #[error("bitmap of {width}x{height} px exceeds the export limit")]
    TooLarge { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    PdfWrite(String),

    #[error("raster task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
