//! Page planning and PDF assembly.
//!
//! Pagination slices the captured bitmap; nothing is reflowed. Page `i` shows
//! the bitmap shifted up by `i` page heights, so a line of text or an entry can
//! be cut in half where a page boundary falls.

use image::imageops;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use serde::Serialize;
use tracing::debug;

use crate::export::raster::encode_jpeg;
use crate::export::ExportError;
use crate::render::Paper;

/// Absorbs pixel snapping and float noise from scaling: a bitmap within half a
/// pixel of a page multiple does not spill onto a sliver page.
const SNAP_TOLERANCE: f32 = 0.5;

/// One page of the plan. `offset` is where the bitmap's top edge sits relative
/// to the page's top edge (0 for the first page, then negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSlice {
    pub index: usize,
    pub offset: f32,
    /// Bitmap rows visible on this page; equals the page height except on the last page.
    pub visible: f32,
}

impl PageSlice {
    pub fn top(&self) -> f32 {
        -self.offset
    }
}

/// Walks a bitmap of `image_height` in `page_height` steps, one page per step,
/// until nothing remains. Always yields at least one page.
pub fn plan_pages(image_height: f32, page_height: f32) -> Vec<PageSlice> {
    let image_height = image_height.max(0.0);
    if page_height <= 0.0 {
        return vec![PageSlice {
            index: 0,
            offset: 0.0,
            visible: image_height,
        }];
    }

    let mut pages = Vec::new();
    let mut remaining = image_height;
    loop {
        let index = pages.len();
        let offset = -(index as f32 * page_height);
        pages.push(PageSlice {
            index,
            offset,
            visible: remaining.clamp(0.0, page_height),
        });
        remaining -= page_height;
        if remaining <= SNAP_TOLERANCE {
            break;
        }
    }
    pages
}

/// Whole-pixel rows `(top, rows)` for each planned page of a bitmap
/// `image_height` rows tall. Each band ends where the next begins and the last
/// ends at the bitmap's bottom edge, so every row lands on exactly one page.
pub fn pixel_bands(image_height: u32, page_height: f32) -> Vec<(u32, u32)> {
    let plan = plan_pages(image_height as f32, page_height);
    let last = plan.len() - 1;
    let edge = |slice: &PageSlice| (slice.top().round() as u32).min(image_height);
    plan.iter()
        .enumerate()
        .map(|(i, slice)| {
            let top = edge(slice);
            let end = if i == last {
                image_height
            } else {
                edge(&plan[i + 1])
            };
            (top, end.saturating_sub(top))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// PDF
// ────────────────────────────────────────────────────────────────────────────

/// A finished PDF and the number of pages in it.
#[derive(Debug)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Builds a paged PDF from a tall bitmap whose width is one page width.
/// Each page carries its band of the bitmap as a JPEG image XObject pinned to
/// the top edge.
pub fn build_pdf(img: &RgbaImage, paper: Paper) -> Result<PdfDocument, ExportError> {
    let (page_w_pt, page_h_pt) = paper.size_pt();
    let px_per_pt = img.width() as f32 / page_w_pt;
    let page_h_px = page_h_pt * px_per_pt;
    let bands = pixel_bands(img.height(), page_h_px);

    let mut doc = Document::with_version("1.5");
    doc.trailer.set("Creator", Object::string_literal("folio-api"));
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(bands.len());

    for (top, rows) in bands {
        let top = top.min(img.height().saturating_sub(1));
        let rows = rows.clamp(1, img.height().saturating_sub(top).max(1));
        let band = imageops::crop_imm(img, 0, top, img.width(), rows).to_image();
        let jpeg = encode_jpeg(&band)?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img.width() as i64,
                "Height" => rows as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let band_h_pt = rows as f32 / px_per_pt;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_w_pt.into(),
                        0f32.into(),
                        0f32.into(),
                        band_h_pt.into(),
                        0f32.into(),
                        (page_h_pt - band_h_pt).into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0f32.into(), 0f32.into(), page_w_pt.into(), page_h_pt.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::PdfWrite(e.to_string()))?;

    debug!(pages = page_count, bytes = bytes.len(), "pdf assembled");
    Ok(PdfDocument {
        bytes,
        pages: page_count,
    })
}
