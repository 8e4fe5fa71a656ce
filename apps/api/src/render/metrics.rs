//! Glyph measurement and greedy word wrap.
//!
//! Widths come from the embedded faces' advance widths plus kerning, in the same
//! CSS px units the painter lays out in. A word wider than the column is split
//! by characters so no text runs past the column edge.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.4;

pub fn text_width(font: &FontRef<'_>, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0_f32;
    let mut prev = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT
}

/// Greedy wrap of `text` into lines no wider than `max_width`.
/// Explicit newlines start a new line; blank input yields no lines.
pub fn wrap_lines(font: &FontRef<'_>, size: f32, text: &str, max_width: f32) -> Vec<String> {
    let space_w = text_width(font, size, " ");
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_w = 0.0_f32;

        for word in paragraph.split_whitespace() {
            for piece in split_overlong(font, size, word, max_width) {
                let piece_w = text_width(font, size, &piece);
                if current.is_empty() {
                    current = piece;
                    current_w = piece_w;
                } else if current_w + space_w + piece_w > max_width {
                    // Line is full; start the next one with this piece.
                    lines.push(std::mem::take(&mut current));
                    current = piece;
                    current_w = piece_w;
                } else {
                    current.push(' ');
                    current.push_str(&piece);
                    current_w += space_w + piece_w;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Splits a single word into chunks that each fit `max_width`.
fn split_overlong(font: &FontRef<'_>, size: f32, word: &str, max_width: f32) -> Vec<String> {
    if text_width(font, size, word) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(font, size, &current) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
