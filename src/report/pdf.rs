// src/report/pdf.rs
//! Fixed single-page layout for case reports.
//!
//! A4 portrait, Helvetica 12pt, 10 mm margins. A centred title cell, one blank
//! 10 mm line, then three left-aligned rows. Positions are computed from the top
//! edge and flipped into PDF's bottom-left coordinate space at render time.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::ReportRequest;
use crate::error::ReportError;

pub const TITLE: &str = "Tourist Safety Incident Report";

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// Inner padding for left-aligned cell text.
pub const CELL_PADDING_MM: f32 = 1.0;
pub const CELL_WIDTH_MM: f32 = 200.0;
pub const CELL_HEIGHT_MM: f32 = 10.0;
pub const FONT_SIZE_PT: f32 = 12.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One positioned line of text. `baseline_mm` is measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub x_mm: f32,
    pub baseline_mm: f32,
}

fn font_size_mm() -> f32 {
    FONT_SIZE_PT / PT_PER_MM
}

/// Rendered width of `text` in Helvetica at the report font size.
pub fn text_width_mm(text: &str) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let idx = (c as u32).wrapping_sub(32) as usize;
            u32::from(HELVETICA_WIDTHS.get(idx).copied().unwrap_or(FALLBACK_WIDTH))
        })
        .sum();
    units as f32 / 1000.0 * font_size_mm()
}

fn cell(text: String, top_mm: f32, align: Align) -> Line {
    let x_mm = match align {
        Align::Left => MARGIN_MM + CELL_PADDING_MM,
        Align::Center => MARGIN_MM + (CELL_WIDTH_MM - text_width_mm(&text)) / 2.0,
    };
    // vertically centred in the cell, nudged to sit on the baseline
    let baseline_mm = top_mm + 0.5 * CELL_HEIGHT_MM + 0.3 * font_size_mm();
    Line {
        text,
        x_mm,
        baseline_mm,
    }
}

/// Position every line of the report.
pub fn layout(req: &ReportRequest) -> Vec<Line> {
    let mut top = MARGIN_MM;
    let mut lines = Vec::with_capacity(4);

    lines.push(cell(TITLE.to_string(), top, Align::Center));
    top += CELL_HEIGHT_MM;
    // blank line under the title
    top += CELL_HEIGHT_MM;

    for text in [
        format!("Tourist ID: {}", req.tourist_id),
        format!("Alert: {}", req.alert),
        format!("Last Location: {}", req.last_location),
    ] {
        lines.push(cell(text, top, Align::Left));
        top += CELL_HEIGHT_MM;
    }
    lines
}

/// Render the report to PDF bytes.
pub fn render(req: &ReportRequest) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Render(format!("{e:?}")))?;
    let canvas = doc.get_page(page).get_layer(layer);

    for line in layout(req) {
        canvas.use_text(
            line.text,
            FONT_SIZE_PT,
            Mm(line.x_mm),
            Mm(PAGE_HEIGHT_MM - line.baseline_mm),
            &font,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| ReportError::Render(format!("{e:?}")))
}
