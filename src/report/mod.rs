//! One-page PDF kundli report.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use crate::chart::UtcOffset;
use crate::models::{Kundli, Location};

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const FONT_SIZE: f32 = 12.0;
const LINE_STEP: f32 = 20.0;

#[derive(Debug, Error)]
#[error("PDF rendering failed: {0}")]
pub struct ReportError(String);

/// A line of text placed in PDF points from the bottom-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

fn pt(value: f32) -> Mm {
    Mm(value * 25.4 / 72.0)
}

/// Whole numbers keep their fraction: `280.0`, not `280`
fn decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Lay out the report text
pub fn report_lines(location: &Location, offset: &UtcOffset, kundli: &Kundli) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    let mut push = |x: f32, y: f32, text: String| lines.push(ReportLine { x, y, text });

    push(50.0, 800.0, format!("Kundli Report - City: {}", location.city));
    push(50.0, 780.0, format!("Date & Time (Local): {}", kundli.local_time));
    push(
        50.0,
        760.0,
        format!(
            "Lat: {}, Lon: {}, TZ: {}",
            decimal(location.latitude),
            decimal(location.longitude),
            offset
        ),
    );
    push(50.0, 740.0, "Planetary Details:".to_string());

    let mut y = 720.0;
    for (graha, placement) in kundli.planets.iter() {
        push(
            60.0,
            y,
            format!(
                "{} -> {} | Lon: {} deg | Lord: {}",
                graha,
                placement.rashi,
                decimal(placement.longitude),
                placement.lord
            ),
        );
        y -= LINE_STEP;
    }

    y -= 10.0;
    push(50.0, y, "House Details:".to_string());
    y -= LINE_STEP;
    for (label, house) in kundli.houses.iter() {
        push(
            60.0,
            y,
            format!(
                "{} -> {} | Deg: {} deg | Lord: {}",
                label,
                house.rashi,
                decimal(house.degree),
                house.lord
            ),
        );
        y -= LINE_STEP;
    }

    lines
}

/// Render the report into PDF bytes
pub fn render_pdf(
    location: &Location,
    offset: &UtcOffset,
    kundli: &Kundli,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Kundli Report - {}", location.city),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);

    for line in report_lines(location, offset, kundli) {
        layer.use_text(line.text, FONT_SIZE, pt(line.x), pt(line.y), &font);
    }

    doc.save_to_bytes().map_err(|e| ReportError(e.to_string()))
}

/// Attachment file name for a city
pub fn report_filename(city: &str) -> String {
    let safe: String = city
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("kundli_report_{}.pdf", safe)
}
