//! Paginated document writer.
//!
//! The writer records every draw operation per page so layout can be
//! inspected in tests, then serializes the pages to a PDF with `lopdf`.
//! Coordinates are millimetres with `y` measured downwards from the top edge
//! of the page to the text baseline; the conversion to PDF user space happens
//! only in [`DocumentWriter::finish`].

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::font_metrics::{get_metrics, FontFamily, FontStyle, PT_TO_MM};
use super::RenderError;
use crate::models::formatting::Margins;

/// US letter width in millimetres.
pub const LETTER_WIDTH_MM: f32 = 215.9;
/// US letter height in millimetres.
pub const LETTER_HEIGHT_MM: f32 = 279.4;
/// Stroke width of section rules.
pub const RULE_WIDTH_MM: f32 = 0.3;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn letter(margins: Margins) -> Self {
        Self {
            width_mm: LETTER_WIDTH_MM,
            height_mm: LETTER_HEIGHT_MM,
            margins,
        }
    }

    /// Horizontal space between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width_mm - self.margins.left - self.margins.right
    }

    /// Lowest baseline allowed on a page.
    pub fn bottom_limit(&self) -> f32 {
        self.height_mm - self.margins.bottom
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: FontStyle,
        size_pt: f32,
    },
    /// Horizontal rule from `x1` to `x2` at `y`.
    Rule { y: f32, x1: f32, x2: f32 },
}

// ────────────────────────────────────────────────────────────────────────────
// Writer
// ────────────────────────────────────────────────────────────────────────────

/// Owns the page list for exactly one render. Never shared between renders.
#[derive(Debug)]
pub struct DocumentWriter {
    family: FontFamily,
    geometry: PageGeometry,
    pages: Vec<Vec<DrawOp>>,
}

impl DocumentWriter {
    /// Creates a writer holding one empty page.
    pub fn new(family: FontFamily, geometry: PageGeometry) -> Self {
        Self {
            family,
            geometry,
            pages: vec![Vec::new()],
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn family(&self) -> FontFamily {
        self.family
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Width of `text` in millimetres at the given style and size.
    pub fn measure(&self, text: &str, style: FontStyle, size_pt: f32) -> f32 {
        get_metrics(self.family, style).measure_str(text) * size_pt * PT_TO_MM
    }

    /// Greedy word wrap to `max_width_mm`.
    pub fn wrap(&self, text: &str, max_width_mm: f32, style: FontStyle, size_pt: f32) -> Vec<String> {
        let em_mm = size_pt * PT_TO_MM;
        if em_mm <= 0.0 {
            return vec![text.to_string()];
        }
        get_metrics(self.family, style).wrap(text, max_width_mm / em_mm)
    }

    /// Records a text run on the current page.
    pub fn place_text(&mut self, x: f32, y: f32, text: &str, style: FontStyle, size_pt: f32) {
        if text.is_empty() {
            return;
        }
        self.current_page().push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
            size_pt,
        });
    }

    /// Draws a rule across the content width at `y`.
    pub fn draw_rule(&mut self, y: f32) {
        let x1 = self.geometry.margins.left;
        let x2 = self.geometry.width_mm - self.geometry.margins.right;
        self.current_page().push(DrawOp::Rule { y, x1, x2 });
    }

    pub fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn current_page(&mut self) -> &mut Vec<DrawOp> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Serializes all pages, in order, into one PDF.
    pub fn finish(&self) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for style in [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic] {
            let metrics = get_metrics(self.family, style);
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(metrics.base_font.as_bytes().to_vec()),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font_resource_name(style), Object::Reference(font_id));
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for ops in &self.pages {
            let content = Content {
                operations: self.page_operations(ops),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            mm_to_pt(self.geometry.width_mm).into(),
            mm_to_pt(self.geometry.height_mm).into(),
        ];
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn page_operations(&self, ops: &[DrawOp]) -> Vec<Operation> {
        let height = self.geometry.height_mm;
        let mut operations = Vec::new();
        for op in ops {
            match op {
                DrawOp::Text {
                    x,
                    y,
                    text,
                    style,
                    size_pt,
                } => {
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new(
                        "Tf",
                        vec![font_resource_name(*style).into(), (*size_pt).into()],
                    ));
                    operations.push(Operation::new(
                        "Td",
                        vec![mm_to_pt(*x).into(), mm_to_pt(height - *y).into()],
                    ));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
                DrawOp::Rule { y, x1, x2 } => {
                    let y_pt = mm_to_pt(height - *y);
                    operations.push(Operation::new("w", vec![mm_to_pt(RULE_WIDTH_MM).into()]));
                    operations.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));
                    operations.push(Operation::new("m", vec![mm_to_pt(*x1).into(), y_pt.into()]));
                    operations.push(Operation::new("l", vec![mm_to_pt(*x2).into(), y_pt.into()]));
                    operations.push(Operation::new("S", vec![]));
                }
            }
        }
        operations
    }
}

fn font_resource_name(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Normal => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / PT_TO_MM
}

// ────────────────────────────────────────────────────────────────────────────
// WinAnsi encoding
// ────────────────────────────────────────────────────────────────────────────

/// True if `c` has a code point in WinAnsiEncoding.
pub fn is_win_ansi(c: char) -> bool {
    win_ansi_byte(c).is_some()
}

/// Encodes text for a standard Type1 font. Unencodable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> DocumentWriter {
        DocumentWriter::new(FontFamily::Times, PageGeometry::letter(Margins::default()))
    }

    #[test]
    fn test_new_writer_has_one_page() {
        let w = writer();
        assert_eq!(w.page_count(), 1);
        assert!(w.pages()[0].is_empty());
    }

    #[test]
    fn test_place_text_records_on_current_page() {
        let mut w = writer();
        w.place_text(10.0, 20.0, "first", FontStyle::Normal, 10.0);
        w.new_page();
        w.place_text(10.0, 20.0, "second", FontStyle::Bold, 10.0);
        assert_eq!(w.page_count(), 2);
        assert_eq!(w.pages()[0].len(), 1);
        assert!(matches!(&w.pages()[1][0], DrawOp::Text { text, style: FontStyle::Bold, .. } if text == "second"));
    }

    #[test]
    fn test_rule_spans_margins() {
        let mut w = writer();
        w.draw_rule(40.0);
        assert_eq!(
            w.pages()[0][0],
            DrawOp::Rule {
                y: 40.0,
                x1: 12.7,
                x2: LETTER_WIDTH_MM - 12.7
            }
        );
    }

    #[test]
    fn test_measure_scales_with_size() {
        let w = writer();
        let small = w.measure("Experience", FontStyle::Normal, 10.0);
        let large = w.measure("Experience", FontStyle::Normal, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_fits_content_width() {
        let w = writer();
        let text = "Designed and shipped a multi-tenant billing platform processing millions of \
                    invoices per month across three regions with zero downtime migrations";
        let width = 80.0;
        let lines = w.wrap(text, width, FontStyle::Normal, 10.0);
        assert!(lines.len() > 1);
        for line in lines {
            assert!(w.measure(&line, FontStyle::Normal, 10.0) <= width + 1e-3);
        }
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("A•–é"), vec![b'A', 0x95, 0x96, 0xE9]);
        assert_eq!(encode_win_ansi("●"), vec![b'?']);
        assert!(is_win_ansi('•'));
        assert!(!is_win_ansi('➤'));
    }

    #[test]
    fn test_finish_produces_loadable_pdf() {
        let mut w = writer();
        w.place_text(12.7, 20.0, "Jane Doe", FontStyle::Bold, 18.0);
        w.draw_rule(25.0);
        w.new_page();
        w.place_text(12.7, 20.0, "• Built scalable APIs", FontStyle::Normal, 10.0);

        let bytes = w.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_finish_empty_document_has_one_page() {
        let bytes = writer().finish().unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
