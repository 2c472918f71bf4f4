//! Layout engine: walks classified lines and drives the document writer.
//!
//! All vertical positions are baselines in millimetres from the page top.
//! The cursor is owned by one [`LayoutEngine`] and never outlives a render.

use tracing::debug;

use super::classify::{classify_document, ClassifiedLine, Role, SplitPair};
use super::font_metrics::{FontFamily, FontStyle};
use super::normalize::{bullet_content, normalize_bullets, BULLET};
use super::writer::{is_win_ansi, DocumentWriter, PageGeometry};
use crate::models::formatting::FormattingProfile;

/// One line of body text at `lineSpacing == 1.0`.
pub const BASE_LINE_HEIGHT_MM: f32 = 4.5;
/// First baseline on page one sits this far below the top margin.
pub const FIRST_BASELINE_OFFSET_MM: f32 = 8.0;
pub const BULLET_GLYPH_INDENT_MM: f32 = 5.0;
pub const BULLET_TEXT_INDENT_MM: f32 = 10.0;
/// Narrowest hanging column for skill lists before content drops below the label.
const MIN_HANGING_WIDTH_MM: f32 = 30.0;

/// Sizes at an 11pt base; scaled by `fontSize / 11`.
const NAME_PT: f32 = 18.0;
const CONTACT_PT: f32 = 10.0;
const HEADER_PT: f32 = 11.0;
const BODY_PT: f32 = 10.0;
const REFERENCE_SIZE_PT: f32 = 11.0;

const NAME_ADVANCE: f32 = 2.5;
const CONTACT_ADVANCE: f32 = 1.2;
const HEADER_SPACE_BEFORE: f32 = 0.5;
const HEADER_RULE_GAP: f32 = 0.3;
const HEADER_SPACE_AFTER: f32 = 0.8;
const HEADER_RESERVED_LINES: f32 = 2.0;
const BLANK_ADVANCE: f32 = 0.3;

/// Render position: baseline `y` and zero-based page index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f32,
    pub page: usize,
}

pub struct LayoutEngine<'a> {
    writer: DocumentWriter,
    cursor: Cursor,
    profile: &'a FormattingProfile,
    line_height: f32,
    scale: f32,
    bullet_glyph: String,
}

impl<'a> LayoutEngine<'a> {
    /// `profile` is expected to be sanitized.
    pub fn new(profile: &'a FormattingProfile) -> Self {
        let geometry = PageGeometry::letter(profile.margins);
        let family = FontFamily::from_profile_name(&profile.font_family);
        Self {
            writer: DocumentWriter::new(family, geometry),
            cursor: Cursor {
                y: profile.margins.top + FIRST_BASELINE_OFFSET_MM,
                page: 0,
            },
            profile,
            line_height: BASE_LINE_HEIGHT_MM * profile.line_spacing,
            scale: profile.font_size / REFERENCE_SIZE_PT,
            bullet_glyph: drawable_bullet(&profile.bullet_style),
        }
    }

    /// Lays out every line in order and hands back the filled writer.
    pub fn run(mut self, lines: &[ClassifiedLine]) -> DocumentWriter {
        for line in lines {
            self.layout_line(line);
        }
        debug!(
            lines = lines.len(),
            pages = self.cursor.page + 1,
            final_y = self.cursor.y,
            "Resume layout complete"
        );
        self.writer
    }

    fn layout_line(&mut self, line: &ClassifiedLine) {
        match line.role {
            Role::Blank => self.cursor.y += self.line_height * BLANK_ADVANCE,
            Role::Name => self.layout_name(&line.text),
            Role::ContactInfo => self.layout_contact(&line.text),
            Role::SectionHeader => self.layout_section_header(&line.text),
            Role::SkillCategory => self.layout_skill_category(&line.text),
            Role::CompanyLine => {
                self.layout_two_column(line, FontStyle::Bold, FontStyle::Bold)
            }
            Role::JobTitleLine => {
                self.layout_two_column(line, FontStyle::Italic, FontStyle::Normal)
            }
            Role::BulletItem => self.layout_bullet(&line.text),
            Role::PlainText => self.layout_plain(&line.text),
        }
    }

    // ── Page handling ───────────────────────────────────────────────────────

    /// Starts a new page when `needed` millimetres would cross the bottom margin.
    fn ensure_space(&mut self, needed: f32) {
        if self.cursor.y + needed > self.writer.geometry().bottom_limit() {
            self.writer.new_page();
            self.cursor = Cursor {
                y: self.profile.margins.top + self.line_height,
                page: self.cursor.page + 1,
            };
        }
    }

    fn size(&self, base_pt: f32) -> f32 {
        base_pt * self.scale
    }

    fn left(&self) -> f32 {
        self.profile.margins.left
    }

    fn content_width(&self) -> f32 {
        self.writer.geometry().content_width()
    }

    fn place(&mut self, x: f32, text: &str, style: FontStyle, size_pt: f32) {
        let y = self.cursor.y;
        self.writer.place_text(x, y, text, style, size_pt);
    }

    fn centered_x(&self, text: &str, style: FontStyle, size_pt: f32) -> f32 {
        let width = self.writer.measure(text, style, size_pt);
        (self.writer.geometry().width_mm - width) / 2.0
    }

    // ── Roles ───────────────────────────────────────────────────────────────

    fn layout_name(&mut self, text: &str) {
        let size = self.size(NAME_PT);
        self.ensure_space(self.line_height);
        let x = self.centered_x(text, FontStyle::Bold, size);
        self.place(x, text, FontStyle::Bold, size);
        self.cursor.y += self.line_height * NAME_ADVANCE;
    }

    fn layout_contact(&mut self, text: &str) {
        let size = self.size(CONTACT_PT);
        for visual in self.writer.wrap(text, self.content_width(), FontStyle::Normal, size) {
            self.ensure_space(self.line_height);
            let x = self.centered_x(&visual, FontStyle::Normal, size);
            self.place(x, &visual, FontStyle::Normal, size);
            self.cursor.y += self.line_height * CONTACT_ADVANCE;
        }
    }

    fn layout_section_header(&mut self, text: &str) {
        let size = self.size(HEADER_PT);
        self.cursor.y += self.line_height * HEADER_SPACE_BEFORE;
        self.ensure_space(self.line_height * HEADER_RESERVED_LINES);
        let x = self.left();
        self.place(x, &text.to_uppercase(), FontStyle::Bold, size);
        self.cursor.y += self.line_height * HEADER_RULE_GAP;
        if self.profile.underline_headers() {
            self.writer.draw_rule(self.cursor.y);
        }
        self.cursor.y += self.line_height * HEADER_SPACE_AFTER;
    }

    /// `Label: a, b, c` with the label bold and the list hanging under its
    /// first word.
    fn layout_skill_category(&mut self, text: &str) {
        let size = self.size(BODY_PT);
        let Some(colon) = text.find(':') else {
            self.layout_plain(text);
            return;
        };
        let label = &text[..=colon];
        let content = text[colon + 1..].trim();

        self.ensure_space(self.line_height);
        let x = self.left();
        self.place(x, label, FontStyle::Bold, size);

        let label_width = self.writer.measure(&format!("{label} "), FontStyle::Bold, size);
        let hanging = self.content_width() - label_width >= MIN_HANGING_WIDTH_MM;
        let (indent, width) = if hanging {
            (label_width, self.content_width() - label_width)
        } else {
            self.cursor.y += self.line_height;
            (0.0, self.content_width())
        };

        let wrapped = self.writer.wrap(content, width, FontStyle::Normal, size);
        if wrapped.is_empty() {
            if hanging {
                self.cursor.y += self.line_height;
            }
            return;
        }
        for (i, visual) in wrapped.iter().enumerate() {
            if i > 0 || !hanging {
                self.ensure_space(self.line_height);
            }
            let x = self.left() + indent;
            self.place(x, visual, FontStyle::Normal, size);
            self.cursor.y += self.line_height;
        }
    }

    fn layout_two_column(&mut self, line: &ClassifiedLine, left_style: FontStyle, right_style: FontStyle) {
        let size = self.size(BODY_PT);
        match &line.split {
            Some(SplitPair { left, right }) => {
                self.ensure_space(self.line_height);
                let x = self.left();
                self.place(x, left, left_style, size);
                let right_width = self.writer.measure(right, right_style, size);
                let geometry = self.writer.geometry();
                let right_x = geometry.width_mm - geometry.margins.right - right_width;
                self.place(right_x, right, right_style, size);
                self.cursor.y += self.line_height;
            }
            None => self.layout_wrapped(&line.text, left_style, size, 0.0),
        }
    }

    fn layout_bullet(&mut self, text: &str) {
        let size = self.size(BODY_PT);
        let content = bullet_content(text);
        let width = self.content_width() - BULLET_TEXT_INDENT_MM;
        let wrapped = self.writer.wrap(&content, width, FontStyle::Normal, size);
        let glyph = self.bullet_glyph.clone();
        let glyph_x = self.left() + BULLET_GLYPH_INDENT_MM;
        let text_x = self.left() + BULLET_TEXT_INDENT_MM;

        if wrapped.is_empty() {
            self.ensure_space(self.line_height);
            self.place(glyph_x, &glyph, FontStyle::Normal, size);
            self.cursor.y += self.line_height;
            return;
        }
        for (i, visual) in wrapped.iter().enumerate() {
            self.ensure_space(self.line_height);
            if i == 0 {
                self.place(glyph_x, &glyph, FontStyle::Normal, size);
            }
            self.place(text_x, visual, FontStyle::Normal, size);
            self.cursor.y += self.line_height;
        }
    }

    fn layout_plain(&mut self, text: &str) {
        let size = self.size(BODY_PT);
        self.layout_wrapped(text, FontStyle::Normal, size, 0.0);
    }

    fn layout_wrapped(&mut self, text: &str, style: FontStyle, size: f32, indent: f32) {
        let width = self.content_width() - indent;
        for visual in self.writer.wrap(text, width, style, size) {
            self.ensure_space(self.line_height);
            let x = self.left() + indent;
            self.place(x, &visual, style, size);
            self.cursor.y += self.line_height;
        }
    }
}

/// The profile's bullet glyph when the standard fonts can draw it, else `•`.
fn drawable_bullet(style: &str) -> String {
    let glyph = style.trim();
    if !glyph.is_empty() && glyph.chars().all(is_win_ansi) {
        glyph.to_string()
    } else {
        BULLET.to_string()
    }
}

/// Normalizes, classifies and lays out `text`. The returned writer holds the
/// finished pages and can be inspected or serialized.
pub fn layout_document(text: &str, profile: &FormattingProfile) -> DocumentWriter {
    let profile = profile.sanitized();
    let normalized = normalize_bullets(text);
    let lines = classify_document(&normalized);
    LayoutEngine::new(&profile).run(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::writer::{DrawOp, LETTER_WIDTH_MM};

    const SCENARIO: &str = "Jane Doe\n\
        jane@example.com | linkedin.com/in/janedoe\n\
        EXPERIENCE\n\
        Acme Corp                    Remote\n\
        Senior Engineer               Jan 2020 - Present\n\
        • Built scalable APIs\n\
        SKILLS\n\
        Languages: Python, Go";

    fn texts(writer: &DocumentWriter) -> Vec<(f32, f32, String, FontStyle, f32)> {
        writer
            .pages()
            .iter()
            .flatten()
            .filter_map(|op| match op {
                DrawOp::Text {
                    x,
                    y,
                    text,
                    style,
                    size_pt,
                } => Some((*x, *y, text.clone(), *style, *size_pt)),
                DrawOp::Rule { .. } => None,
            })
            .collect()
    }

    fn find<'t>(
        runs: &'t [(f32, f32, String, FontStyle, f32)],
        needle: &str,
    ) -> &'t (f32, f32, String, FontStyle, f32) {
        runs.iter()
            .find(|r| r.2 == needle)
            .unwrap_or_else(|| panic!("no run {needle:?} in {runs:?}"))
    }

    fn body_capacity(first_y: f32, line_height: f32, limit: f32) -> usize {
        let mut y = first_y;
        let mut count = 0;
        while y + line_height <= limit {
            count += 1;
            y += line_height;
        }
        count
    }

    #[test]
    fn test_end_to_end_scenario() {
        let profile = FormattingProfile::default();
        let writer = layout_document(SCENARIO, &profile);
        assert_eq!(writer.page_count(), 1);
        let runs = texts(&writer);
        let right_edge = LETTER_WIDTH_MM - profile.margins.right;

        let name = find(&runs, "Jane Doe");
        assert_eq!(name.3, FontStyle::Bold);
        assert_eq!(name.4, 18.0);
        let name_width = writer.measure("Jane Doe", FontStyle::Bold, 18.0);
        assert!((name.0 + name_width / 2.0 - LETTER_WIDTH_MM / 2.0).abs() < 1e-3);

        let contact = find(&runs, "jane@example.com | linkedin.com/in/janedoe");
        assert_eq!(contact.3, FontStyle::Normal);
        let contact_width = writer.measure(&contact.2, FontStyle::Normal, 10.0);
        assert!((contact.0 + contact_width / 2.0 - LETTER_WIDTH_MM / 2.0).abs() < 1e-3);

        let header = find(&runs, "EXPERIENCE");
        assert_eq!(header.3, FontStyle::Bold);
        assert_eq!(header.0, profile.margins.left);

        let company = find(&runs, "Acme Corp");
        let remote = find(&runs, "Remote");
        assert_eq!(company.3, FontStyle::Bold);
        assert_eq!(remote.3, FontStyle::Bold);
        assert_eq!(company.1, remote.1);
        let remote_width = writer.measure("Remote", FontStyle::Bold, 10.0);
        assert!((remote.0 + remote_width - right_edge).abs() < 1e-3);

        let title = find(&runs, "Senior Engineer");
        let dates = find(&runs, "Jan 2020 - Present");
        assert_eq!(title.3, FontStyle::Italic);
        assert_eq!(dates.3, FontStyle::Normal);
        assert_eq!(title.1, dates.1);
        let dates_width = writer.measure("Jan 2020 - Present", FontStyle::Normal, 10.0);
        assert!((dates.0 + dates_width - right_edge).abs() < 1e-3);

        let glyph = find(&runs, "•");
        let bullet = find(&runs, "Built scalable APIs");
        assert_eq!(glyph.0, profile.margins.left + BULLET_GLYPH_INDENT_MM);
        assert_eq!(bullet.0, profile.margins.left + BULLET_TEXT_INDENT_MM);
        assert_eq!(glyph.1, bullet.1);

        find(&runs, "SKILLS");
        let label = find(&runs, "Languages:");
        let skills = find(&runs, "Python, Go");
        assert_eq!(label.3, FontStyle::Bold);
        assert_eq!(skills.3, FontStyle::Normal);
        assert_eq!(label.1, skills.1);
        assert!(skills.0 > label.0);

        let rules = writer.pages()[0]
            .iter()
            .filter(|op| matches!(op, DrawOp::Rule { .. }))
            .count();
        assert_eq!(rules, 2);
    }

    #[test]
    fn test_vertical_order_follows_input() {
        let writer = layout_document(SCENARIO, &FormattingProfile::default());
        let runs = texts(&writer);
        let y_of = |s: &str| find(&runs, s).1;
        assert!(y_of("Jane Doe") < y_of("EXPERIENCE"));
        assert!(y_of("EXPERIENCE") < y_of("Acme Corp"));
        assert!(y_of("Acme Corp") < y_of("Senior Engineer"));
        assert!(y_of("Senior Engineer") < y_of("Built scalable APIs"));
        assert!(y_of("Built scalable APIs") < y_of("SKILLS"));
    }

    #[test]
    fn test_header_without_underline_draws_no_rule() {
        let profile = FormattingProfile {
            header_style: "bold".to_string(),
            ..FormattingProfile::default()
        };
        let writer = layout_document(SCENARIO, &profile);
        assert!(writer
            .pages()
            .iter()
            .flatten()
            .all(|op| !matches!(op, DrawOp::Rule { .. })));
    }

    #[test]
    fn test_unsplit_company_line_is_left_aligned() {
        let writer = layout_document("Jane\nAcme Corp, Remote", &FormattingProfile::default());
        let runs = texts(&writer);
        let company = find(&runs, "Acme Corp, Remote");
        assert_eq!(company.0, 12.7);
        assert_eq!(company.3, FontStyle::Bold);
    }

    #[test]
    fn test_long_skill_list_hangs_under_first_word() {
        let skills = (0..40)
            .map(|i| format!("Framework{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!("Jane\nFrameworks: {skills}");
        let writer = layout_document(&text, &FormattingProfile::default());
        let runs = texts(&writer);
        let content: Vec<_> = runs
            .iter()
            .filter(|r| r.3 == FontStyle::Normal && r.2.starts_with("Framework"))
            .collect();
        assert!(content.len() > 1);
        assert!(content.iter().all(|r| (r.0 - content[0].0).abs() < 1e-3));
        assert!(content[0].0 > 12.7);
    }

    #[test]
    fn test_bullet_glyph_falls_back_when_unencodable() {
        let writer = layout_document("Jane\n● Led migration", &FormattingProfile::default());
        let runs = texts(&writer);
        find(&runs, "•");
        find(&runs, "Led migration");

        let dash = FormattingProfile {
            bullet_style: "-".to_string(),
            ..FormattingProfile::default()
        };
        let writer = layout_document("Jane\n• Led migration", &dash);
        find(&texts(&writer), "-");
    }

    #[test]
    fn test_font_size_scales_roles() {
        let profile = FormattingProfile {
            font_size: 22.0,
            ..FormattingProfile::default()
        };
        let writer = layout_document(SCENARIO, &profile);
        let runs = texts(&writer);
        assert_eq!(find(&runs, "Jane Doe").4, 36.0);
        assert_eq!(find(&runs, "Acme Corp").4, 20.0);
    }

    #[test]
    fn test_page_breaks_for_many_bullets() {
        let profile = FormattingProfile::default();
        let bullets = 200;
        let mut text = String::from("Jane Doe\n");
        for i in 0..bullets {
            text.push_str(&format!("• Item {i}\n"));
        }
        let writer = layout_document(&text, &profile);

        let line_height = BASE_LINE_HEIGHT_MM;
        let limit = writer.geometry().bottom_limit();
        let first_body_y =
            profile.margins.top + FIRST_BASELINE_OFFSET_MM + line_height * NAME_ADVANCE;
        let first = body_capacity(first_body_y, line_height, limit);
        let rest = body_capacity(profile.margins.top + line_height, line_height, limit);
        let expected = 1 + (bullets - first).div_ceil(rest);
        assert_eq!(writer.page_count(), expected);

        let text_x = profile.margins.left + BULLET_TEXT_INDENT_MM;
        let per_page: Vec<usize> = writer
            .pages()
            .iter()
            .map(|ops| {
                ops.iter()
                    .filter(|op| matches!(op, DrawOp::Text { x, .. } if (*x - text_x).abs() < 1e-3))
                    .count()
            })
            .collect();
        assert_eq!(per_page[0], first);
        assert_eq!(per_page[1], rest);
        assert_eq!(per_page.iter().sum::<usize>(), bullets);
    }

    #[test]
    fn test_single_bullet_longer_than_a_page() {
        let profile = FormattingProfile::default();
        let words = (0..3000).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let text = format!("Jane Doe\n• {words}");
        let writer = layout_document(&text, &profile);

        let width = writer.geometry().content_width() - BULLET_TEXT_INDENT_MM;
        let visual = writer.wrap(&words, width, FontStyle::Normal, BODY_PT).len();
        let line_height = BASE_LINE_HEIGHT_MM;
        let limit = writer.geometry().bottom_limit();
        let first_body_y =
            profile.margins.top + FIRST_BASELINE_OFFSET_MM + line_height * NAME_ADVANCE;
        let first = body_capacity(first_body_y, line_height, limit);
        let rest = body_capacity(profile.margins.top + line_height, line_height, limit);

        assert!(visual > first + rest);
        assert_eq!(writer.page_count(), 1 + (visual - first).div_ceil(rest));
    }

    #[test]
    fn test_no_baseline_below_bottom_margin() {
        let mut text = String::from("Jane Doe\njane@example.com | github.com/jane\n");
        for section in 0..12 {
            text.push_str("EXPERIENCE\n");
            text.push_str("Acme Corp    Houston, TX\n");
            text.push_str("Engineer    2019 - 2021\n");
            for b in 0..6 {
                text.push_str(&format!(
                    "• Delivered project {section}-{b} with a long description that wraps \
                     across more than one visual line on a letter page\n"
                ));
            }
            text.push('\n');
        }
        let profile = FormattingProfile::default();
        let writer = layout_document(&text, &profile);
        let limit = writer.geometry().bottom_limit();
        assert!(writer.page_count() > 1);
        for op in writer.pages().iter().flatten() {
            if let DrawOp::Text { y, .. } = op {
                assert!(*y <= limit, "baseline {y} below {limit}");
            }
        }
    }

    #[test]
    fn test_renders_are_independent() {
        let profile = FormattingProfile::default();
        let a = layout_document(SCENARIO, &profile);
        let b = layout_document(SCENARIO, &profile);
        assert_eq!(a.pages(), b.pages());
    }
}
