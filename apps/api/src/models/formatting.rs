use serde::{Deserialize, Serialize};

const DEFAULT_FONT_FAMILY: &str = "Times New Roman";
const DEFAULT_FONT_SIZE: f32 = 11.0;
const DEFAULT_HEADER_STYLE: &str = "bold-underline";
const DEFAULT_BULLET_STYLE: &str = "●";
const DEFAULT_LINE_SPACING: f32 = 1.0;
/// Half an inch, in millimetres.
const DEFAULT_MARGIN_MM: f32 = 12.7;

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: DEFAULT_MARGIN_MM,
            bottom: DEFAULT_MARGIN_MM,
            left: DEFAULT_MARGIN_MM,
            right: DEFAULT_MARGIN_MM,
        }
    }
}

/// Target typography for one render. Either returned by the optimization
/// backend or the built-in default below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormattingProfile {
    pub font_family: String,
    /// Base font size in points.
    pub font_size: f32,
    /// Style tag such as `bold-underline`.
    pub header_style: String,
    pub bullet_style: String,
    pub line_spacing: f32,
    pub margins: Margins,
}

impl Default for FormattingProfile {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            header_style: DEFAULT_HEADER_STYLE.to_string(),
            bullet_style: DEFAULT_BULLET_STYLE.to_string(),
            line_spacing: DEFAULT_LINE_SPACING,
            margins: Margins::default(),
        }
    }
}

impl FormattingProfile {
    /// Replaces zero, negative, non-finite or blank fields with the defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            font_family: non_blank(&self.font_family, &defaults.font_family),
            font_size: positive_or(self.font_size, defaults.font_size),
            header_style: non_blank(&self.header_style, &defaults.header_style),
            bullet_style: non_blank(&self.bullet_style, &defaults.bullet_style),
            line_spacing: positive_or(self.line_spacing, defaults.line_spacing),
            margins: Margins {
                top: positive_or(self.margins.top, DEFAULT_MARGIN_MM),
                bottom: positive_or(self.margins.bottom, DEFAULT_MARGIN_MM),
                left: positive_or(self.margins.left, DEFAULT_MARGIN_MM),
                right: positive_or(self.margins.right, DEFAULT_MARGIN_MM),
            },
        }
    }

    /// Whether section headers get a rule drawn beneath them.
    pub fn underline_headers(&self) -> bool {
        self.header_style.to_ascii_lowercase().contains("underline")
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_blank(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"fontFamily": "Arial", "margins": {"left": 20.0}}"#;
        let profile: FormattingProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.font_family, "Arial");
        assert_eq!(profile.font_size, 11.0);
        assert_eq!(profile.margins.left, 20.0);
        assert_eq!(profile.margins.right, 12.7);
    }

    #[test]
    fn test_sanitized_replaces_zero_margins() {
        let mut profile = FormattingProfile::default();
        profile.margins.top = 0.0;
        profile.margins.bottom = -4.0;
        profile.line_spacing = f32::NAN;
        let clean = profile.sanitized();
        assert_eq!(clean.margins.top, 12.7);
        assert_eq!(clean.margins.bottom, 12.7);
        assert_eq!(clean.line_spacing, 1.0);
    }

    #[test]
    fn test_underline_headers_follows_style_tag() {
        let mut profile = FormattingProfile::default();
        assert!(profile.underline_headers());
        profile.header_style = "bold".to_string();
        assert!(!profile.underline_headers());
    }
}
