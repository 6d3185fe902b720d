use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::numbering::NumberingRegistry;

/// The assembled document: a flat, ordered node list plus the numbering
/// schemes and page geometry a serializer needs. Nesting is expressed
/// through indent and numbering levels, never through child pointers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentModel {
    pub metadata: DocumentMetadata,
    pub nodes: Vec<DocumentNode>,
    pub numbering: NumberingRegistry,
    pub page: PageGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DocumentNode {
    Paragraph(ParagraphNode),
    Table(TableNode),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParagraphNode {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub spacing: Spacing,
    pub indent: Indent,
    pub numbering: Option<NumberingRef>,
    pub borders: Option<ParagraphBorders>,
    pub shading: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
    pub link: Option<String>,
    pub image: Option<ImageAnchor>,
}

impl Run {
    pub fn text_with(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
            image: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunStyle {
    pub font: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    /// RRGGBB, no leading '#'.
    pub color: Option<String>,
    pub shading: Option<String>,
}

/// An inline picture carried directly in its run. The writer assigns
/// relationship ids and media file names when packaging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnchor {
    pub alt: String,
    pub mime: String,
    #[serde(with = "serde_bytes_base64")]
    pub bytes: Vec<u8>,
    pub width_twip: i64,
    pub height_twip: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn from_key(key: &str) -> Self {
        match key {
            "center" => Self::Center,
            "right" => Self::Right,
            "justify" => Self::Justify,
            _ => Self::Left,
        }
    }

    pub fn as_docx(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineRule {
    #[default]
    Auto,
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Spacing {
    pub before_twip: i64,
    pub after_twip: i64,
    /// 240ths of a line under `Auto`, twips under `Exact`.
    pub line: i64,
    pub rule: LineRule,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Indent {
    pub left_twip: i64,
    pub first_line_twip: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    #[default]
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumberingRef {
    pub scheme: SchemeKind,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    #[default]
    Single,
    Dashed,
}

impl BorderKind {
    pub fn as_docx(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Dashed => "dashed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderLine {
    pub color: String,
    /// Eighths of a point, the `w:sz` unit.
    pub size: i64,
    pub kind: BorderKind,
}

impl BorderLine {
    pub fn single(color: impl Into<String>, size: i64) -> Self {
        Self {
            color: color.into(),
            size,
            kind: BorderKind::Single,
        }
    }

    pub fn dashed(color: impl Into<String>, size: i64) -> Self {
        Self {
            color: color.into(),
            size,
            kind: BorderKind::Dashed,
        }
    }
}

impl Default for BorderLine {
    fn default() -> Self {
        Self {
            color: "000000".to_string(),
            size: 4,
            kind: BorderKind::Single,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParagraphBorders {
    pub top: Option<BorderLine>,
    pub bottom: Option<BorderLine>,
    pub left: Option<BorderLine>,
    pub right: Option<BorderLine>,
}

impl ParagraphBorders {
    pub fn boxed(line: BorderLine) -> Self {
        Self {
            top: Some(line.clone()),
            bottom: Some(line.clone()),
            left: Some(line.clone()),
            right: Some(line),
        }
    }

    pub fn left_only(line: BorderLine) -> Self {
        Self {
            left: Some(line),
            ..Self::default()
        }
    }

    pub fn bottom_only(line: BorderLine) -> Self {
        Self {
            bottom: Some(line),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableNode {
    pub header: Vec<TableCellNode>,
    pub rows: Vec<Vec<TableCellNode>>,
    pub column_widths_twip: Vec<i64>,
    pub borders: BorderLine,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableCellNode {
    pub runs: Vec<Run>,
    pub shading: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_twip: i64,
    pub height_twip: i64,
    pub orientation: PageOrientation,
    pub margins: PageMargins,
    pub grid: Option<DocGrid>,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait, normal margins.
        Self {
            width_twip: 11907,
            height_twip: 16840,
            orientation: PageOrientation::Portrait,
            margins: PageMargins::default(),
            grid: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMargins {
    pub top_twip: i64,
    pub bottom_twip: i64,
    pub left_twip: i64,
    pub right_twip: i64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top_twip: 1440,
            bottom_twip: 1440,
            left_twip: 1800,
            right_twip: 1800,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct DocGrid {
    pub char_per_line: u32,
    pub line_per_page: u32,
}

mod serde_bytes_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
