use serde::{Deserialize, Serialize};

use crate::document::model::SchemeKind;
use crate::style::StyleTree;

pub const BULLET_GLYPHS: [&str; 3] = ["●", "○", "■"];
pub const NUMBER_FORMATS: [&str; 3] = ["%1.", "%2.", "%3."];

/// Levels with their own glyph/format/indent definition. Items nested
/// deeper reuse the last defined level's formatting.
pub const DEFINED_LEVELS: usize = 3;

/// Recursion cap for list item nesting.
pub const MAX_ITEM_LEVEL: u8 = 3;

const DEFAULT_BASE_INDENT: f64 = 420.0;
const DEFAULT_LIST_FONT: &str = "Calibri";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumberingRegistry {
    pub bullet: NumberingScheme,
    pub ordered: NumberingScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumberingScheme {
    pub kind: SchemeKind,
    pub levels: Vec<NumberingLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumberingLevel {
    /// Bullet glyph or `%N.`-style number format, verbatim `w:lvlText`.
    pub text: String,
    pub indent_twip: i64,
    pub font: String,
}

impl NumberingRegistry {
    pub fn from_styles(styles: &StyleTree) -> Self {
        let bullet_base = styles.f64_or("list.unordered.indentLevel", DEFAULT_BASE_INDENT);
        let bullet_font = styles.str_or("list.unordered.font", DEFAULT_LIST_FONT);
        let ordered_base = styles.f64_or("list.ordered.indentLevel", DEFAULT_BASE_INDENT);
        let ordered_font = styles.str_or("list.ordered.font", DEFAULT_LIST_FONT);

        let bullet_levels = (0..DEFINED_LEVELS)
            .map(|level| NumberingLevel {
                text: styles.list_entry_or("list.unordered.bulletChars", level, &BULLET_GLYPHS),
                indent_twip: level_indent(bullet_base, level as u8),
                font: bullet_font.clone(),
            })
            .collect();
        let ordered_levels = (0..DEFINED_LEVELS)
            .map(|level| NumberingLevel {
                text: styles.list_entry_or("list.ordered.numberFormats", level, &NUMBER_FORMATS),
                indent_twip: level_indent(ordered_base, level as u8),
                font: ordered_font.clone(),
            })
            .collect();

        Self {
            bullet: NumberingScheme {
                kind: SchemeKind::Bullet,
                levels: bullet_levels,
            },
            ordered: NumberingScheme {
                kind: SchemeKind::Ordered,
                levels: ordered_levels,
            },
        }
    }

}

/// Indent grows linearly with nesting depth.
pub fn level_indent(base: f64, level: u8) -> i64 {
    (base * (level as f64 + 1.0)).round() as i64
}

/// Formatting index for a nesting level: past the last defined level the
/// deepest definition keeps applying.
pub fn clamp_level(level: u8) -> usize {
    (level as usize).min(DEFINED_LEVELS - 1)
}
