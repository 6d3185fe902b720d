use crate::document::builders::styled_runs;
use crate::document::model::{
    Alignment, DocumentNode, Indent, LineRule, ParagraphNode, RunStyle, Spacing,
};
use crate::style::StyleTree;

const FALLBACK_FONT: &str = "Calibri Light";
const FALLBACK_COLOR: &str = "000000";
const FALLBACK_SIZES: [f64; 6] = [22.0, 18.0, 16.0, 14.0, 12.0, 11.0];

/// Per-level values cascade: `heading.fonts.h2` -> `heading.font` ->
/// built-in constant, and likewise for color and bold.
pub fn build(depth: u8, text: &str, styles: &StyleTree) -> DocumentNode {
    let level = depth.clamp(1, 6);
    let leveled = |group: &str| format!("heading.{group}.h{level}");

    let font = styles.str_cascade_or(&leveled("fonts"), "heading.font", FALLBACK_FONT);
    let size = styles.f64_or(&leveled("sizes"), FALLBACK_SIZES[(level - 1) as usize]);
    let color = styles.str_cascade_or(&leveled("colors"), "heading.color", FALLBACK_COLOR);
    let bold = styles.bool_cascade_or(&leveled("bold"), "heading.bold", true);
    let alignment = Alignment::from_key(&styles.str_or(&leveled("alignment"), "left"));
    let indent = styles.f64_or(&leveled("indent"), 0.0).round() as i64;

    let mut full_text = String::new();
    if styles.bool_or(&leveled("usePrefix"), false) {
        full_text.push_str(&styles.str_or(&leveled("prefix"), ""));
    }
    full_text.push_str(text);

    let base = RunStyle {
        font: Some(font),
        size_pt: Some(size),
        bold,
        color: Some(color),
        ..RunStyle::default()
    };

    DocumentNode::Paragraph(ParagraphNode {
        runs: styled_runs(&full_text, &base, styles),
        alignment,
        spacing: Spacing {
            before_twip: 240,
            after_twip: 120,
            line: 240,
            rule: LineRule::Auto,
        },
        indent: Indent {
            left_twip: indent,
            first_line_twip: 0,
        },
        ..ParagraphNode::default()
    })
}
