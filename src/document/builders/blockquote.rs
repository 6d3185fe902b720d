use crate::document::builders::{
    DEFAULT_PARAGRAPH_FONT, DEFAULT_PARAGRAPH_SIZE, styled_runs,
};
use crate::document::model::{
    BorderLine, DocumentNode, Indent, ParagraphBorders, ParagraphNode, RunStyle,
};
use crate::style::StyleTree;

const FALLBACK_COLOR: &str = "666666";
const FALLBACK_BORDER_COLOR: &str = "CCCCCC";
const FALLBACK_LEFT_INDENT: f64 = 400.0;
const BORDER_SIZE: i64 = 12;

pub fn build(text: &str, styles: &StyleTree) -> DocumentNode {
    let stripped = strip_quote_markers(text);

    // The quote font falls back to the body font, not to a constant of its
    // own, so an override of paragraph.font restyles quotes too.
    let body_font = styles.str_or("paragraph.font", DEFAULT_PARAGRAPH_FONT);
    let base = RunStyle {
        font: Some(styles.str_or("blockquote.font", &body_font)),
        size_pt: Some(styles.f64_or("blockquote.size", DEFAULT_PARAGRAPH_SIZE)),
        color: Some(styles.str_or("blockquote.color", FALLBACK_COLOR)),
        ..RunStyle::default()
    };

    DocumentNode::Paragraph(ParagraphNode {
        runs: styled_runs(&stripped, &base, styles),
        indent: Indent {
            left_twip: styles
                .f64_or("blockquote.leftIndent", FALLBACK_LEFT_INDENT)
                .round() as i64,
            first_line_twip: styles.f64_or("blockquote.firstLineIndent", 0.0).round() as i64,
        },
        borders: Some(ParagraphBorders::left_only(BorderLine::single(
            styles.str_or("blockquote.borderColor", FALLBACK_BORDER_COLOR),
            BORDER_SIZE,
        ))),
        ..ParagraphNode::default()
    })
}

/// Drops the leading `>` markers line by line, however deep the quote.
fn strip_quote_markers(text: &str) -> String {
    text.lines()
        .map(|line| {
            let mut rest = line.trim_start();
            while let Some(after) = rest.strip_prefix('>') {
                rest = after.strip_prefix(' ').unwrap_or(after);
            }
            rest
        })
        .collect::<Vec<_>>()
        .join("\n")
}
