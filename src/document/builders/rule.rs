use crate::document::model::{
    BorderLine, DocumentNode, LineRule, ParagraphBorders, ParagraphNode, Spacing,
};

const RULE_COLOR: &str = "A0A0A0";

/// A horizontal rule is an empty paragraph whose bottom border draws the
/// line.
pub fn build() -> DocumentNode {
    DocumentNode::Paragraph(ParagraphNode {
        runs: Vec::new(),
        borders: Some(ParagraphBorders::bottom_only(BorderLine::single(
            RULE_COLOR, 6,
        ))),
        spacing: Spacing {
            before_twip: 120,
            after_twip: 120,
            line: 240,
            rule: LineRule::Auto,
        },
        ..ParagraphNode::default()
    })
}
