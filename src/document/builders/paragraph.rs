use crate::document::builders::{LINK_COLOR, paragraph_base, styled_runs};
use crate::document::model::{
    Alignment, DocumentNode, Indent, LineRule, ParagraphNode, Run, RunStyle, Spacing,
};
use crate::style::StyleTree;
use crate::style::units::pt_to_twip;

const FALLBACK_FIRST_LINE_INDENT: f64 = 800.0;
const FALLBACK_LINE_SPACING: f64 = 1.15;
const FALLBACK_SPACE_AFTER_PT: f64 = 8.0;

pub fn build(text: &str, styles: &StyleTree) -> DocumentNode {
    DocumentNode::Paragraph(ParagraphNode {
        runs: styled_runs(text, &paragraph_base(styles), styles),
        alignment: Alignment::from_key(&styles.str_or("paragraph.alignment", "justify")),
        spacing: body_spacing(styles),
        indent: Indent {
            left_twip: 0,
            first_line_twip: styles
                .f64_or("paragraph.firstLineIndent", FALLBACK_FIRST_LINE_INDENT)
                .round() as i64,
        },
        ..ParagraphNode::default()
    })
}

/// A bare link token renders as a one-run paragraph.
pub fn build_link(text: &str, href: &str, styles: &StyleTree) -> DocumentNode {
    let style = RunStyle {
        color: Some(LINK_COLOR.to_string()),
        underline: true,
        ..paragraph_base(styles)
    };
    DocumentNode::Paragraph(ParagraphNode {
        runs: vec![Run {
            text: text.to_string(),
            style,
            link: Some(href.to_string()),
            image: None,
        }],
        spacing: body_spacing(styles),
        ..ParagraphNode::default()
    })
}

/// `exact` spacing is a point value (x20 to twips); anything else is a
/// line-height multiplier (x240 to 240ths).
pub(crate) fn body_spacing(styles: &StyleTree) -> Spacing {
    let rule = styles.str_or("paragraph.lineSpacingRule", "auto");
    let value = styles.f64_or("paragraph.lineSpacing", FALLBACK_LINE_SPACING);
    let (line, rule) = if rule == "exact" {
        ((value * 20.0).round() as i64, LineRule::Exact)
    } else {
        ((value * 240.0).round() as i64, LineRule::Auto)
    };
    Spacing {
        before_twip: 0,
        after_twip: pt_to_twip(styles.f64_or("paragraph.spacing", FALLBACK_SPACE_AFTER_PT)),
        line,
        rule,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_paragraph_is_justified_with_first_line_indent() {
        let DocumentNode::Paragraph(p) = build("body text", &StyleTree::default()) else {
            panic!("expected a paragraph");
        };
        assert_eq!(p.alignment, Alignment::Justify);
        assert_eq!(p.indent.first_line_twip, 800);
    }

    #[test]
    fn multiplier_spacing_converts_at_240() {
        let styles = StyleTree::with_overrides(&json!({
            "paragraph": { "lineSpacingRule": "auto", "lineSpacing": 1.5 }
        }));
        let spacing = body_spacing(&styles);
        assert_eq!(spacing.rule, LineRule::Auto);
        assert_eq!(spacing.line, 360);
    }

    #[test]
    fn exact_spacing_converts_at_20() {
        let styles = StyleTree::with_overrides(&json!({
            "paragraph": { "lineSpacingRule": "exact", "lineSpacing": 18.0 }
        }));
        let spacing = body_spacing(&styles);
        assert_eq!(spacing.rule, LineRule::Exact);
        assert_eq!(spacing.line, 360);
    }

    #[test]
    fn inline_markup_becomes_multiple_runs() {
        let DocumentNode::Paragraph(p) = build("a **b** c", &StyleTree::default()) else {
            panic!();
        };
        assert_eq!(p.runs.len(), 3);
        assert!(p.runs[1].style.bold);
    }

    #[test]
    fn link_token_builds_one_linked_run() {
        let DocumentNode::Paragraph(p) =
            build_link("example", "https://example.com", &StyleTree::default())
        else {
            panic!();
        };
        assert_eq!(p.runs.len(), 1);
        assert_eq!(p.runs[0].link.as_deref(), Some("https://example.com"));
    }
}
