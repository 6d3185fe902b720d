use std::collections::BTreeMap;

use crate::document::builders::{heading, paragraph, rule, styled_runs};
use crate::document::model::{DocumentNode, ParagraphNode, Run, RunStyle};
use crate::style::StyleTree;

const SIZE_DROP_PT: f64 = 3.0;

/// The appended footnote section: a rule, a "Footnotes" heading, then one
/// entry per label. The map's own ordering gives the sorted label order.
pub fn section(footnotes: &BTreeMap<String, String>, styles: &StyleTree) -> Vec<DocumentNode> {
    let mut nodes = vec![rule::build(), heading::build(2, "Footnotes", styles)];
    for (label, body) in footnotes {
        nodes.push(entry(label, body, styles));
    }
    nodes
}

fn entry(label: &str, body: &str, styles: &StyleTree) -> DocumentNode {
    let paragraph_size = styles.f64_or("paragraph.size", 11.0);
    let base = RunStyle {
        size_pt: Some(styles.f64_or("footnote.size", paragraph_size - SIZE_DROP_PT)),
        ..crate::document::builders::paragraph_base(styles)
    };

    let mut runs = vec![Run::text_with(
        label,
        RunStyle {
            superscript: true,
            ..base.clone()
        },
    )];
    runs.push(Run::text_with(" ", base.clone()));
    runs.extend(styled_runs(body, &base, styles));

    DocumentNode::Paragraph(ParagraphNode {
        runs,
        spacing: paragraph::body_spacing(styles),
        ..ParagraphNode::default()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn labels_in_order(nodes: &[DocumentNode]) -> Vec<String> {
        nodes
            .iter()
            .skip(2)
            .map(|node| {
                let DocumentNode::Paragraph(p) = node else {
                    panic!("expected a paragraph");
                };
                p.runs[0].text.clone()
            })
            .collect()
    }

    #[test]
    fn section_renders_labels_in_sorted_order() {
        let mut footnotes = BTreeMap::new();
        footnotes.insert("2".to_string(), "second".to_string());
        footnotes.insert("1".to_string(), "first".to_string());
        let nodes = section(&footnotes, &StyleTree::default());
        assert_eq!(labels_in_order(&nodes), vec!["1", "2"]);
    }

    #[test]
    fn section_opens_with_rule_and_heading() {
        let mut footnotes = BTreeMap::new();
        footnotes.insert("1".to_string(), "body".to_string());
        let nodes = section(&footnotes, &StyleTree::default());
        let DocumentNode::Paragraph(rule) = &nodes[0] else {
            panic!();
        };
        assert!(rule.runs.is_empty());
        let DocumentNode::Paragraph(heading) = &nodes[1] else {
            panic!();
        };
        assert_eq!(heading.runs[0].text, "Footnotes");
    }

    #[test]
    fn label_is_superscript_and_body_runs_smaller() {
        let mut footnotes = BTreeMap::new();
        footnotes.insert("1".to_string(), "the source".to_string());
        let nodes = section(&footnotes, &StyleTree::default());
        let DocumentNode::Paragraph(p) = &nodes[2] else {
            panic!();
        };
        assert!(p.runs[0].style.superscript);
        // paragraph default 11pt, minus the 3pt drop
        assert_eq!(p.runs[0].style.size_pt, Some(8.0));
        assert_eq!(p.runs[2].style.size_pt, Some(8.0));
        assert!(!p.runs[2].style.superscript);
    }

    #[test]
    fn footnote_size_override_wins() {
        let styles = StyleTree::with_overrides(&json!({ "footnote": { "size": 9.5 } }));
        let mut footnotes = BTreeMap::new();
        footnotes.insert("1".to_string(), "body".to_string());
        let nodes = section(&footnotes, &styles);
        let DocumentNode::Paragraph(p) = &nodes[2] else {
            panic!();
        };
        assert_eq!(p.runs[0].style.size_pt, Some(9.5));
    }
}
