use crate::document::builders::{DEFAULT_PARAGRAPH_FONT, DEFAULT_PARAGRAPH_SIZE, styled_runs};
use crate::document::model::{
    DocumentNode, Indent, NumberingRef, ParagraphNode, RunStyle, SchemeKind, Spacing,
};
use crate::document::numbering::{MAX_ITEM_LEVEL, clamp_level, level_indent};
use crate::style::StyleTree;

/// Ordered items are bold at the top level only; the deeper levels of the
/// fixed scheme are regular weight.
const ORDERED_LEVEL_BOLD: [bool; 4] = [true, false, false, false];

const TASK_CHECKED: &str = "☑ ";
const TASK_OPEN: &str = "☐ ";

pub fn build(list: &crate::markdown::tokens::ListToken, styles: &StyleTree) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();
    walk(list, 0, styles, &mut nodes);
    nodes
}

fn walk(
    list: &crate::markdown::tokens::ListToken,
    level: u8,
    styles: &StyleTree,
    nodes: &mut Vec<DocumentNode>,
) {
    let task_list = !list.ordered
        && list
            .items
            .first()
            .map(|item| item.text.starts_with("[x]") || item.text.starts_with("[ ]"))
            .unwrap_or(false);

    for item in &list.items {
        nodes.push(item_paragraph(&item.text, list.ordered, task_list, level, styles));
        for nested in &item.nested {
            walk(nested, (level + 1).min(MAX_ITEM_LEVEL), styles, nodes);
        }
    }
}

fn item_paragraph(
    text: &str,
    ordered: bool,
    task_list: bool,
    level: u8,
    styles: &StyleTree,
) -> DocumentNode {
    let group = if ordered { "list.ordered" } else { "list.unordered" };
    let clamped = clamp_level(level) as u8;
    let base_indent = styles.f64_or(&format!("{group}.indentLevel"), 420.0);

    let base = RunStyle {
        font: Some(styles.str_or(&format!("{group}.font"), DEFAULT_PARAGRAPH_FONT)),
        size_pt: Some(styles.f64_or(&format!("{group}.size"), DEFAULT_PARAGRAPH_SIZE)),
        bold: ordered && ORDERED_LEVEL_BOLD[level.min(MAX_ITEM_LEVEL) as usize],
        ..RunStyle::default()
    };

    let (text, numbering, marker) = if task_list {
        let (marker, rest) = split_task_marker(text);
        (rest, None, Some(marker))
    } else {
        let scheme = if ordered {
            SchemeKind::Ordered
        } else {
            SchemeKind::Bullet
        };
        (
            text.to_string(),
            Some(NumberingRef {
                scheme,
                level: clamped,
            }),
            None,
        )
    };

    let mut runs = styled_runs(&text, &base, styles);
    if let Some(marker) = marker {
        runs.insert(
            0,
            crate::document::model::Run::text_with(marker, base.clone()),
        );
    }

    DocumentNode::Paragraph(ParagraphNode {
        runs,
        indent: Indent {
            left_twip: level_indent(base_indent, clamped),
            first_line_twip: 0,
        },
        numbering,
        spacing: Spacing::default(),
        ..ParagraphNode::default()
    })
}

fn split_task_marker(text: &str) -> (String, String) {
    let (glyph, rest) = if let Some(rest) = text.strip_prefix("[x]") {
        (TASK_CHECKED, rest)
    } else if let Some(rest) = text.strip_prefix("[ ]") {
        (TASK_OPEN, rest)
    } else {
        ("", text)
    };
    (glyph.to_string(), rest.trim_start().to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::markdown::tokens::{ListItem, ListToken};

    fn item(text: &str) -> ListItem {
        ListItem {
            text: text.to_string(),
            nested: Vec::new(),
        }
    }

    fn paragraphs(nodes: Vec<DocumentNode>) -> Vec<ParagraphNode> {
        nodes
            .into_iter()
            .map(|n| match n {
                DocumentNode::Paragraph(p) => p,
                DocumentNode::Table(_) => panic!("unexpected table"),
            })
            .collect()
    }

    fn deeply_nested(depth: usize) -> ListToken {
        let mut list = ListToken {
            ordered: false,
            start: 1,
            items: vec![item(&format!("level {depth}"))],
        };
        for level in (0..depth - 1).rev() {
            let mut outer_item = item(&format!("level {level}"));
            outer_item.nested.push(list);
            list = ListToken {
                ordered: false,
                start: 1,
                items: vec![outer_item],
            };
        }
        list
    }

    #[test]
    fn unordered_items_reference_the_bullet_scheme() {
        let list = ListToken {
            ordered: false,
            start: 1,
            items: vec![item("one"), item("two")],
        };
        let nodes = paragraphs(build(&list, &StyleTree::default()));
        assert_eq!(nodes.len(), 2);
        let numbering = nodes[0].numbering.expect("bullet numbering");
        assert_eq!(numbering.scheme, SchemeKind::Bullet);
        assert_eq!(numbering.level, 0);
    }

    #[test]
    fn ordered_items_are_bold_only_at_the_top_level() {
        let mut top = item("top");
        top.nested.push(ListToken {
            ordered: true,
            start: 1,
            items: vec![item("inner")],
        });
        let list = ListToken {
            ordered: true,
            start: 1,
            items: vec![top],
        };
        let nodes = paragraphs(build(&list, &StyleTree::default()));
        assert!(nodes[0].runs[0].style.bold);
        assert!(!nodes[1].runs[0].style.bold);
    }

    #[test]
    fn six_levels_deep_clamps_to_the_last_defined_level() {
        let nodes = paragraphs(build(&deeply_nested(6), &StyleTree::default()));
        assert_eq!(nodes.len(), 6);

        let deepest = &nodes[5];
        let third = &nodes[2];
        let numbering = deepest.numbering.expect("numbering survives clamping");
        assert_eq!(numbering.level, 2);
        assert_eq!(deepest.indent.left_twip, third.indent.left_twip);
    }

    #[test]
    fn indent_scales_linearly_until_the_clamp() {
        let nodes = paragraphs(build(&deeply_nested(3), &StyleTree::default()));
        assert_eq!(nodes[0].indent.left_twip, 420);
        assert_eq!(nodes[1].indent.left_twip, 840);
        assert_eq!(nodes[2].indent.left_twip, 1260);
    }

    #[test]
    fn task_items_swap_markers_for_glyphs() {
        let list = ListToken {
            ordered: false,
            start: 1,
            items: vec![item("[x] shipped"), item("[ ] pending")],
        };
        let nodes = paragraphs(build(&list, &StyleTree::default()));
        assert!(nodes[0].numbering.is_none());
        assert_eq!(nodes[0].runs[0].text, "☑ ");
        assert_eq!(nodes[0].runs[1].text, "shipped");
        assert_eq!(nodes[1].runs[0].text, "☐ ");
    }

    #[test]
    fn configured_fonts_apply_per_scheme() {
        let styles = StyleTree::with_overrides(&json!({
            "list": { "ordered": { "font": "Georgia" } }
        }));
        let list = ListToken {
            ordered: true,
            start: 1,
            items: vec![item("one")],
        };
        let nodes = paragraphs(build(&list, &styles));
        assert_eq!(nodes[0].runs[0].style.font.as_deref(), Some("Georgia"));
    }
}
