use crate::document::builders::DEFAULT_CODE_FONT;
use crate::document::model::{
    BorderLine, DocumentNode, ParagraphBorders, ParagraphNode, Run, RunStyle,
};
use crate::style::StyleTree;

const FALLBACK_SIZE: f64 = 10.0;
const FALLBACK_COLOR: &str = "333333";
const FALLBACK_BACKGROUND: &str = "F5F5F5";
const BORDER_COLOR: &str = "D0D0D0";

pub fn build(text: &str, styles: &StyleTree) -> DocumentNode {
    let text = restore_lost_newlines(text);

    let style = RunStyle {
        font: Some(styles.str_or("code.font", DEFAULT_CODE_FONT)),
        size_pt: Some(styles.f64_or("code.size", FALLBACK_SIZE)),
        color: Some(styles.str_or("code.color", FALLBACK_COLOR)),
        ..RunStyle::default()
    };

    DocumentNode::Paragraph(ParagraphNode {
        runs: vec![Run::text_with(text, style)],
        borders: Some(ParagraphBorders::boxed(BorderLine::single(BORDER_COLOR, 4))),
        shading: Some(styles.str_or("code.backgroundColor", FALLBACK_BACKGROUND)),
        ..ParagraphNode::default()
    })
}

/// Pasted code sometimes arrives with its line breaks flattened away. When
/// a block has none at all, re-insert one after each `{` and `;` so the
/// result is at least readable.
fn restore_lost_newlines(text: &str) -> String {
    if text.contains('\n') || !(text.contains('{') || text.contains(';')) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        out.push(ch);
        if ch == '{' || ch == ';' {
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(node: &DocumentNode) -> String {
        let DocumentNode::Paragraph(p) = node else {
            panic!("expected a paragraph");
        };
        p.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn multi_line_code_is_left_untouched() {
        let source = "fn main() {\n    run();\n}";
        assert_eq!(text_of(&build(source, &StyleTree::default())), source);
    }

    #[test]
    fn flattened_code_gets_newlines_after_braces_and_semicolons() {
        let node = build("fn main() { run(); }", &StyleTree::default());
        assert_eq!(text_of(&node), "fn main() {\n run();\n }");
    }

    #[test]
    fn prose_without_code_punctuation_is_untouched() {
        let node = build("plain snippet", &StyleTree::default());
        assert_eq!(text_of(&node), "plain snippet");
    }

    #[test]
    fn code_block_is_boxed_and_shaded() {
        let DocumentNode::Paragraph(p) = build("x = 1", &StyleTree::default()) else {
            panic!();
        };
        let borders = p.borders.expect("boxed borders");
        assert!(borders.top.is_some() && borders.bottom.is_some());
        assert_eq!(p.shading.as_deref(), Some("F5F5F5"));
        assert_eq!(p.runs[0].style.font.as_deref(), Some("Consolas"));
    }

    #[test]
    fn emphasis_markers_are_not_parsed_inside_code() {
        let node = build("a = b ** c", &StyleTree::default());
        assert_eq!(text_of(&node), "a = b ** c");
    }
}
