pub mod blockquote;
pub mod code;
pub mod footnote;
pub mod heading;
pub mod image;
pub mod list;
pub mod paragraph;
pub mod rule;
pub mod table;

use std::collections::HashMap;

use crate::document::model::{DocumentNode, ParagraphNode, Run, RunStyle};
use crate::images::FetchedImage;
use crate::markdown::inline::{self, InlineRun, RunKind};
use crate::markdown::tokens::Token;
use crate::style::StyleTree;

pub(crate) const DEFAULT_PARAGRAPH_FONT: &str = "Calibri";
pub(crate) const DEFAULT_PARAGRAPH_SIZE: f64 = 11.0;
pub(crate) const DEFAULT_TEXT_COLOR: &str = "000000";
pub(crate) const DEFAULT_CODE_FONT: &str = "Consolas";
pub(crate) const LINK_COLOR: &str = "0563C1";

pub struct BuildContext<'a> {
    pub styles: &'a StyleTree,
    /// Pre-fetched image bytes keyed by source reference; absent entries
    /// take the placeholder path.
    pub fetched: &'a HashMap<String, FetchedImage>,
}

/// Maps one token to its document nodes. Total: any syntactically
/// plausible token yields renderable output, never an error.
pub fn build(token: &Token, cx: &BuildContext) -> Vec<DocumentNode> {
    match token {
        Token::Heading { depth, text } => vec![heading::build(*depth, text, cx.styles)],
        Token::Paragraph { text } => vec![paragraph::build(text, cx.styles)],
        Token::List(list) => list::build(list, cx.styles),
        Token::Table { header, rows } => vec![table::build(header, rows, cx.styles)],
        Token::Code { language: _, text } => vec![code::build(text, cx.styles)],
        Token::Blockquote { text } => vec![blockquote::build(text, cx.styles)],
        Token::Hr => vec![rule::build()],
        Token::Space => Vec::new(),
        Token::Image { src, alt, .. } => vec![image::build(src, alt, cx)],
        Token::Link { text, href } => vec![paragraph::build_link(text, href, cx.styles)],
        // Definitions are pulled out before body building; a stray one is
        // simply dropped rather than rendered twice.
        Token::FootnoteDefinition { .. } => Vec::new(),
    }
}

/// Base character style shared by body-level text.
pub(crate) fn paragraph_base(styles: &StyleTree) -> RunStyle {
    RunStyle {
        font: Some(styles.str_or("paragraph.font", DEFAULT_PARAGRAPH_FONT)),
        size_pt: Some(styles.f64_or("paragraph.size", DEFAULT_PARAGRAPH_SIZE)),
        color: Some(styles.str_or("paragraph.color", DEFAULT_TEXT_COLOR)),
        ..RunStyle::default()
    }
}

/// Inline-tokenizes `text` and lifts each run onto `base`.
pub(crate) fn styled_runs(text: &str, base: &RunStyle, styles: &StyleTree) -> Vec<Run> {
    inline::tokenize(text)
        .into_iter()
        .map(|run| inline_to_run(run, base, styles))
        .collect()
}

fn inline_to_run(run: InlineRun, base: &RunStyle, styles: &StyleTree) -> Run {
    let mut style = base.clone();
    let mut link = None;
    match run.kind {
        RunKind::Text => {}
        RunKind::Bold => style.bold = true,
        RunKind::Italic => style.italic = true,
        RunKind::BoldItalic => {
            style.bold = true;
            style.italic = true;
        }
        RunKind::Strike => style.strikethrough = true,
        RunKind::Underline => style.underline = true,
        RunKind::Code => {
            style.font = Some(styles.str_or("code.font", DEFAULT_CODE_FONT));
            style.color = Some(styles.str_or("code.color", "333333"));
            style.shading = Some(styles.str_or("code.backgroundColor", "F5F5F5"));
        }
        RunKind::Link => {
            style.color = Some(LINK_COLOR.to_string());
            style.underline = true;
            link = run.url;
        }
        RunKind::FootnoteRef => style.superscript = true,
    }
    Run {
        text: run.content,
        style,
        link,
        image: None,
    }
}

/// Recovery path shared by every builder: one visible line in the output
/// instead of an aborted conversion.
pub(crate) fn diagnostic_paragraph(message: impl Into<String>) -> DocumentNode {
    let message = message.into();
    log::warn!("recovered element error: {message}");
    DocumentNode::Paragraph(ParagraphNode {
        runs: vec![Run::text_with(
            format!("[conversion error: {message}]"),
            RunStyle {
                italic: true,
                color: Some("808080".to_string()),
                ..RunStyle::default()
            },
        )],
        ..ParagraphNode::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_kinds_map_onto_style_flags() {
        let styles = StyleTree::default();
        let runs = styled_runs("**b** *i* ~~s~~ <u>u</u>", &paragraph_base(&styles), &styles);
        assert!(runs[0].style.bold);
        assert!(runs[2].style.italic);
        assert!(runs[4].style.strikethrough);
        assert!(runs[6].style.underline);
    }

    #[test]
    fn inline_code_swaps_font_and_shading() {
        let styles = StyleTree::default();
        let runs = styled_runs("`raw`", &paragraph_base(&styles), &styles);
        assert_eq!(runs[0].style.font.as_deref(), Some("Consolas"));
        assert!(runs[0].style.shading.is_some());
    }

    #[test]
    fn link_runs_keep_their_url() {
        let styles = StyleTree::default();
        let runs = styled_runs("[docs](https://example.com)", &paragraph_base(&styles), &styles);
        assert_eq!(runs[0].link.as_deref(), Some("https://example.com"));
        assert!(runs[0].style.underline);
    }

    #[test]
    fn every_styled_run_has_concrete_attributes() {
        let styles = StyleTree::default();
        let runs = styled_runs("plain **bold** `code`", &paragraph_base(&styles), &styles);
        for run in runs {
            assert!(run.style.font.is_some(), "run {:?} lost its font", run.text);
            assert!(run.style.size_pt.is_some());
            assert!(run.style.color.is_some());
        }
    }

    #[test]
    fn diagnostic_paragraph_is_a_single_italic_line() {
        let DocumentNode::Paragraph(p) = diagnostic_paragraph("bad cell") else {
            panic!("expected a paragraph");
        };
        assert_eq!(p.runs.len(), 1);
        assert!(p.runs[0].style.italic);
        assert!(p.runs[0].text.contains("bad cell"));
    }
}
