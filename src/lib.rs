pub mod document;
pub mod docx;
pub mod error;
pub mod images;
pub mod markdown;
pub mod style;

use std::fs;
use std::path::Path;

use serde_json::Value;

pub use document::{DocumentAssembler, DocumentModel};
pub use error::ConvertError;
pub use style::StyleTree;

/// Full pipeline over a Markdown string: tokenize, prefetch images through
/// `provider`, assemble. Element-level trouble surfaces as placeholder text
/// in the model, never as an error.
pub fn convert_markdown(
    source: &str,
    overrides: Option<&Value>,
    provider: &dyn images::ImageProvider,
) -> DocumentModel {
    let styles = overrides
        .map(StyleTree::with_overrides)
        .unwrap_or_default();
    let tokens = markdown::parse_tokens(source);
    let fetched = images::prefetch(&tokens, provider);
    DocumentAssembler::new(&styles, &fetched).convert(&tokens, Default::default())
}

/// Converts a Markdown file, resolving relative image references against
/// its parent directory.
pub fn convert_file(path: &Path, overrides: Option<&Value>) -> Result<DocumentModel, ConvertError> {
    let source = fs::read_to_string(path).map_err(|source| ConvertError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let provider = images::LocalFileProvider::new(base);
    Ok(convert_markdown(&source, overrides, &provider))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::DocumentNode;
    use crate::images::NoImages;

    fn text_of(node: &DocumentNode) -> String {
        match node {
            DocumentNode::Paragraph(p) => p.runs.iter().map(|r| r.text.as_str()).collect(),
            DocumentNode::Table(_) => panic!("expected a paragraph"),
        }
    }

    #[test]
    fn full_document_converts_in_order() {
        let source = "\
# Title

Intro paragraph with **bold** text.

- first
- second

> a quote

---
";
        let model = convert_markdown(source, None, &NoImages);
        assert_eq!(model.nodes.len(), 6);
        assert_eq!(text_of(&model.nodes[0]), "Title");
        assert!(text_of(&model.nodes[1]).contains("bold"));
        assert_eq!(text_of(&model.nodes[4]), "a quote");
    }

    #[test]
    fn footnotes_append_sorted_regardless_of_definition_order() {
        let source = "\
Both claims[^2] hold[^1].

[^2]: second source
[^1]: first source
";
        let model = convert_markdown(source, None, &NoImages);
        let texts: Vec<String> = model.nodes.iter().map(text_of).collect();
        let heading_at = texts
            .iter()
            .position(|t| t == "Footnotes")
            .expect("footnote section heading");
        assert!(texts[heading_at + 1].starts_with('1'));
        assert!(texts[heading_at + 2].starts_with('2'));
    }

    #[test]
    fn style_overrides_reach_the_builders() {
        let overrides = json!({
            "heading": { "usePrefix": { "h2": true }, "prefix": { "h2": "一、" } }
        });
        let model = convert_markdown("## Intro\n", Some(&overrides), &NoImages);
        assert_eq!(text_of(&model.nodes[0]), "一、Intro");
    }

    #[test]
    fn missing_image_yields_placeholder_and_conversion_continues() {
        let source = "![gone](missing.png)\n\nafter\n";
        let model = convert_markdown(source, None, &NoImages);
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(text_of(&model.nodes[0]), "gone");
        assert_eq!(text_of(&model.nodes[1]), "after");
    }

    #[test]
    fn tables_survive_the_full_pipeline() {
        let source = "| Name | Age |\n| --- | --- |\n| Bob | 42 |\n";
        let model = convert_markdown(source, None, &NoImages);
        let DocumentNode::Table(table) = &model.nodes[0] else {
            panic!("expected a table, got {:?}", model.nodes);
        };
        assert_eq!(table.column_widths_twip, vec![4000, 4000]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = convert_file(Path::new("/no/such/file.md"), None).expect_err("missing file");
        assert!(matches!(err, ConvertError::ReadInput { .. }));
    }
}
