use std::collections::{BTreeMap, HashMap};

use crate::document::builders::{self, BuildContext, footnote};
use crate::document::model::{
    DocGrid, DocumentMetadata, DocumentModel, PageGeometry, PageMargins, PageOrientation,
};
use crate::document::numbering::NumberingRegistry;
use crate::images::FetchedImage;
use crate::markdown::tokens::Token;
use crate::style::StyleTree;
use crate::style::units::mm_to_twip;

/// Drives one conversion: footnote extraction, body building in token
/// order, the sorted footnote section, then final packaging with page
/// geometry and numbering definitions. Holds no state across calls; each
/// `convert` is self-contained.
pub struct DocumentAssembler<'a> {
    styles: &'a StyleTree,
    fetched: &'a HashMap<String, FetchedImage>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(styles: &'a StyleTree, fetched: &'a HashMap<String, FetchedImage>) -> Self {
        Self { styles, fetched }
    }

    pub fn convert(&self, tokens: &[Token], metadata: DocumentMetadata) -> DocumentModel {
        let footnotes = extract_footnotes(tokens);
        let cx = BuildContext {
            styles: self.styles,
            fetched: self.fetched,
        };

        let mut nodes = Vec::new();
        for token in tokens {
            if matches!(token, Token::FootnoteDefinition { .. }) {
                continue;
            }
            nodes.extend(builders::build(token, &cx));
        }

        if !footnotes.is_empty() {
            nodes.extend(footnote::section(&footnotes, self.styles));
        }

        DocumentModel {
            metadata,
            nodes,
            numbering: NumberingRegistry::from_styles(self.styles),
            page: page_geometry(self.styles),
        }
    }
}

/// Single forward pass; later definitions of the same label win, matching
/// the rebuild-per-conversion contract.
pub fn extract_footnotes(tokens: &[Token]) -> BTreeMap<String, String> {
    let mut footnotes = BTreeMap::new();
    for token in tokens {
        if let Token::FootnoteDefinition { label, text } = token {
            footnotes.insert(label.clone(), text.clone());
        }
    }
    footnotes
}

fn page_geometry(styles: &StyleTree) -> PageGeometry {
    let (width_mm, height_mm) = match styles.str_or("document.pageSize", "A4").as_str() {
        "Letter" | "letter" => (215.9, 279.4),
        "Legal" | "legal" => (215.9, 355.6),
        _ => (210.0, 297.0),
    };
    let orientation = match styles
        .str_or("document.pageOrientation", "portrait")
        .as_str()
    {
        "landscape" => PageOrientation::Landscape,
        _ => PageOrientation::Portrait,
    };
    let (width_mm, height_mm) = match orientation {
        PageOrientation::Landscape => (height_mm, width_mm),
        PageOrientation::Portrait => (width_mm, height_mm),
    };

    let char_per_line = styles.f64_or("document.grid.charPerLine", 0.0).round() as u32;
    let line_per_page = styles.f64_or("document.grid.linePerPage", 0.0).round() as u32;
    let grid = (char_per_line > 0 && line_per_page > 0).then_some(DocGrid {
        char_per_line,
        line_per_page,
    });

    PageGeometry {
        width_twip: mm_to_twip(width_mm),
        height_twip: mm_to_twip(height_mm),
        orientation,
        margins: PageMargins {
            top_twip: mm_to_twip(styles.f64_or("document.margins.top", 25.4)),
            bottom_twip: mm_to_twip(styles.f64_or("document.margins.bottom", 25.4)),
            left_twip: mm_to_twip(styles.f64_or("document.margins.left", 31.8)),
            right_twip: mm_to_twip(styles.f64_or("document.margins.right", 31.8)),
        },
        grid,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::model::DocumentNode;
    use crate::markdown::tokens::{CellValue, ListItem, ListToken};

    fn convert(tokens: &[Token]) -> DocumentModel {
        let styles = StyleTree::default();
        let fetched = HashMap::new();
        DocumentAssembler::new(&styles, &fetched).convert(tokens, DocumentMetadata::default())
    }

    fn paragraph_text(node: &DocumentNode) -> String {
        match node {
            DocumentNode::Paragraph(p) => p.runs.iter().map(|r| r.text.as_str()).collect(),
            DocumentNode::Table(_) => panic!("expected a paragraph"),
        }
    }

    #[test]
    fn body_nodes_follow_token_order() {
        let tokens = vec![
            Token::Heading {
                depth: 1,
                text: "Title".to_string(),
            },
            Token::Paragraph {
                text: "Body".to_string(),
            },
            Token::Hr,
        ];
        let model = convert(&tokens);
        assert_eq!(model.nodes.len(), 3);
        assert_eq!(paragraph_text(&model.nodes[0]), "Title");
        assert_eq!(paragraph_text(&model.nodes[1]), "Body");
    }

    #[test]
    fn footnote_definitions_leave_the_body_and_append_sorted() {
        let tokens = vec![
            Token::Paragraph {
                text: "claim[^2] and claim[^1]".to_string(),
            },
            Token::FootnoteDefinition {
                label: "2".to_string(),
                text: "second".to_string(),
            },
            Token::FootnoteDefinition {
                label: "1".to_string(),
                text: "first".to_string(),
            },
        ];
        let model = convert(&tokens);
        // paragraph, rule, "Footnotes" heading, two entries
        assert_eq!(model.nodes.len(), 5);
        assert_eq!(paragraph_text(&model.nodes[2]), "Footnotes");
        assert!(paragraph_text(&model.nodes[3]).starts_with('1'));
        assert!(paragraph_text(&model.nodes[4]).starts_with('2'));
    }

    #[test]
    fn no_footnote_section_without_definitions() {
        let model = convert(&[Token::Paragraph {
            text: "plain".to_string(),
        }]);
        assert_eq!(model.nodes.len(), 1);
    }

    #[test]
    fn failed_image_does_not_stop_later_tokens() {
        let tokens = vec![
            Token::Image {
                src: "missing.png".to_string(),
                alt: "gone".to_string(),
                title: None,
            },
            Token::Paragraph {
                text: "still here".to_string(),
            },
        ];
        let model = convert(&tokens);
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(paragraph_text(&model.nodes[0]), "gone");
        assert_eq!(paragraph_text(&model.nodes[1]), "still here");
    }

    #[test]
    fn mixed_body_with_list_and_table_flattens_in_order() {
        let tokens = vec![
            Token::List(ListToken {
                ordered: false,
                start: 1,
                items: vec![
                    ListItem {
                        text: "one".to_string(),
                        nested: Vec::new(),
                    },
                    ListItem {
                        text: "two".to_string(),
                        nested: Vec::new(),
                    },
                ],
            }),
            Token::Table {
                header: vec![CellValue::Plain("h".to_string())],
                rows: vec![vec![CellValue::Plain("v".to_string())]],
            },
        ];
        let model = convert(&tokens);
        assert_eq!(model.nodes.len(), 3);
        assert!(matches!(model.nodes[2], DocumentNode::Table(_)));
    }

    #[test]
    fn page_geometry_follows_document_styles() {
        let styles = StyleTree::with_overrides(&json!({
            "document": {
                "pageSize": "Letter",
                "pageOrientation": "landscape",
                "margins": { "top": 20.0, "bottom": 20.0, "left": 20.0, "right": 20.0 },
                "grid": { "charPerLine": 40, "linePerPage": 35 }
            }
        }));
        let fetched = HashMap::new();
        let model =
            DocumentAssembler::new(&styles, &fetched).convert(&[], DocumentMetadata::default());
        assert_eq!(model.page.orientation, PageOrientation::Landscape);
        // landscape letter: width is the long edge
        assert!(model.page.width_twip > model.page.height_twip);
        assert_eq!(model.page.margins.top_twip, mm_to_twip(20.0));
        let grid = model.page.grid.expect("grid configured");
        assert_eq!(grid.char_per_line, 40);
        assert_eq!(grid.line_per_page, 35);
    }

    #[test]
    fn default_page_is_a4_portrait_without_grid() {
        let model = convert(&[]);
        assert_eq!(model.page.width_twip, 11907);
        assert_eq!(model.page.height_twip, 16840);
        assert!(model.page.grid.is_none());
    }

    #[test]
    fn numbering_schemes_ride_along_with_the_model() {
        let model = convert(&[]);
        assert_eq!(model.numbering.bullet.levels.len(), 3);
        assert_eq!(model.numbering.ordered.levels.len(), 3);
    }
}
