use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structural unit of the parsed Markdown stream.
///
/// The engine consumes these; it does not care who produced them. The
/// bundled lexer builds them from pulldown-cmark events, tests build them
/// by hand. Raw text fields keep the original inline markers (`**`, `~~`,
/// backticks, `[^label]`) so the inline tokenizer can do its own pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    Heading {
        depth: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List(ListToken),
    Table {
        #[serde(default)]
        header: Vec<CellValue>,
        #[serde(default)]
        rows: Vec<Vec<CellValue>>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    /// Raw quote text, leading `>` markers still present.
    Blockquote {
        text: String,
    },
    Hr,
    Space,
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    Link {
        text: String,
        href: String,
    },
    FootnoteDefinition {
        label: String,
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListToken {
    pub ordered: bool,
    pub start: u64,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub text: String,
    #[serde(default)]
    pub nested: Vec<ListToken>,
}

/// Table cell content as it arrives from upstream.
///
/// Three shapes exist in the wild: a plain string, a JSON-encoded string of
/// the form `{"text": ...}`, and an already-structured object. They are
/// normalized exactly once, here, so the table builder only ever sees text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Structured { text: String },
    Plain(String),
}

impl CellValue {
    pub fn normalized(&self) -> String {
        match self {
            CellValue::Structured { text } => text.clone(),
            CellValue::Plain(raw) => {
                if raw.trim_start().starts_with('{') {
                    if let Ok(value) = serde_json::from_str::<Value>(raw) {
                        match value.get("text") {
                            Some(Value::String(text)) => return text.clone(),
                            Some(other) => return other.to_string(),
                            None => {}
                        }
                    }
                }
                raw.clone()
            }
        }
    }
}
