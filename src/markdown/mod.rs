pub mod inline;
pub mod lexer;
pub mod tokens;

pub use inline::{InlineRun, RunKind, tokenize};
pub use lexer::{parse_tokens, parser_options};
pub use tokens::{CellValue, ListItem, ListToken, Token};
