pub mod writer;
pub mod xml;

pub use writer::{write_docx, write_package};
