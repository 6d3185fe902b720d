use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::docx::xml::{self, RelContext};
use crate::document::model::DocumentModel;
use crate::error::ConvertError;

pub fn write_docx(path: &Path, model: &DocumentModel) -> Result<(), ConvertError> {
    let file = File::create(path)?;
    write_package(file, model)
}

/// Assembles the complete package: content types, relationships, the
/// document body, styles, numbering, core properties and media payloads.
pub fn write_package<W: Write + Seek>(writer: W, model: &DocumentModel) -> Result<(), ConvertError> {
    let mut rels = RelContext::default();
    let document = xml::document_xml(model, &mut rels);

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(xml::content_types_xml(&rels.images).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(xml::root_rels_xml().as_bytes())?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(xml::core_xml(&model.metadata).as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document.as_bytes())?;

    zip.start_file("word/styles.xml", options)?;
    zip.write_all(xml::styles_xml().as_bytes())?;

    zip.start_file("word/numbering.xml", options)?;
    zip.write_all(xml::numbering_xml(&model.numbering).as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", options)?;
    zip.write_all(xml::document_rels_xml(&rels).as_bytes())?;

    for image in &rels.images {
        zip.start_file(format!("word/media/{}", image.file_name), options)?;
        zip.write_all(&image.bytes)?;
    }

    zip.finish()?;
    Ok(())
}
