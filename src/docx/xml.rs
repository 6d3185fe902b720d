use crate::document::model::{
    Alignment, BorderLine, DocumentMetadata, DocumentModel, DocumentNode, LineRule, PageGeometry,
    PageOrientation, ParagraphBorders, ParagraphNode, Run, SchemeKind, TableNode,
};
use crate::document::numbering::{NumberingRegistry, NumberingScheme};
use crate::images::extension_for_mime;
use crate::style::units::{pt_to_half_points, twip_to_emu};

/// Relationship targets discovered while generating the body. The rels
/// part and the media entries are derived from this after the fact.
#[derive(Debug, Default)]
pub struct RelContext {
    pub images: Vec<ImageAsset>,
    pub hyperlinks: Vec<Hyperlink>,
}

#[derive(Debug)]
pub struct ImageAsset {
    pub rel_id: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct Hyperlink {
    pub rel_id: String,
    pub url: String,
}

impl RelContext {
    fn register_image(&mut self, mime: &str, bytes: &[u8]) -> String {
        let index = self.images.len() + 1;
        let rel_id = format!("rMadoImg{index}");
        self.images.push(ImageAsset {
            rel_id: rel_id.clone(),
            file_name: format!("image{index}.{}", extension_for_mime(mime)),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
        });
        rel_id
    }

    fn register_hyperlink(&mut self, url: &str) -> String {
        let index = self.hyperlinks.len() + 1;
        let rel_id = format!("rMadoLink{index}");
        self.hyperlinks.push(Hyperlink {
            rel_id: rel_id.clone(),
            url: url.to_string(),
        });
        rel_id
    }
}

pub fn document_xml(model: &DocumentModel, rels: &mut RelContext) -> String {
    let mut body = String::new();
    for node in &model.nodes {
        match node {
            DocumentNode::Paragraph(p) => body.push_str(&paragraph_xml(p, rels)),
            DocumentNode::Table(t) => body.push_str(&table_xml(t, rels)),
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\n<w:body>{}{}</w:body>\n</w:document>",
        body,
        sect_pr_xml(&model.page)
    )
}

fn paragraph_xml(paragraph: &ParagraphNode, rels: &mut RelContext) -> String {
    let mut out = String::from("<w:p>");
    out.push_str(&paragraph_props_xml(paragraph));
    for run in &paragraph.runs {
        if let Some(url) = &run.link {
            let rel_id = rels.register_hyperlink(url);
            out.push_str(&format!("<w:hyperlink r:id=\"{rel_id}\">"));
            out.push_str(&run_xml(run, rels));
            out.push_str("</w:hyperlink>");
        } else {
            out.push_str(&run_xml(run, rels));
        }
    }
    out.push_str("</w:p>");
    out
}

fn paragraph_props_xml(paragraph: &ParagraphNode) -> String {
    let mut props = String::new();

    if let Some(numbering) = paragraph.numbering {
        props.push_str(&format!(
            "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
            numbering.level,
            scheme_num_id(numbering.scheme)
        ));
    }
    if let Some(borders) = &paragraph.borders {
        props.push_str(&paragraph_borders_xml(borders));
    }
    if let Some(fill) = &paragraph.shading {
        props.push_str(&format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            esc(fill)
        ));
    }

    let spacing = &paragraph.spacing;
    if spacing.before_twip != 0 || spacing.after_twip != 0 || spacing.line != 0 {
        let rule = match spacing.rule {
            LineRule::Auto => "auto",
            LineRule::Exact => "exact",
        };
        props.push_str(&format!(
            "<w:spacing w:before=\"{}\" w:after=\"{}\" w:line=\"{}\" w:lineRule=\"{rule}\"/>",
            spacing.before_twip, spacing.after_twip, spacing.line
        ));
    }

    if paragraph.indent.left_twip != 0 || paragraph.indent.first_line_twip != 0 {
        let mut ind = String::from("<w:ind");
        if paragraph.indent.left_twip != 0 {
            ind.push_str(&format!(" w:left=\"{}\"", paragraph.indent.left_twip));
        }
        if paragraph.indent.first_line_twip != 0 {
            ind.push_str(&format!(
                " w:firstLine=\"{}\"",
                paragraph.indent.first_line_twip
            ));
        }
        ind.push_str("/>");
        props.push_str(&ind);
    }

    if paragraph.alignment != Alignment::Left {
        props.push_str(&format!(
            "<w:jc w:val=\"{}\"/>",
            paragraph.alignment.as_docx()
        ));
    }

    if props.is_empty() {
        String::new()
    } else {
        format!("<w:pPr>{props}</w:pPr>")
    }
}

fn paragraph_borders_xml(borders: &ParagraphBorders) -> String {
    let mut out = String::from("<w:pBdr>");
    for (name, line) in [
        ("top", &borders.top),
        ("left", &borders.left),
        ("bottom", &borders.bottom),
        ("right", &borders.right),
    ] {
        if let Some(line) = line {
            out.push_str(&border_xml(name, line));
        }
    }
    out.push_str("</w:pBdr>");
    out
}

fn border_xml(name: &str, line: &BorderLine) -> String {
    format!(
        "<w:{name} w:val=\"{}\" w:sz=\"{}\" w:space=\"1\" w:color=\"{}\"/>",
        line.kind.as_docx(),
        line.size,
        esc(&line.color)
    )
}

fn run_xml(run: &Run, rels: &mut RelContext) -> String {
    if let Some(anchor) = &run.image {
        let rel_id = rels.register_image(&anchor.mime, &anchor.bytes);
        let index = rels.images.len();
        return format!(
            "<w:r>{}</w:r>",
            drawing_xml(
                &rel_id,
                index,
                &anchor.alt,
                twip_to_emu(anchor.width_twip),
                twip_to_emu(anchor.height_twip)
            )
        );
    }

    let mut props = String::new();
    let style = &run.style;
    if let Some(font) = &style.font {
        let font = esc(font);
        props.push_str(&format!(
            "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:eastAsia=\"{font}\"/>"
        ));
    }
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }
    if style.underline {
        props.push_str("<w:u w:val=\"single\"/>");
    }
    if style.strikethrough {
        props.push_str("<w:strike/>");
    }
    if style.superscript {
        props.push_str("<w:vertAlign w:val=\"superscript\"/>");
    }
    if let Some(color) = &style.color {
        props.push_str(&format!("<w:color w:val=\"{}\"/>", esc(color)));
    }
    if let Some(size) = style.size_pt {
        let half_points = pt_to_half_points(size);
        props.push_str(&format!(
            "<w:sz w:val=\"{half_points}\"/><w:szCs w:val=\"{half_points}\"/>"
        ));
    }
    if let Some(fill) = &style.shading {
        props.push_str(&format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            esc(fill)
        ));
    }

    let mut out = String::from("<w:r>");
    if !props.is_empty() {
        out.push_str(&format!("<w:rPr>{props}</w:rPr>"));
    }
    // Embedded newlines become explicit breaks.
    for (idx, line) in run.text.split('\n').enumerate() {
        if idx > 0 {
            out.push_str("<w:br/>");
        }
        if !line.is_empty() {
            out.push_str(&format!(
                "<w:t xml:space=\"preserve\">{}</w:t>",
                esc(line)
            ));
        }
    }
    out.push_str("</w:r>");
    out
}

fn drawing_xml(rel_id: &str, index: usize, alt: &str, cx: i64, cy: i64) -> String {
    format!(
        "<w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\"><wp:extent cx=\"{cx}\" cy=\"{cy}\"/><wp:docPr id=\"{index}\" name=\"Picture {index}\" descr=\"{alt}\"/><a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\"><pic:pic><pic:nvPicPr><pic:cNvPr id=\"{index}\" name=\"Picture {index}\" descr=\"{alt}\"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed=\"{rel_id}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm><a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>",
        alt = esc(alt)
    )
}

fn table_xml(table: &TableNode, rels: &mut RelContext) -> String {
    let total_width: i64 = table.column_widths_twip.iter().sum();
    let mut out = String::from("<w:tbl><w:tblPr>");
    out.push_str(&format!(
        "<w:tblW w:w=\"{total_width}\" w:type=\"dxa\"/><w:jc w:val=\"{}\"/>",
        table.alignment.as_docx()
    ));
    out.push_str("<w:tblBorders>");
    for name in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        out.push_str(&border_xml(name, &table.borders));
    }
    out.push_str("</w:tblBorders></w:tblPr>");

    out.push_str("<w:tblGrid>");
    for width in &table.column_widths_twip {
        out.push_str(&format!("<w:gridCol w:w=\"{width}\"/>"));
    }
    out.push_str("</w:tblGrid>");

    if !table.header.is_empty() {
        out.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
        for (idx, cell) in table.header.iter().enumerate() {
            out.push_str(&cell_xml(cell, table.column_widths_twip.get(idx), rels));
        }
        out.push_str("</w:tr>");
    }
    for row in &table.rows {
        out.push_str("<w:tr>");
        for (idx, cell) in row.iter().enumerate() {
            out.push_str(&cell_xml(cell, table.column_widths_twip.get(idx), rels));
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
    out
}

fn cell_xml(
    cell: &crate::document::model::TableCellNode,
    width: Option<&i64>,
    rels: &mut RelContext,
) -> String {
    let mut out = String::from("<w:tc><w:tcPr>");
    if let Some(width) = width {
        out.push_str(&format!("<w:tcW w:w=\"{width}\" w:type=\"dxa\"/>"));
    }
    if let Some(fill) = &cell.shading {
        out.push_str(&format!(
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            esc(fill)
        ));
    }
    out.push_str("</w:tcPr><w:p>");
    for run in &cell.runs {
        out.push_str(&run_xml(run, rels));
    }
    out.push_str("</w:p></w:tc>");
    out
}

fn sect_pr_xml(page: &PageGeometry) -> String {
    let mut out = String::from("<w:sectPr>");
    let orient = match page.orientation {
        PageOrientation::Portrait => String::new(),
        PageOrientation::Landscape => " w:orient=\"landscape\"".to_string(),
    };
    out.push_str(&format!(
        "<w:pgSz w:w=\"{}\" w:h=\"{}\"{orient}/>",
        page.width_twip, page.height_twip
    ));
    out.push_str(&format!(
        "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>",
        page.margins.top_twip,
        page.margins.right_twip,
        page.margins.bottom_twip,
        page.margins.left_twip
    ));
    if let Some(grid) = page.grid {
        if grid.line_per_page > 0 {
            let printable = page.height_twip - page.margins.top_twip - page.margins.bottom_twip;
            let pitch = (printable / grid.line_per_page as i64).max(1);
            out.push_str(&format!(
                "<w:docGrid w:type=\"lines\" w:linePitch=\"{pitch}\"/>"
            ));
        }
    }
    out.push_str("</w:sectPr>");
    out
}

pub fn numbering_xml(registry: &NumberingRegistry) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:numbering xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">",
    );
    out.push_str(&abstract_num_xml(0, &registry.bullet));
    out.push_str(&abstract_num_xml(1, &registry.ordered));
    out.push_str(&format!(
        "<w:num w:numId=\"{}\"><w:abstractNumId w:val=\"0\"/></w:num>",
        scheme_num_id(SchemeKind::Bullet)
    ));
    out.push_str(&format!(
        "<w:num w:numId=\"{}\"><w:abstractNumId w:val=\"1\"/></w:num>",
        scheme_num_id(SchemeKind::Ordered)
    ));
    out.push_str("</w:numbering>");
    out
}

fn abstract_num_xml(id: u32, scheme: &NumberingScheme) -> String {
    let format = match scheme.kind {
        SchemeKind::Bullet => "bullet",
        SchemeKind::Ordered => "decimal",
    };
    let mut out = format!("<w:abstractNum w:abstractNumId=\"{id}\">");
    for (level, def) in scheme.levels.iter().enumerate() {
        out.push_str(&format!(
            "<w:lvl w:ilvl=\"{level}\"><w:start w:val=\"1\"/><w:numFmt w:val=\"{format}\"/><w:lvlText w:val=\"{}\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"{}\" w:hanging=\"360\"/></w:pPr><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/></w:rPr></w:lvl>",
            esc(&def.text),
            def.indent_twip,
            font = esc(&def.font)
        ));
    }
    out.push_str("</w:abstractNum>");
    out
}

pub fn scheme_num_id(scheme: SchemeKind) -> u32 {
    match scheme {
        SchemeKind::Bullet => 1,
        SchemeKind::Ordered => 2,
    }
}

pub fn styles_xml() -> &'static str {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">
  <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">
    <w:name w:val=\"Normal\"/>
  </w:style>
  <w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/></w:style>
  <w:style w:type=\"paragraph\" w:styleId=\"Heading2\"><w:name w:val=\"heading 2\"/></w:style>
  <w:style w:type=\"paragraph\" w:styleId=\"Heading3\"><w:name w:val=\"heading 3\"/></w:style>
</w:styles>"
}

pub fn core_xml(metadata: &DocumentMetadata) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );
    out.push_str(&format!("<dc:title>{}</dc:title>", esc(&metadata.title)));
    out.push_str(&format!(
        "<dc:creator>{}</dc:creator>",
        esc(&metadata.author)
    ));
    if let Some(created) = metadata.created {
        out.push_str(&format!(
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
            created.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }
    if let Some(modified) = metadata.modified {
        out.push_str(&format!(
            "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
            modified.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
    }
    out.push_str("</cp:coreProperties>");
    out
}

pub fn content_types_xml(images: &[ImageAsset]) -> String {
    let mut defaults = vec![
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>".to_string(),
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>".to_string(),
    ];
    let mut seen = std::collections::BTreeSet::new();
    for image in images {
        let ext = extension_for_mime(&image.mime);
        if seen.insert(ext) {
            defaults.push(format!(
                "<Default Extension=\"{ext}\" ContentType=\"{}\"/>",
                image.mime
            ));
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\n{}\n<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\n<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\n<Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>\n<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\n</Types>",
        defaults.join("\n")
    )
}

pub fn root_rels_xml() -> &'static str {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">
  <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>
  <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>
</Relationships>"
}

pub fn document_rels_xml(rels: &RelContext) -> String {
    let mut entries = vec![
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>".to_string(),
        "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering\" Target=\"numbering.xml\"/>".to_string(),
    ];
    for image in &rels.images {
        entries.push(format!(
            "<Relationship Id=\"{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"media/{}\"/>",
            image.rel_id, image.file_name
        ));
    }
    for link in &rels.hyperlinks {
        entries.push(format!(
            "<Relationship Id=\"{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink\" Target=\"{}\" TargetMode=\"External\"/>",
            link.rel_id,
            esc(&link.url)
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n{}\n</Relationships>",
        entries.join("\n")
    )
}

pub(crate) fn esc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
