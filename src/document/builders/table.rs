use crate::document::builders::{
    DEFAULT_PARAGRAPH_FONT, diagnostic_paragraph, styled_runs,
};
use crate::document::model::{
    Alignment, BorderLine, DocumentNode, RunStyle, TableCellNode, TableNode,
};
use crate::markdown::tokens::CellValue;
use crate::style::StyleTree;

const TOTAL_WIDTH_TWIP: i64 = 8000;
const FALLBACK_FONT_SIZE: f64 = 10.5;

pub fn build(header: &[CellValue], rows: &[Vec<CellValue>], styles: &StyleTree) -> DocumentNode {
    let columns = header
        .len()
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    if columns == 0 {
        return diagnostic_paragraph("table token carries no cells");
    }
    let column_width = TOTAL_WIDTH_TWIP / columns as i64;

    let font_size = styles.f64_or("table.fontSize", FALLBACK_FONT_SIZE);
    let header_background = styles.str_or("table.headerBackground", "DDDDDD");
    let header_base = RunStyle {
        font: Some(styles.str_or("table.headerFont", DEFAULT_PARAGRAPH_FONT)),
        size_pt: Some(font_size),
        bold: true,
        ..RunStyle::default()
    };
    let body_base = RunStyle {
        font: Some(styles.str_or("paragraph.font", DEFAULT_PARAGRAPH_FONT)),
        size_pt: Some(font_size),
        ..RunStyle::default()
    };

    let header_cells = header
        .iter()
        .map(|cell| TableCellNode {
            runs: styled_runs(&cell.normalized(), &header_base, styles),
            shading: Some(header_background.clone()),
        })
        .collect();

    let body_rows = rows
        .iter()
        .map(|row| {
            // Ragged rows pad out to the column count so the grid stays
            // rectangular.
            (0..columns)
                .map(|idx| TableCellNode {
                    runs: styled_runs(
                        &row.get(idx).map(CellValue::normalized).unwrap_or_default(),
                        &body_base,
                        styles,
                    ),
                    shading: None,
                })
                .collect()
        })
        .collect();

    DocumentNode::Table(TableNode {
        header: header_cells,
        rows: body_rows,
        column_widths_twip: vec![column_width; columns],
        borders: BorderLine::single(
            styles.str_or("table.borderColor", "000000"),
            styles.f64_or("table.borderWidth", 4.0).round() as i64,
        ),
        alignment: Alignment::from_key(&styles.str_or("table.alignment", "center")),
    })
}
