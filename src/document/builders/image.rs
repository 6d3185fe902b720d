use crate::document::builders::BuildContext;
use crate::document::model::{
    Alignment, BorderLine, DocumentNode, ImageAnchor, ParagraphBorders, ParagraphNode, Run,
    RunStyle,
};
use crate::images::{FetchedImage, decode_data_url};
use crate::style::StyleTree;

const FALLBACK_MAX_WIDTH: f64 = 6000.0;

/// Pixels at the Word reference 96 dpi are 15 twips each.
const TWIPS_PER_PIXEL: f64 = 15.0;

pub fn build(src: &str, alt: &str, cx: &BuildContext) -> DocumentNode {
    let resolved = if src.starts_with("data:") {
        match decode_data_url(src) {
            Ok(image) => Some(image),
            Err(reason) => {
                log::warn!("image data url rejected: {reason}");
                None
            }
        }
    } else {
        cx.fetched.get(src).cloned()
    };

    match resolved {
        Some(image) => picture_paragraph(image, alt, cx.styles),
        None => placeholder(alt, cx.styles),
    }
}

fn picture_paragraph(image: FetchedImage, alt: &str, styles: &StyleTree) -> DocumentNode {
    let max_width = styles.f64_or("image.maxWidth", FALLBACK_MAX_WIDTH);
    let (width, height) = target_box(image.width, image.height, max_width);

    DocumentNode::Paragraph(ParagraphNode {
        runs: vec![Run {
            text: String::new(),
            style: RunStyle::default(),
            link: None,
            image: Some(ImageAnchor {
                alt: alt.to_string(),
                mime: image.mime,
                bytes: image.bytes,
                width_twip: width,
                height_twip: height,
            }),
        }],
        alignment: Alignment::from_key(&styles.str_or("image.alignment", "center")),
        ..ParagraphNode::default()
    })
}

/// Real dimensions scale down preserving aspect; unknown dimensions get
/// the configured width at a 4:3 box.
fn target_box(width_px: u32, height_px: u32, max_width_twip: f64) -> (i64, i64) {
    if width_px == 0 || height_px == 0 {
        return (
            max_width_twip.round() as i64,
            (max_width_twip * 0.75).round() as i64,
        );
    }
    let natural_width = width_px as f64 * TWIPS_PER_PIXEL;
    let natural_height = height_px as f64 * TWIPS_PER_PIXEL;
    if natural_width <= max_width_twip {
        return (natural_width.round() as i64, natural_height.round() as i64);
    }
    let scale = max_width_twip / natural_width;
    (
        max_width_twip.round() as i64,
        (natural_height * scale).round() as i64,
    )
}

fn placeholder(alt: &str, styles: &StyleTree) -> DocumentNode {
    let text = if alt.trim().is_empty() {
        "(image unavailable)".to_string()
    } else {
        alt.to_string()
    };
    DocumentNode::Paragraph(ParagraphNode {
        runs: vec![Run::text_with(
            text,
            RunStyle {
                italic: true,
                color: Some("808080".to_string()),
                ..RunStyle::default()
            },
        )],
        alignment: Alignment::from_key(&styles.str_or("image.alignment", "center")),
        borders: Some(ParagraphBorders::boxed(BorderLine::dashed("AAAAAA", 6))),
        ..ParagraphNode::default()
    })
}
