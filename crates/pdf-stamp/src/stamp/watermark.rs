//! Text and image watermarks

use crate::anchor::{cap_image_size, resolve_watermark_anchor};
use crate::options::{WatermarkMode, WatermarkOptions};
use crate::render::{
    EmbeddedImage, ImageStamp, StandardFont, TextStamp, add_opacity_state, embed_image, page_box,
};
use crate::types::*;
use lopdf::{Document, ObjectId};

use super::compositor::composite_page;

/// Resources shared by every watermarked page
enum Mark {
    Text {
        font: StandardFont,
        font_id: ObjectId,
    },
    Image(EmbeddedImage),
}

/// Stamp the same watermark onto every page in `[range_from, range_to]`.
///
/// `image` holds PNG or JPEG bytes and is required in image mode.
pub fn add_watermark(
    doc: &mut Document,
    options: &WatermarkOptions,
    image: Option<&[u8]>,
) -> Result<StampReport> {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(StampError::NoPages);
    }
    let total_pages = pages.len() as u32;

    let Some(scope) = options.scope(total_pages) else {
        log::warn!(
            "Watermark range {:?}..{:?} selects no page of {}",
            options.range_from,
            options.range_to,
            total_pages
        );
        return Ok(StampReport::default());
    };

    let style = &options.style;
    let rotated = style.is_rotated();

    let mark = match options.mode {
        WatermarkMode::Text => {
            let font = StandardFont::new(style.font_family, style.bold, style.italic);
            Mark::Text {
                font,
                font_id: font.add_to(doc),
            }
        }
        WatermarkMode::Image => {
            let bytes = image.ok_or_else(|| {
                StampError::Config("Image watermark requires image data".to_string())
            })?;
            Mark::Image(embed_image(doc, bytes)?)
        }
    };
    let opacity_state = (style.opacity < 1.0).then(|| add_opacity_state(doc, style.opacity));

    let mut report = StampReport::default();
    for page_number in scope.pages() {
        let Some(&page_id) = pages.get(&page_number) else {
            continue;
        };
        let page = page_box(doc, page_id);

        match &mark {
            Mark::Text { font, font_id } => {
                let stamp = TextStamp::new(&options.text, *font, *font_id, style)
                    .with_opacity_state(opacity_state);
                let origin =
                    resolve_watermark_anchor(page.size, options.position, stamp.block(), rotated);
                let stamp = stamp.at(page.to_page_space(origin));
                composite_page(doc, page_id, options.layer, &stamp)?;
            }
            Mark::Image(image) => {
                let size = cap_image_size(page.size, image.natural_size(), rotated);
                let origin = resolve_watermark_anchor(page.size, options.position, size, rotated);
                let stamp = ImageStamp {
                    image: *image,
                    origin: page.to_page_space(origin),
                    size,
                    rotation_degrees: style.rotation_degrees,
                    opacity_state,
                };
                composite_page(doc, page_id, options.layer, &stamp)?;
            }
        }

        log::debug!("Watermarked page {page_number}");
        report.stamped_pages.push(page_number);
    }

    doc.prune_objects();
    log::info!(
        "Watermarked pages {}..={} of {}",
        scope.from,
        scope.to,
        total_pages
    );
    Ok(report)
}
