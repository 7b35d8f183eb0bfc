//! Page numbering

use crate::anchor::{FacingContext, resolve_anchor};
use crate::numbering::format_number;
use crate::options::PageNumberOptions;
use crate::range::parse_page_range;
use crate::render::{StandardFont, TextStamp, add_opacity_state, page_box};
use crate::types::*;
use lopdf::Document;

use super::compositor::composite_page;

/// Stamp page numbers onto the pages selected by `options.range`.
///
/// The first page in scope gets `start_at`, the next `start_at + 1` and so
/// on, regardless of gaps in the range. Numbers are always drawn over the
/// page content.
pub fn add_page_numbers(doc: &mut Document, options: &PageNumberOptions) -> Result<StampReport> {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(StampError::NoPages);
    }
    let total_pages = pages.len() as u32;

    let scope = parse_page_range(&options.range, total_pages, options.default_start());
    if scope.is_empty() {
        log::info!("No pages to number");
        return Ok(StampReport::default());
    }

    let first_number = options.start_at as i64;
    let last_number = first_number + scope.len() as i64 - 1;
    let total_label = format_number(last_number, options.style);

    let style = &options.text;
    let font = StandardFont::new(style.font_family, style.bold, style.italic);
    let font_id = font.add_to(doc);
    let opacity_state = (style.opacity < 1.0).then(|| add_opacity_state(doc, style.opacity));

    let mut report = StampReport::default();
    for (index, page_number) in scope.iter().enumerate() {
        let Some(&page_id) = pages.get(&page_number) else {
            continue;
        };

        let number = format_number(first_number + index as i64, options.style);
        let label = options.template.render(&number, &total_label);
        let stamp = TextStamp::new(&label, font, font_id, style).with_opacity_state(opacity_state);

        let page = page_box(doc, page_id);
        let facing = FacingContext {
            page_mode: options.page_mode,
            cover_is_first_page: options.cover_is_first_page,
            page_number,
        };
        let origin = resolve_anchor(
            page.size,
            options.position,
            options.margin,
            stamp.block(),
            Some(&facing),
        );

        log::debug!("Page {page_number}: {label:?} at ({}, {})", origin.x, origin.y);
        let stamp = stamp.at(page.to_page_space(origin));
        composite_page(doc, page_id, Layer::Over, &stamp)?;
        report.stamped_pages.push(page_number);
    }

    doc.prune_objects();
    log::info!(
        "Numbered {} of {} pages ({}..={})",
        report.stamped_pages.len(),
        total_pages,
        first_number,
        last_number
    );
    Ok(report)
}
