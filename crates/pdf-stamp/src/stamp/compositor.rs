//! Layered page composition

use crate::render::{Canvas, Drawable, PageContent};
use crate::types::{Layer, Result};
use lopdf::{Document, ObjectId};

/// Redraw a page with `stamp` layered over or under its current content.
///
/// The page's existing content becomes a Form XObject that is painted in
/// the new content stream next to the stamp. Applying the same stamp twice
/// draws it twice.
pub fn composite_page(
    doc: &mut Document,
    page_id: ObjectId,
    layer: Layer,
    stamp: &dyn Drawable,
) -> Result<()> {
    let original = PageContent::embed(doc, page_id)?;

    let mut canvas = Canvas::new();
    match layer {
        Layer::Over => {
            canvas.paint(&original);
            canvas.paint(stamp);
        }
        Layer::Under => {
            canvas.paint(stamp);
            canvas.paint(&original);
        }
    }

    canvas.install(doc, page_id)
}
