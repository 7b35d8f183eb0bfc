//! PDF rendering modules for stamping
//!
//! This module handles all PDF-specific drawing:
//! - Wrapping existing page content in reusable Form XObjects
//! - Standard font selection and text measurement
//! - Text, underline and image content operators
//! - Rebuilding a page's content stream from a canvas

mod canvas;
mod fonts;
mod page;
mod raster;
mod text;

pub use canvas::{Canvas, Drawable};
pub use fonts::{StandardFont, encode_win_ansi, pdf_literal};
pub use page::{PageBox, PageContent, inherited_attribute, page_box};
pub use raster::{EmbeddedImage, ImageStamp, add_opacity_state, embed_image};
pub use text::TextStamp;
