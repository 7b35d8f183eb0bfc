//! Stamping operations
//!
//! Each operation resolves which pages are in scope, measures and places a
//! stamp on every one of them, and rebuilds the page content so the stamp
//! sits over or under the original marks.

mod compositor;
mod page_numbers;
mod watermark;

pub use compositor::composite_page;
pub use page_numbers::add_page_numbers;
pub use watermark::add_watermark;
