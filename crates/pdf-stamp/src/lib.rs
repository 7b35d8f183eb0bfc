pub mod anchor;
pub mod constants;
pub mod io;
pub mod numbering;
mod options;
pub mod organize;
pub mod range;
pub mod render;
pub mod split;
pub mod stamp;
mod types;

pub use anchor::{FacingContext, PositionKey, SheetRole, resolve_anchor};
pub use io::{load_pdf, load_pdf_bytes, save_pdf, to_bytes};
pub use numbering::{NumberStyle, NumberTemplate, format_number};
pub use options::*;
pub use organize::{PageDirective, build_page_sequence, plan_sequence};
pub use range::{Interval, PageRangeSet, fixed_chunks, parse_page_range};
pub use split::{plan_split, split_document};
pub use stamp::{add_page_numbers, add_watermark, composite_page};
pub use types::*;
