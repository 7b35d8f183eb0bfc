//! Splitting one document into several

use crate::options::{RangeSelection, SplitMode, SplitOptions};
use crate::range::{Interval, fixed_chunks};
use crate::types::*;
use lopdf::Document;

/// Page intervals produced by `options` for a document of `total_pages`.
///
/// Custom ranges are swapped and clamped into the document; ranges that
/// miss it entirely are dropped. An empty plan is an error.
pub fn plan_split(total_pages: u32, options: &SplitOptions) -> Result<Vec<Interval>> {
    options.validate()?;

    let plan: Vec<Interval> = match &options.mode {
        SplitMode::Range(RangeSelection::Custom(ranges)) => ranges
            .iter()
            .filter_map(|&(a, b)| {
                let interval = Interval::normalized(a, b, total_pages);
                if interval.is_none() {
                    log::warn!("Dropping range {a}-{b} (document has {total_pages} pages)");
                }
                interval
            })
            .collect(),
        SplitMode::Range(RangeSelection::Fixed(chunk)) => {
            fixed_chunks(total_pages, (*chunk).min(u32::MAX as i64) as u32)
        }
        SplitMode::Each => (1..=total_pages).map(|p| Interval::new(p, p)).collect(),
        SplitMode::Half => match total_pages {
            0 => Vec::new(),
            1 => vec![Interval::new(1, 1)],
            n => {
                let mid = n.div_ceil(2);
                vec![Interval::new(1, mid), Interval::new(mid + 1, n)]
            }
        },
    };

    if plan.is_empty() {
        return Err(StampError::Config(
            "Split options select no pages".to_string(),
        ));
    }
    Ok(plan)
}

/// Split `doc` into one document per planned interval.
pub fn split_document(doc: &Document, options: &SplitOptions) -> Result<Vec<(Interval, Document)>> {
    let total_pages = doc.get_pages().len() as u32;
    if total_pages == 0 {
        return Err(StampError::NoPages);
    }

    let plan = plan_split(total_pages, options)?;
    log::info!("Splitting {} pages into {} parts", total_pages, plan.len());

    Ok(plan
        .into_iter()
        .map(|interval| (interval, extract_interval(doc, total_pages, interval)))
        .collect())
}

/// Copy of `doc` keeping only the pages in `interval`
fn extract_interval(doc: &Document, total_pages: u32, interval: Interval) -> Document {
    let mut part = doc.clone();

    let mut pages_to_delete: Vec<u32> = (1..=total_pages)
        .filter(|p| !interval.contains(*p))
        .collect();
    // Delete from the back so page numbers stay valid
    pages_to_delete.reverse();
    part.delete_pages(&pages_to_delete);
    part.prune_objects();

    log::debug!("Extracted pages {}..={}", interval.from, interval.to);
    part
}
