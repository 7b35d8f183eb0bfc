//! Page range parsing
//!
//! Turns user-entered range text such as `"1-3, 5, 8-10"` into a sorted,
//! deduplicated set of 1-based page numbers. Parsing never fails: tokens
//! that don't describe any page inside the document are dropped, and a
//! range that selects nothing falls back to "every page from the default
//! start".

use std::collections::BTreeSet;

/// Sorted, deduplicated, 1-based page numbers within `1..=max_page`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRangeSet(Vec<u32>);

impl PageRangeSet {
    /// All pages `start..=end` (empty when `start > end`).
    pub fn span(start: u32, end: u32) -> Self {
        Self((start.max(1)..=end).collect())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.binary_search(&page).is_ok()
    }

    /// Zero-based position of `page` within the set.
    pub fn position(&self, page: u32) -> Option<usize> {
        self.0.binary_search(&page).ok()
    }

    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }
}

impl From<Interval> for PageRangeSet {
    fn from(interval: Interval) -> Self {
        Self::span(interval.from, interval.to)
    }
}

/// Inclusive page interval, `1 <= from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub from: u32,
    pub to: u32,
}

impl Interval {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Build an interval from raw, possibly inverted or out-of-bounds ends.
    ///
    /// The ends are swapped when inverted and clamped to `1..=max_page`.
    /// Returns `None` when nothing of the interval lies inside the document.
    pub fn normalized(a: i64, b: i64, max_page: u32) -> Option<Self> {
        let from = a.min(b).max(1);
        let to = a.max(b).min(max_page as i64);
        if from > to {
            return None;
        }
        Some(Self::new(from as u32, to as u32))
    }

    /// Number of pages covered; zero for a hand-built inverted interval.
    pub fn len(&self) -> u32 {
        if self.to < self.from {
            0
        } else {
            self.to - self.from + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.from..=self.to).contains(&page)
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.from..=self.to
    }
}

/// Parse a page range expression.
///
/// Tokens are comma separated and either a single page (`5`) or an
/// inclusive range (`2-7`, ends may be inverted). Pages outside
/// `1..=max_page` are ignored. When the input is empty or nothing valid
/// remains, every page from `default_start` to `max_page` is selected.
pub fn parse_page_range(input: &str, max_page: u32, default_start: u32) -> PageRangeSet {
    let mut pages = BTreeSet::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match parse_token(token, max_page) {
            Some(interval) => pages.extend(interval.pages()),
            None => log::debug!("Ignoring range token {token:?}"),
        }
    }

    if pages.is_empty() {
        return PageRangeSet::span(default_start, max_page);
    }

    PageRangeSet(pages.into_iter().collect())
}

fn parse_token(token: &str, max_page: u32) -> Option<Interval> {
    if let Some((start, end)) = token.split_once('-') {
        let start: i64 = start.trim().parse().ok()?;
        let end: i64 = end.trim().parse().ok()?;
        return Interval::normalized(start, end, max_page);
    }

    let page: i64 = token.parse().ok()?;
    if page < 1 || page > max_page as i64 {
        return None;
    }
    Some(Interval::new(page as u32, page as u32))
}

/// Partition `1..=max_page` into consecutive intervals of `chunk_size` pages.
///
/// The last interval may be shorter. A zero chunk size must be rejected by
/// the caller; it yields no intervals here.
pub fn fixed_chunks(max_page: u32, chunk_size: u32) -> Vec<Interval> {
    if chunk_size == 0 {
        return Vec::new();
    }

    (1..=max_page)
        .step_by(chunk_size as usize)
        .map(|from| Interval::new(from, from.saturating_add(chunk_size - 1).min(max_page)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(set: &PageRangeSet) -> Vec<u32> {
        set.iter().collect()
    }

    #[test]
    fn test_empty_input_selects_everything() {
        for max in 1..20 {
            let set = parse_page_range("", max, 1);
            assert_eq!(pages(&set), (1..=max).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_default_start_skips_cover() {
        let set = parse_page_range("  ", 5, 2);
        assert_eq!(pages(&set), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_inverted_range_swaps() {
        assert_eq!(pages(&parse_page_range("2-1", 10, 1)), vec![1, 2]);
    }

    #[test]
    fn test_invalid_token_dropped() {
        assert_eq!(pages(&parse_page_range("abc,3", 10, 1)), vec![3]);
        assert_eq!(pages(&parse_page_range("2-x, 4", 10, 1)), vec![4]);
    }

    #[test]
    fn test_out_of_bounds_falls_back() {
        assert_eq!(
            pages(&parse_page_range("99", 10, 1)),
            (1..=10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_range_clamped_to_document() {
        assert_eq!(pages(&parse_page_range("8-15", 10, 1)), vec![8, 9, 10]);
        assert_eq!(pages(&parse_page_range("0-2", 10, 1)), vec![1, 2]);
    }

    #[test]
    fn test_overlapping_ranges_union() {
        assert_eq!(
            pages(&parse_page_range("1-3, 2-4, 3", 10, 1)),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_position_within_scope() {
        let set = parse_page_range("1-3,8-10", 10, 1);
        assert_eq!(set.position(8), Some(3));
        assert_eq!(set.position(5), None);
        assert_eq!(set.last(), Some(10));
    }

    #[test]
    fn test_interval_normalized() {
        assert_eq!(Interval::normalized(7, 3, 10), Some(Interval::new(3, 7)));
        assert_eq!(Interval::normalized(-4, 20, 10), Some(Interval::new(1, 10)));
        assert_eq!(Interval::normalized(12, 15, 10), None);
    }

    #[test]
    fn test_interval_len() {
        assert_eq!(Interval::new(3, 7).len(), 5);
        assert_eq!(Interval::new(4, 4).len(), 1);

        let inverted = Interval::new(5, 3);
        assert_eq!(inverted.len(), 0);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_fixed_chunks() {
        assert_eq!(
            fixed_chunks(7, 3),
            vec![Interval::new(1, 3), Interval::new(4, 6), Interval::new(7, 7)]
        );
        assert_eq!(fixed_chunks(4, 4), vec![Interval::new(1, 4)]);
        assert!(fixed_chunks(0, 2).is_empty());
        assert!(fixed_chunks(5, 0).is_empty());
    }
}
