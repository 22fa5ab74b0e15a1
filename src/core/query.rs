//! Chromosome/position filtering and pagination
//!
//! Filters return row indices into the table rather than copies, so a page
//! always points at the same rows the ledger edits.

use crate::core::error::FilterError;
use crate::core::table::VariantTable;
use std::fmt;
use std::str::FromStr;

/// Rows per page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Position predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFilter {
    /// POS equals the value
    Exact(u64),
    /// POS lies in `start..=end`; empty when `start > end`
    Range { start: u64, end: u64 },
}

impl PositionFilter {
    /// Parse user input; blank input means no position filter
    pub fn parse(input: &str) -> Result<Option<Self>, FilterError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    pub fn matches(&self, pos: u64) -> bool {
        match *self {
            PositionFilter::Exact(p) => pos == p,
            PositionFilter::Range { start, end } => (start..=end).contains(&pos),
        }
    }
}

impl FromStr for PositionFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((start, end)) => {
                let bound = |v: &str| {
                    v.trim()
                        .parse::<u64>()
                        .map_err(|_| FilterError::InvalidRange(s.to_string()))
                };
                Ok(PositionFilter::Range {
                    start: bound(start)?,
                    end: bound(end)?,
                })
            }
            None => s
                .parse::<u64>()
                .map(PositionFilter::Exact)
                .map_err(|_| FilterError::InvalidPosition(s.to_string())),
        }
    }
}

impl fmt::Display for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionFilter::Exact(p) => write!(f, "{}", p),
            PositionFilter::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// Result of [`filter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredRows {
    /// Matching row indices in table order
    pub indices: Vec<usize>,
    /// Rows on the chromosome dropped because POS is not an integer
    pub malformed_positions: usize,
}

impl FilteredRows {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Select rows on `chrom`, optionally restricted by position
pub fn filter(table: &VariantTable, chrom: &str, position: Option<&PositionFilter>) -> FilteredRows {
    let mut result = FilteredRows::default();

    for (i, row) in table.rows().iter().enumerate() {
        if row.chrom() != chrom {
            continue;
        }
        let Some(position) = position else {
            result.indices.push(i);
            continue;
        };
        match table.pos(row).trim().parse::<u64>() {
            Ok(pos) if position.matches(pos) => result.indices.push(i),
            Ok(_) => {}
            Err(_) => result.malformed_positions += 1,
        }
    }

    if result.malformed_positions > 0 {
        log::warn!(
            "{} rows on {} skipped: POS is not an integer",
            result.malformed_positions,
            chrom
        );
    }
    result
}

/// Slice bounds of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page actually served (1-based, after clamping)
    pub page: usize,
    pub total_pages: usize,
    /// Slice `start..end` of the filtered rows
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Compute the window for `page` over `len` rows
///
/// A page size of 0 is treated as 1. The page number is clamped to
/// `1..=total_pages`, where `total_pages` is never below 1.
pub fn paginate(len: usize, page_size: usize, page: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let total_pages = len.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(len);
    let end = (start + page_size).min(len);

    PageWindow {
        page,
        total_pages,
        start,
        end,
    }
}
