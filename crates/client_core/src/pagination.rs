//! Compact pagination control model.
//!
//! Short collections list every page. Longer ones keep the first and last page
//! plus the neighbours of the current page, with ellipses over the gaps.

use std::fmt::Write as _;

pub const DEFAULT_MIN_SLOTS: u32 = 3;

/// Up to this many pages are listed in full.
const FULL_LIST_LIMIT: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Page {
        number: u32,
        /// False for padding slots beyond the last real page.
        enabled: bool,
        current: bool,
    },
    Ellipsis,
}

impl Slot {
    pub fn page_number(&self) -> Option<u32> {
        match self {
            Slot::Page { number, .. } => Some(*number),
            Slot::Ellipsis => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    pub slots: Vec<Slot>,
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

impl DisplayModel {
    /// Page numbers in slot order, ellipses skipped.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.slots.iter().filter_map(Slot::page_number).collect()
    }

    /// Single-line rendering for terminals, e.g. `‹ 1 … 4 [5] 6 … 10 ›`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(if self.can_go_prev { "‹" } else { " " });
        for slot in &self.slots {
            out.push(' ');
            match slot {
                Slot::Ellipsis => out.push('…'),
                Slot::Page { number, current: true, .. } => {
                    let _ = write!(out, "[{number}]");
                }
                Slot::Page { number, enabled: false, .. } => {
                    let _ = write!(out, "({number})");
                }
                Slot::Page { number, .. } => {
                    let _ = write!(out, "{number}");
                }
            }
        }
        out.push(' ');
        out.push_str(if self.can_go_next { "›" } else { " " });
        out
    }
}

pub fn compute_display_model(page: u32, total_pages: u32, min_slots: u32) -> DisplayModel {
    let total_pages = total_pages.max(1);
    let page = page.max(1);

    let numbers: Vec<Option<u32>> = if total_pages < min_slots {
        (1..=min_slots).map(Some).collect()
    } else {
        compact_pages(page, total_pages)
    };

    let slots = numbers
        .into_iter()
        .map(|entry| match entry {
            Some(number) => Slot::Page {
                number,
                enabled: number <= total_pages,
                current: number == page && number <= total_pages,
            },
            None => Slot::Ellipsis,
        })
        .collect();

    DisplayModel {
        slots,
        can_go_prev: page > 1,
        can_go_next: page < total_pages,
    }
}

/// `None` marks an ellipsis.
fn compact_pages(page: u32, total_pages: u32) -> Vec<Option<u32>> {
    if total_pages <= FULL_LIST_LIMIT {
        return (1..=total_pages).map(Some).collect();
    }

    let mut kept = vec![1, total_pages, page];
    if page > 1 {
        kept.push(page - 1);
    }
    if page < total_pages {
        kept.push(page + 1);
    }
    kept.sort_unstable();
    kept.dedup();

    let mut out = Vec::with_capacity(kept.len() * 2);
    for (idx, number) in kept.iter().copied().enumerate() {
        out.push(Some(number));
        if let Some(next) = kept.get(idx + 1) {
            if next - number > 1 {
                out.push(None);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
