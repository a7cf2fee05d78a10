//! Filter, sort, paginate, pick a render strategy
//!
//! Pure functions of a job snapshot and a [`ViewState`]. Nothing here is
//! cached between renders; a refresh simply feeds a new snapshot through.

use std::cmp::Ordering;
use std::ops::Range;

use jobdeck_core::domain::job::Job;

use super::virtual_list::VirtualWindow;
use super::{SortColumn, SortDirection, StatusFilter, ViewState};

/// Keep jobs matching the status filter and the search text
///
/// The search is a case-insensitive substring match against the id, the
/// type and the JSON text of the result. Job types additionally match
/// abbreviations whose letters appear in order (`img` finds `resize_image`).
pub fn filter_jobs<'a>(jobs: &'a [Job], filter: StatusFilter, search: &str) -> Vec<&'a Job> {
    let needle = search.trim().to_lowercase();

    jobs.iter()
        .filter(|job| filter.matches(job.status))
        .filter(|job| needle.is_empty() || matches_search(job, &needle))
        .collect()
}

fn matches_search(job: &Job, needle: &str) -> bool {
    if job.id.to_lowercase().contains(needle) {
        return true;
    }

    let kind = job.kind.as_str().to_lowercase();
    if kind.contains(needle) || is_subsequence(needle, &kind) {
        return true;
    }

    job.result_text()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    needle
        .chars()
        .all(|wanted| remaining.by_ref().any(|c| c == wanted))
}

/// Stable sort by a column; equal keys keep their input order
pub fn sort_jobs(jobs: &mut [&Job], column: SortColumn, direction: SortDirection) {
    jobs.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &Job, b: &Job, column: SortColumn) -> Ordering {
    match column {
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::Priority => a.priority.cmp(&b.priority),
        SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        SortColumn::Type => a.kind.as_str().cmp(b.kind.as_str()),
    }
}

/// One page of a paginated result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Current page, 1-based, already clamped
    pub number: usize,
    pub total_pages: usize,
    pub size: usize,
    /// Index of the first row on this page
    pub start: usize,
    /// One past the last row on this page
    pub end: usize,
}

impl Page {
    /// Slice `item_count` rows into pages of `size`, clamping `requested`
    /// to `[1, total_pages]`
    pub fn compute(item_count: usize, size: usize, requested: usize) -> Self {
        let size = size.max(1);
        let total_pages = item_count.div_ceil(size).max(1);
        let number = requested.clamp(1, total_pages);
        let start = ((number - 1) * size).min(item_count);
        let end = (start + size).min(item_count);

        Self {
            number,
            total_pages,
            size,
            start,
            end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// How the table is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full pagination with row expansion and copy-to-clipboard
    Paginated(Page),
    /// Only the scrolled-into-view rows; no per-row affordances
    Virtualized(VirtualWindow),
}

/// Everything needed to draw the table for one render
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    /// Filtered and sorted jobs, before pagination (also what export writes)
    pub matches: Vec<&'a Job>,
    pub mode: RenderMode,
    expanded: Option<&'a Job>,
}

impl<'a> TableView<'a> {
    /// Rows to draw
    pub fn rows(&self) -> &[&'a Job] {
        let range = match &self.mode {
            RenderMode::Paginated(page) => page.range(),
            RenderMode::Virtualized(window) => window.range(),
        };
        &self.matches[range]
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn is_virtualized(&self) -> bool {
        matches!(self.mode, RenderMode::Virtualized(_))
    }

    /// Whether rows can be expanded into a detail view
    pub fn allows_expansion(&self) -> bool {
        !self.is_virtualized()
    }

    /// Whether rows offer copying their id
    pub fn allows_copy(&self) -> bool {
        !self.is_virtualized()
    }

    pub fn page(&self) -> Option<&Page> {
        match &self.mode {
            RenderMode::Paginated(page) => Some(page),
            RenderMode::Virtualized(_) => None,
        }
    }

    /// The expanded job, if it is one of the rows being drawn
    pub fn expanded(&self) -> Option<&'a Job> {
        self.expanded
    }
}

/// Run the full view pipeline over a snapshot
pub fn project<'a>(jobs: &'a [Job], state: &ViewState) -> TableView<'a> {
    let mut matches = filter_jobs(jobs, state.status_filter(), state.search());
    let (column, direction) = state.sort();
    sort_jobs(&mut matches, column, direction);

    let layout = state.layout();
    let mode = if matches.len() > layout.virtualize_threshold {
        RenderMode::Virtualized(VirtualWindow::compute(
            matches.len(),
            state.row_height(),
            layout.viewport_height,
            state.scroll_offset(),
            layout.overscan,
        ))
    } else {
        RenderMode::Paginated(Page::compute(matches.len(), state.page_size(), state.page()))
    };

    let expanded = match (&mode, state.expanded()) {
        (RenderMode::Paginated(page), Some(id)) => matches[page.range()]
            .iter()
            .copied()
            .find(|job| job.id == id),
        _ => None,
    };

    TableView {
        matches,
        mode,
        expanded,
    }
}
