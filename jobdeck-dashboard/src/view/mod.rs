//! View engine
//!
//! Operator-controlled table state (search, filter, sort, pagination,
//! expansion, density) and the pure pipeline that turns a job snapshot plus
//! that state into the rows to draw.
//!
//! The view state is owned by the session and is never touched by a data
//! refresh; every render re-derives the table from the latest snapshot and
//! the current state.

pub mod debounce;
pub mod export;
pub mod pipeline;
pub mod virtual_list;

pub use pipeline::{Page, RenderMode, TableView, project};
pub use virtual_list::VirtualWindow;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use jobdeck_core::domain::job::JobStatus;

use crate::config::DashboardConfig;
use debounce::Debouncer;

/// Which statuses the table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: JobStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    CreatedAt,
    Priority,
    Status,
    Type,
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::Priority => "priority",
            SortColumn::Status => "status",
            SortColumn::Type => "type",
        })
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "created_at" | "date" => Ok(SortColumn::CreatedAt),
            "priority" | "prio" => Ok(SortColumn::Priority),
            "status" => Ok(SortColumn::Status),
            "type" | "kind" => Ok(SortColumn::Type),
            other => Err(format!("unknown sort column '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Table geometry and strategy thresholds, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub virtualize_threshold: usize,
    pub row_height: u32,
    pub compact_row_height: u32,
    pub viewport_height: u32,
    pub overscan: usize,
}

impl From<&DashboardConfig> for TableLayout {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            virtualize_threshold: config.virtualize_threshold,
            row_height: config.row_height,
            compact_row_height: config.compact_row_height,
            viewport_height: config.viewport_height,
            overscan: config.overscan,
        }
    }
}

/// Operator-controlled table state
///
/// Filter criteria changes (committed search text, status filter, page size)
/// send the table back to page 1 and the top of the list. Sorting never
/// touches the page, the scroll position or the search text.
#[derive(Debug, Clone)]
pub struct ViewState {
    search: Debouncer<String>,
    status_filter: StatusFilter,
    sort_column: SortColumn,
    sort_direction: SortDirection,
    page_size: usize,
    page: usize,
    expanded: Option<String>,
    compact: bool,
    scroll_offset: u32,
    layout: TableLayout,
}

impl ViewState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            search: Debouncer::new(String::new(), config.search_debounce),
            status_filter: StatusFilter::All,
            sort_column: SortColumn::CreatedAt,
            sort_direction: SortDirection::Descending,
            page_size: config.default_page_size.max(1),
            page: 1,
            expanded: None,
            compact: false,
            scroll_offset: 0,
            layout: TableLayout::from(config),
        }
    }

    // =============================================================================
    // Search
    // =============================================================================

    /// Record typed search text; it applies once typing pauses
    pub fn set_search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.search.push(text.into(), now);
    }

    /// Apply pending search text if the debounce period has passed
    ///
    /// Returns `true` when the applied search text changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        let changed = self.search.poll(now);
        if changed {
            self.reset_position();
        }
        changed
    }

    /// Apply pending search text immediately
    pub fn flush_search(&mut self) -> bool {
        let changed = self.search.flush();
        if changed {
            self.reset_position();
        }
        changed
    }

    /// When pending search text will be applied, if any is waiting
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Search text as typed
    pub fn search_input(&self) -> &str {
        self.search.latest()
    }

    /// Search text the table is filtered by
    pub fn search(&self) -> &str {
        self.search.settled()
    }

    // =============================================================================
    // Filter, sort, pagination
    // =============================================================================

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        if self.status_filter != filter {
            self.status_filter = filter;
            self.reset_position();
        }
    }

    pub fn sort(&self) -> (SortColumn, SortDirection) {
        (self.sort_column, self.sort_direction)
    }

    /// Sort by a column; choosing the current column again flips the direction
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if self.page_size != page_size {
            self.page_size = page_size;
            self.reset_position();
        }
    }

    /// Requested page, 1-based; the pipeline clamps it to the pages that exist
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Back to the first page and the top of the virtualized list
    fn reset_position(&mut self) {
        self.page = 1;
        self.scroll_offset = 0;
    }

    /// Pull the requested page back into `[1, total_pages]`
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    // =============================================================================
    // Row presentation
    // =============================================================================

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Open a row's detail view, or close it if it is already open
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    pub fn toggle_compact(&mut self) {
        self.compact = !self.compact;
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn scroll_to(&mut self, offset: u32) {
        self.scroll_offset = offset;
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Row height for the current density
    pub fn row_height(&self) -> u32 {
        if self.compact {
            self.layout.compact_row_height
        } else {
            self.layout.row_height
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}
