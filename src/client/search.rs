//! Search filters and the time-windowed search retrier
//!
//! The Lacework search endpoints refuse time ranges wider than a fixed
//! window and only retain a bounded amount of history. [`windowed_search`]
//! slides a window backwards from now until a search returns data or the
//! retained history is exhausted.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Maximum number of days a single v2 search request may span
pub const V2_API_MAX_SEARCH_WINDOW_DAYS: u32 = 7;

/// Number of days of history retained by the v2 search endpoints
pub const V2_API_MAX_SEARCH_HISTORY_DAYS: u32 = 92;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Time range of a search request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl TimeFilter {
    /// Create a time filter covering `[start, end]`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    /// Time filter covering the last `days` days up to now
    pub fn last_days(days: u32) -> Self {
        let now = Utc::now();
        Self::new(now - Duration::days(i64::from(days)), now)
    }
}

/// A single field predicate of a search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field: String,

    /// Comparison operator (`eq`, `ne`, `in`, `rlike`, ...)
    pub expression: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl Filter {
    /// Create a single-value filter
    pub fn new(
        field: impl Into<String>,
        expression: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expression: expression.into(),
            value: Some(value.into()),
            values: Vec::new(),
        }
    }

    /// Shorthand for an `eq` filter
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, "eq", value)
    }
}

/// Body of a v2 search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_filter: Option<TimeFilter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,

    /// Fields to return, all when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<String>,
}

impl SearchFilter {
    /// Search filter covering the last `days` days
    pub fn last_days(days: u32) -> Self {
        Self {
            time_filter: Some(TimeFilter::last_days(days)),
            ..Default::default()
        }
    }

    /// Add a field predicate
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A filter whose time range can be read and moved by [`windowed_search`].
///
/// Implementations are free to carry any other fields.
pub trait SearchableFilter {
    fn time_filter(&self) -> Option<&TimeFilter>;
    fn set_start_time(&mut self, start: DateTime<Utc>);
    fn set_end_time(&mut self, end: DateTime<Utc>);
}

impl SearchableFilter for SearchFilter {
    fn time_filter(&self) -> Option<&TimeFilter> {
        self.time_filter.as_ref()
    }

    fn set_start_time(&mut self, start: DateTime<Utc>) {
        self.time_filter.get_or_insert_with(TimeFilter::default).start_time = Some(start);
    }

    fn set_end_time(&mut self, end: DateTime<Utc>) {
        self.time_filter.get_or_insert_with(TimeFilter::default).end_time = Some(end);
    }
}

/// A response that can report how many rows it holds
pub trait DataLength {
    fn data_len(&self) -> usize;
}

/// Whole days between two instants, rounding half days to even.
pub fn day_span(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let days = (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY;
    days.round_ties_even() as i64
}

/// Search backwards through history one window at a time.
///
/// `search` receives a snapshot of `filter` and its result replaces
/// `response`. The loop stops at the first non-empty response, at the first
/// error (returned unchanged), or once `max_history_days` of history have
/// been walked. Running out of history is not an error: `response` is then
/// left empty and `filter` holds the oldest window tried.
///
/// Fails with [`SearchError::WindowExceedsHistory`] before any search when
/// `window_days > max_history_days`, and with
/// [`SearchError::HistoryOutOfRange`] when the history reaches past the
/// representable date range.
pub async fn windowed_search<S, Fut, R, F>(
    mut search: S,
    window_days: u32,
    max_history_days: u32,
    response: &mut R,
    filter: &mut F,
) -> Result<()>
where
    S: FnMut(F) -> Fut,
    Fut: Future<Output = Result<R>>,
    R: DataLength,
    F: SearchableFilter + Clone,
{
    if window_days > max_history_days {
        return Err(SearchError::WindowExceedsHistory {
            window_days,
            max_history_days,
        }
        .into());
    }
    if window_days == 0 {
        return Err(SearchError::ZeroWindow.into());
    }

    let now = Utc::now();
    let window = Duration::days(i64::from(window_days));
    let max_history = i64::from(max_history_days);
    let shift_back = |at: DateTime<Utc>, by: Duration| {
        at.checked_sub_signed(by)
            .ok_or(SearchError::HistoryOutOfRange { max_history_days })
    };
    let oldest_start = shift_back(now, Duration::days(max_history))?;

    let (mut start, mut end) = current_window(filter, now);
    let mut offset = day_span(start, end);

    // A zero-width range would search nothing
    if start == end {
        start = shift_back(end, window)?;
    }
    filter.set_start_time(start);
    filter.set_end_time(end);

    while offset < max_history {
        debug!(
            "Windowed search: {} -> {} (offset {} of {} days)",
            start, end, offset, max_history
        );
        *response = search(filter.clone()).await?;

        if response.data_len() != 0 {
            debug!("Windowed search found {} rows", response.data_len());
            return Ok(());
        }

        start = shift_back(start, window)?;
        end = shift_back(end, window)?;

        // The last window may only cover the remainder of the history
        if day_span(start, now) > max_history {
            start = oldest_start;
            if end < start {
                end = start;
            }
        }
        filter.set_start_time(start);
        filter.set_end_time(end);

        offset += i64::from(window_days);
    }

    debug!("Windowed search exhausted {} days of history", max_history);
    Ok(())
}

fn current_window<F: SearchableFilter>(
    filter: &F,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let time_filter = filter.time_filter().copied().unwrap_or_default();
    let end = time_filter.end_time.unwrap_or(now);
    let start = time_filter.start_time.unwrap_or(end);
    (start, end)
}
