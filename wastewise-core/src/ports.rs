//! Traits describing the log store and suggestion provider interfaces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{CategoryTotals, NewWasteEntry, Suggestion, TimeRange, UserId, WasteEntry};

#[derive(thiserror::Error, Debug)]
/// Errors raised by log store backends.
pub enum StoreError {
    /// A stored row carries a category tag outside the tracked set.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    /// Backend is unavailable or its state is corrupted.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(thiserror::Error, Debug)]
/// Errors raised by suggestion providers. Never surfaced past the engine.
pub enum ProviderError {
    /// Transport or HTTP status failure.
    #[error("Network error: {0}")]
    Network(String),
    /// The provider did not answer within the configured bound.
    #[error("Provider timed out")]
    Timeout,
    /// Response could not be decoded into suggestions.
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// Response decoded but contained no suggestions.
    #[error("Empty response")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
/// Per-category sum as reported by a store.
///
/// The category stays a raw tag and the total may be missing so that stores
/// backed by loosely typed tables can report what they hold.
pub struct CategorySum {
    /// Raw category tag.
    pub category: String,
    /// Summed amount, `None` when the backend reports a null sum.
    pub total: Option<f64>,
}

impl CategorySum {
    /// Build a sum row from a tag and a total.
    #[must_use]
    pub fn new<S: Into<String>>(category: S, total: Option<f64>) -> Self {
        Self {
            category: category.into(),
            total,
        }
    }
}

#[async_trait]
/// Append-only store of waste entries.
pub trait LogStore: Send + Sync {
    /// Append a new entry and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend rejects the write.
    async fn insert(
        &self,
        user_id: &UserId,
        entry: NewWasteEntry,
        logged_at: DateTime<Utc>,
    ) -> Result<WasteEntry, StoreError>;

    /// Sum the amounts of a user's entries within `range`, grouped by category.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend query fails.
    async fn sum_by_category(
        &self,
        user_id: &UserId,
        range: TimeRange,
    ) -> Result<Vec<CategorySum>, StoreError>;

    /// Sum all of a user's entries ever logged, grouped by category.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend query fails.
    async fn sum_all_time(&self, user_id: &UserId) -> Result<Vec<CategorySum>, StoreError> {
        self.sum_by_category(user_id, TimeRange::all_time()).await
    }

    /// Most recent entries of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend query fails.
    async fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<WasteEntry>, StoreError>;

    /// Total number of stored entries across all users.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend query fails.
    async fn count(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Input handed to a suggestion provider.
pub struct SuggestionRequest {
    /// Monthly totals of the user.
    pub totals: CategoryTotals,
    /// Number of suggestions wanted.
    pub count: usize,
}

impl SuggestionRequest {
    /// Suggestions wanted for the short dashboard list.
    pub const BRIEF_COUNT: usize = 2;
    /// Suggestions wanted for the detailed insights list.
    pub const DETAILED_COUNT: usize = 5;

    /// Build a request for the dashboard (`detailed == false`) or insights view.
    #[must_use]
    pub fn new(totals: CategoryTotals, detailed: bool) -> Self {
        let count = if detailed {
            Self::DETAILED_COUNT
        } else {
            Self::BRIEF_COUNT
        };
        Self { totals, count }
    }
}

#[async_trait]
/// Strategy producing coaching suggestions from category totals.
pub trait SuggestionProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produce suggestions for the given totals.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the provider cannot answer.
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, ProviderError>;
}
