//! High-level service facade combining the log store, aggregator, and suggestion engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::aggregate::Aggregator;
use crate::model::{
    MonthlyStats, NewWasteEntry, Region, RegionSummary, Suggestion, UserId, WasteEntry,
    WeeklyTrendPoint,
};
use crate::ports::{LogStore, StoreError};
use crate::regions::{default_regions, demo_entries};
use crate::suggest::SuggestionEngine;

/// Number of log rows shown when no limit is given.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

#[derive(thiserror::Error, Debug)]
/// Errors returned by [`WasteWiseService`].
pub enum ServiceError {
    /// The log store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// Logged amount is negative or not a number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    /// User identifier is blank.
    #[error("Missing user id")]
    MissingUser,
}

/// Public entry point for logging waste and reading derived statistics.
///
/// Every operation takes the user explicitly; the service keeps no session state.
pub struct WasteWiseService {
    store: Arc<dyn LogStore>,
    aggregator: Aggregator,
    engine: SuggestionEngine,
    regions: Vec<Region>,
}

impl WasteWiseService {
    /// Create a service over `store` using `engine` for suggestions.
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>, engine: SuggestionEngine) -> Self {
        Self {
            aggregator: Aggregator::new(Arc::clone(&store)),
            store,
            engine,
            regions: default_regions(),
        }
    }

    /// Replace the regions used by [`Self::region_summary`].
    #[must_use]
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }

    /// Name of the provider asked first for suggestions.
    #[must_use]
    pub fn suggestion_source(&self) -> &str {
        self.engine.primary_name()
    }

    /// Append a waste entry logged at `logged_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingUser`] for a blank user,
    /// [`ServiceError::InvalidAmount`] for negative or non-finite amounts, and
    /// [`ServiceError::Store`] when the write fails.
    pub async fn log_waste(
        &self,
        user_id: &UserId,
        mut entry: NewWasteEntry,
        logged_at: DateTime<Utc>,
    ) -> Result<WasteEntry, ServiceError> {
        if user_id.0.trim().is_empty() {
            return Err(ServiceError::MissingUser);
        }
        if !entry.amount.is_finite() || entry.amount < 0.0 {
            return Err(ServiceError::InvalidAmount(entry.amount));
        }

        entry.unit = entry
            .unit
            .map(|unit| unit.trim().to_owned())
            .filter(|unit| !unit.is_empty());
        entry.note = entry
            .note
            .map(|note| note.trim().to_owned())
            .filter(|note| !note.is_empty());

        let stored = self.store.insert(user_id, entry, logged_at).await?;
        info!(
            user = %stored.user_id,
            category = %stored.category,
            amount = stored.amount,
            "waste logged"
        );
        Ok(stored)
    }

    /// Latest entries of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store query fails.
    pub async fn recent_logs(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<WasteEntry>, ServiceError> {
        Ok(self.store.recent(user_id, limit).await?)
    }

    /// Statistics of the 30 days before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store query fails.
    pub async fn monthly_stats(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<MonthlyStats, ServiceError> {
        Ok(self.aggregator.monthly_stats(user_id, now).await?)
    }

    /// Six weekly buckets ending at `now`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub async fn weekly_trend(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<WeeklyTrendPoint>, ServiceError> {
        Ok(self.aggregator.weekly_trend(user_id, now).await?)
    }

    /// All-time totals of the configured regions.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub async fn region_summary(&self) -> Result<Vec<RegionSummary>, ServiceError> {
        Ok(self.aggregator.region_summary(&self.regions).await?)
    }

    /// Coaching suggestions based on the user's monthly stats.
    ///
    /// Provider failures never surface here; only reading the stats can fail.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the stats cannot be read.
    pub async fn suggestions(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
        detailed: bool,
    ) -> Result<Vec<Suggestion>, ServiceError> {
        let stats = self.aggregator.monthly_stats(user_id, now).await?;
        Ok(self.suggestions_for(&stats, detailed).await)
    }

    /// Coaching suggestions for stats the caller already loaded, so a screen can
    /// show totals and tips from the same snapshot.
    pub async fn suggestions_for(&self, stats: &MonthlyStats, detailed: bool) -> Vec<Suggestion> {
        self.engine.select(stats, detailed).await
    }

    /// Seed the demo region entries when the store is empty.
    ///
    /// Returns the number of inserted entries.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store cannot be read or written.
    pub async fn seed_demo_data(&self, now: DateTime<Utc>) -> Result<usize, ServiceError> {
        if self.store.count().await? > 0 {
            return Ok(0);
        }

        let entries = demo_entries();
        for (region, entry) in &entries {
            self.store
                .insert(&region.user_id(), entry.clone(), now)
                .await?;
        }

        info!(count = entries.len(), "seeded demo region data");
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::Category;
    use crate::store::InMemoryLogStore;

    fn service() -> WasteWiseService {
        WasteWiseService::new(
            Arc::new(InMemoryLogStore::new()),
            SuggestionEngine::rules_only(),
        )
    }

    #[tokio::test]
    async fn logged_entry_shows_up_in_stats_and_trend() {
        let service = service();
        let user = UserId::from("ana");
        let logged_at = Utc::now();

        service
            .log_waste(&user, NewWasteEntry::new(Category::Plastic, 0.75), logged_at)
            .await
            .expect("log");
        let now = logged_at + Duration::seconds(1);

        let stats = service.monthly_stats(&user, now).await.expect("stats");
        assert!((stats.plastic - 0.75).abs() < 1e-9, "plastic total");
        assert_eq!(stats.goals.plastic.pct, 100);

        let trend = service.weekly_trend(&user, now).await.expect("trend");
        let newest = trend.last().expect("six points");
        assert!((newest.plastic - 0.75).abs() < 1e-9, "newest bucket");
    }

    #[tokio::test]
    async fn log_rejects_invalid_input() {
        let service = service();
        let now = Utc::now();

        let negative = service
            .log_waste(&UserId::from("ana"), NewWasteEntry::new(Category::Food, -1.0), now)
            .await;
        assert!(matches!(negative, Err(ServiceError::InvalidAmount(_))));

        let nan = service
            .log_waste(&UserId::from("ana"), NewWasteEntry::new(Category::Food, f64::NAN), now)
            .await;
        assert!(matches!(nan, Err(ServiceError::InvalidAmount(_))));

        let blank = service
            .log_waste(&UserId::from("  "), NewWasteEntry::new(Category::Food, 1.0), now)
            .await;
        assert!(matches!(blank, Err(ServiceError::MissingUser)));
    }

    #[tokio::test]
    async fn blank_unit_and_note_are_normalised() {
        let service = service();
        let entry = NewWasteEntry {
            unit: Some("  ".into()),
            note: Some(String::new()),
            ..NewWasteEntry::new(Category::Energy, 3.0)
        };

        let stored = service
            .log_waste(&UserId::from("ana"), entry, Utc::now())
            .await
            .expect("log");

        assert_eq!(stored.unit, "kWh");
        assert_eq!(stored.note, None);
    }

    #[tokio::test]
    async fn demo_seed_runs_once_and_feeds_region_summary() {
        let service = service();
        let now = Utc::now();

        assert_eq!(service.seed_demo_data(now).await.expect("seed"), 12);
        assert_eq!(service.seed_demo_data(now).await.expect("seed"), 0);

        let summary = service.region_summary().await.expect("summary");
        let names: Vec<&str> = summary.iter().map(|row| row.region.name.as_str()).collect();
        assert_eq!(names, ["RS Puram", "Gandhipuram", "Saravanampatti", "Peelamedu"]);
        let rs_puram = summary.first().expect("four regions");
        assert!((rs_puram.food - 4.8).abs() < 1e-9, "food total");
        assert!((rs_puram.energy - 18.0).abs() < 1e-9, "energy total");
    }

    #[tokio::test]
    async fn suggestions_follow_monthly_totals() {
        let service = service();
        let user = UserId::from("ana");
        let now = Utc::now();
        for (category, amount) in [
            (Category::Food, 5.0),
            (Category::Plastic, 1.0),
            (Category::Energy, 2.0),
        ] {
            service
                .log_waste(&user, NewWasteEntry::new(category, amount), now - Duration::hours(1))
                .await
                .expect("log");
        }

        let brief = service.suggestions(&user, now, false).await.expect("tips");
        let detailed = service.suggestions(&user, now, true).await.expect("tips");

        let order: Vec<Category> = brief.iter().map(|tip| tip.category).collect();
        assert_eq!(order, [Category::Food, Category::Energy]);
        assert_eq!(detailed.len(), 3);
        assert_eq!(service.suggestion_source(), "rules");
    }

    #[tokio::test]
    async fn suggestions_for_loaded_stats_match_a_fresh_read() {
        let service = service();
        let user = UserId::from("ana");
        let now = Utc::now();
        service
            .log_waste(&user, NewWasteEntry::new(Category::Plastic, 2.0), now - Duration::hours(2))
            .await
            .expect("log");

        let stats = service.monthly_stats(&user, now).await.expect("stats");
        service
            .log_waste(&user, NewWasteEntry::new(Category::Energy, 40.0), now - Duration::hours(1))
            .await
            .expect("log");

        let from_snapshot = service.suggestions_for(&stats, false).await;
        let fresh = service.suggestions(&user, now, false).await.expect("tips");

        let snapshot_order: Vec<Category> = from_snapshot.iter().map(|tip| tip.category).collect();
        let fresh_order: Vec<Category> = fresh.iter().map(|tip| tip.category).collect();
        assert_eq!(snapshot_order, [Category::Plastic, Category::Food]);
        assert_eq!(fresh_order, [Category::Energy, Category::Plastic]);
    }

    #[tokio::test]
    async fn recent_logs_are_limited_per_user() {
        let service = service();
        let user = UserId::from("ana");
        let now = Utc::now();
        for minutes in 0..25 {
            service
                .log_waste(
                    &user,
                    NewWasteEntry::new(Category::Food, 0.1),
                    now - Duration::minutes(minutes),
                )
                .await
                .expect("log");
        }

        let recent = service
            .recent_logs(&user, DEFAULT_RECENT_LIMIT)
            .await
            .expect("recent");

        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
        assert_eq!(recent.first().map(|row| row.logged_at), Some(now));
    }
}
