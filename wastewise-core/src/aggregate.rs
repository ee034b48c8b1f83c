//! Aggregation of raw waste entries into monthly, weekly, and regional statistics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::model::{
    Category, CategoryTotals, GoalProgress, Goals, MonthlyStats, Region, RegionSummary, TimeRange,
    UserId, WeeklyTrendPoint,
};
use crate::ports::{CategorySum, LogStore, StoreError};

/// kg CO2e per kg of food waste.
pub const CO2_PER_KG_FOOD: f64 = 0.5;
/// kg CO2e per kg of plastic waste.
pub const CO2_PER_KG_PLASTIC: f64 = 1.8;
/// kg CO2e per kWh of wasted energy.
pub const CO2_PER_KWH_ENERGY: f64 = 0.23;

/// Monthly food target in kg.
pub const FOOD_TARGET_KG: f64 = 2.0;
/// Monthly plastic target in kg.
pub const PLASTIC_TARGET_KG: f64 = 0.5;
/// Monthly energy target in kWh.
pub const ENERGY_TARGET_KWH: f64 = 10.0;

/// Length of the trailing window used for monthly stats.
pub const MONTHLY_WINDOW_DAYS: i64 = 30;
/// Number of 7-day buckets in the weekly trend.
pub const TREND_WEEKS: i64 = 6;

const STATS_DECIMALS: i32 = 2;
const REGION_DECIMALS: i32 = 1;

/// Computes derived statistics from a [`LogStore`].
pub struct Aggregator {
    store: Arc<dyn LogStore>,
}

impl Aggregator {
    /// Create an aggregator reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Totals, CO2-equivalent and goal progress over the 30 days before `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store query fails.
    pub async fn monthly_stats(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<MonthlyStats, StoreError> {
        let range = TimeRange::since(now - Duration::days(MONTHLY_WINDOW_DAYS));
        let sums = self.store.sum_by_category(user_id, range).await?;
        Ok(MonthlyStats::from_totals(collect_totals(
            &sums,
            STATS_DECIMALS,
        )))
    }

    /// Six consecutive 7-day buckets ending at `now`, oldest first.
    ///
    /// Bucket `Wk n` covers `[now - (7 - n) weeks, now - (6 - n) weeks)`, so an
    /// entry logged exactly on a boundary is counted once, in the newer bucket.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when a store query fails.
    pub async fn weekly_trend(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<WeeklyTrendPoint>, StoreError> {
        let mut points = Vec::with_capacity(6);

        for weeks_back in (0..TREND_WEEKS).rev() {
            let end = now - Duration::weeks(weeks_back);
            let start = end - Duration::weeks(1);
            let sums = self
                .store
                .sum_by_category(user_id, TimeRange::between(start, end))
                .await?;
            let totals = collect_totals(&sums, STATS_DECIMALS);

            points.push(WeeklyTrendPoint {
                label: format!("Wk {}", TREND_WEEKS - weeks_back),
                food: totals.food,
                plastic: totals.plastic,
                energy: totals.energy,
            });
        }

        Ok(points)
    }

    /// All-time totals of each region's synthetic user, in the order of `regions`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when a store query fails.
    pub async fn region_summary(
        &self,
        regions: &[Region],
    ) -> Result<Vec<RegionSummary>, StoreError> {
        let mut summaries = Vec::with_capacity(regions.len());

        for region in regions {
            let sums = self.store.sum_all_time(&region.user_id()).await?;
            let totals = collect_totals(&sums, REGION_DECIMALS);

            summaries.push(RegionSummary {
                region: region.clone(),
                food: totals.food,
                plastic: totals.plastic,
                energy: totals.energy,
            });
        }

        Ok(summaries)
    }
}

impl MonthlyStats {
    /// Derive CO2-equivalent and goal progress from already rounded totals.
    #[must_use]
    pub fn from_totals(totals: CategoryTotals) -> Self {
        let co2_saved = round_to(
            totals.food * CO2_PER_KG_FOOD
                + totals.plastic * CO2_PER_KG_PLASTIC
                + totals.energy * CO2_PER_KWH_ENERGY,
            STATS_DECIMALS,
        );

        Self {
            food: totals.food,
            plastic: totals.plastic,
            energy: totals.energy,
            co2_saved,
            goals: Goals {
                food: goal_progress(totals.food, FOOD_TARGET_KG),
                plastic: goal_progress(totals.plastic, PLASTIC_TARGET_KG),
                energy: goal_progress(totals.energy, ENERGY_TARGET_KWH),
            },
        }
    }
}

fn goal_progress(current: f64, target: f64) -> GoalProgress {
    let pct = (current / target * 100.0).round_ties_even().clamp(0.0, 100.0);

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "pct is clamped to 0..=100"
    )]
    let pct = pct as u8;

    GoalProgress {
        target,
        current,
        pct,
    }
}

/// Fold store rows into the three tracked categories.
///
/// Null sums count as zero and rows with unknown tags are skipped.
fn collect_totals(sums: &[CategorySum], decimals: i32) -> CategoryTotals {
    let mut totals = CategoryTotals::default();

    for sum in sums {
        match sum.category.parse::<Category>() {
            Ok(category) => *totals.get_mut(category) += sum.total.unwrap_or(0.0).max(0.0),
            Err(err) => debug!(tag = %sum.category, "ignoring stored sum: {err}"),
        }
    }

    for category in Category::ALL {
        let slot = totals.get_mut(category);
        *slot = round_to(*slot, decimals);
    }

    totals
}

// Halves go to the even neighbour: 0.125 -> 0.12, 0.25 -> 0.2.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::model::{NewWasteEntry, PressureLevel, WasteEntry};
    use crate::store::InMemoryLogStore;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-15T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    async fn log(
        store: &InMemoryLogStore,
        user: &str,
        category: Category,
        amount: f64,
        at: DateTime<Utc>,
    ) {
        store
            .insert(&UserId::from(user), NewWasteEntry::new(category, amount), at)
            .await
            .expect("insert succeeds");
    }

    /// Store that reports canned sums regardless of the query.
    struct CannedStore(Vec<CategorySum>);

    #[async_trait]
    impl LogStore for CannedStore {
        async fn insert(
            &self,
            _user_id: &UserId,
            _entry: NewWasteEntry,
            _logged_at: DateTime<Utc>,
        ) -> Result<WasteEntry, StoreError> {
            Err(StoreError::Internal("read-only".into()))
        }

        async fn sum_by_category(
            &self,
            _user_id: &UserId,
            _range: TimeRange,
        ) -> Result<Vec<CategorySum>, StoreError> {
            Ok(self.0.clone())
        }

        async fn recent(
            &self,
            _user_id: &UserId,
            _limit: usize,
        ) -> Result<Vec<WasteEntry>, StoreError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn monthly_totals_sum_entries_inside_window() {
        let store = Arc::new(InMemoryLogStore::new());
        let now = now();
        log(&store, "ana", Category::Food, 1.111, now - Duration::days(1)).await;
        log(&store, "ana", Category::Food, 2.222, now - Duration::days(29)).await;
        log(&store, "ana", Category::Plastic, 0.4, now - Duration::hours(3)).await;
        log(&store, "ana", Category::Food, 50.0, now - Duration::days(31)).await;
        log(&store, "bob", Category::Energy, 7.0, now - Duration::days(1)).await;

        let stats = Aggregator::new(store)
            .monthly_stats(&UserId::from("ana"), now)
            .await
            .expect("stats");

        assert_close(stats.food, 3.33);
        assert_close(stats.plastic, 0.4);
        assert_close(stats.energy, 0.0);
        assert_close(stats.goals.food.current, stats.food);
        assert_close(stats.goals.plastic.current, stats.plastic);
    }

    #[tokio::test]
    async fn monthly_window_includes_its_start() {
        let store = Arc::new(InMemoryLogStore::new());
        let now = now();
        log(&store, "ana", Category::Energy, 3.0, now - Duration::days(30)).await;

        let stats = Aggregator::new(store)
            .monthly_stats(&UserId::from("ana"), now)
            .await
            .expect("stats");

        assert_close(stats.energy, 3.0);
    }

    #[test]
    fn co2_uses_fixed_coefficients() {
        let stats = MonthlyStats::from_totals(CategoryTotals {
            food: 4.0,
            plastic: 1.0,
            energy: 10.0,
        });

        assert_close(stats.co2_saved, 6.1);
    }

    #[test]
    fn goal_pct_is_clamped_to_one_hundred() {
        let stats = MonthlyStats::from_totals(CategoryTotals {
            food: 10.0,
            plastic: 0.1,
            energy: 0.0,
        });

        assert_eq!(stats.goals.food.pct, 100);
        assert_eq!(stats.goals.plastic.pct, 20);
        assert_eq!(stats.goals.energy.pct, 0);
        assert_close(stats.goals.energy.target, ENERGY_TARGET_KWH);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let stats = MonthlyStats::from_totals(CategoryTotals {
            food: 0.25,
            plastic: 0.0,
            energy: 0.0,
        });
        assert_eq!(stats.goals.food.pct, 12);

        let monthly = collect_totals(&[CategorySum::new("food", Some(0.125))], STATS_DECIMALS);
        assert_close(monthly.food, 0.12);

        let regional = collect_totals(&[CategorySum::new("plastic", Some(0.25))], REGION_DECIMALS);
        assert_close(regional.plastic, 0.2);
    }

    #[tokio::test]
    async fn region_totals_round_halves_to_even() {
        let store = Arc::new(InMemoryLogStore::new());
        let region = Region {
            name: "Half Way".into(),
            lat: 0.0,
            lng: 0.0,
            level: PressureLevel::Medium,
        };
        log(&store, "demo_halfway", Category::Food, 0.25, now()).await;

        let summary = Aggregator::new(store)
            .region_summary(&[region])
            .await
            .expect("summary");

        let row = summary.first().expect("one row");
        assert_close(row.food, 0.2);
    }

    #[tokio::test]
    async fn weekly_trend_has_six_points_without_data() {
        let aggregator = Aggregator::new(Arc::new(InMemoryLogStore::new()));

        let trend = aggregator
            .weekly_trend(&UserId::from("nobody"), now())
            .await
            .expect("trend");

        let labels: Vec<&str> = trend.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(labels, ["Wk 1", "Wk 2", "Wk 3", "Wk 4", "Wk 5", "Wk 6"]);
        for point in &trend {
            assert_close(point.food + point.plastic + point.energy, 0.0);
        }
    }

    #[tokio::test]
    async fn weekly_trend_buckets_are_half_open() {
        let store = Arc::new(InMemoryLogStore::new());
        let now = now();
        log(&store, "ana", Category::Food, 1.0, now - Duration::minutes(1)).await;
        log(&store, "ana", Category::Food, 2.0, now - Duration::weeks(1)).await;
        log(&store, "ana", Category::Plastic, 0.5, now - Duration::days(8)).await;
        log(&store, "ana", Category::Energy, 4.0, now - Duration::days(40)).await;
        log(&store, "ana", Category::Energy, 9.0, now - Duration::weeks(6)).await;

        let trend = Aggregator::new(store)
            .weekly_trend(&UserId::from("ana"), now)
            .await
            .expect("trend");

        let newest = trend.last().expect("six points");
        assert_close(newest.food, 3.0);

        let previous = trend.get(4).expect("six points");
        assert_close(previous.food, 0.0);
        assert_close(previous.plastic, 0.5);

        let oldest = trend.first().expect("six points");
        assert_eq!(oldest.label, "Wk 1");
        assert_close(oldest.energy, 13.0);
    }

    #[tokio::test]
    async fn region_summary_keeps_input_order_and_rounds_to_one_decimal() {
        let store = Arc::new(InMemoryLogStore::new());
        let now = now();
        let regions = vec![
            Region {
                name: "Quiet Town".into(),
                lat: 1.0,
                lng: 2.0,
                level: PressureLevel::Low,
            },
            Region {
                name: "Big City".into(),
                lat: 3.0,
                lng: 4.0,
                level: PressureLevel::High,
            },
        ];
        log(&store, "demo_quiettown", Category::Food, 0.26, now).await;
        log(&store, "demo_bigcity", Category::Energy, 120.04, now).await;
        log(&store, "demo_bigcity", Category::Energy, 0.02, now - Duration::days(400)).await;

        let summary = Aggregator::new(store)
            .region_summary(&regions)
            .await
            .expect("summary");

        let names: Vec<&str> = summary.iter().map(|row| row.region.name.as_str()).collect();
        assert_eq!(names, ["Quiet Town", "Big City"]);
        let quiet = summary.first().expect("two rows");
        assert_close(quiet.food, 0.3);
        let big = summary.get(1).expect("two rows");
        assert_close(big.energy, 120.1);
    }

    #[tokio::test]
    async fn unknown_tags_and_null_sums_are_ignored() {
        let store = Arc::new(CannedStore(vec![
            CategorySum::new("food", Some(1.5)),
            CategorySum::new("glass", Some(99.0)),
            CategorySum::new("plastic", None),
        ]));

        let stats = Aggregator::new(store)
            .monthly_stats(&UserId::from("ana"), now())
            .await
            .expect("stats");

        assert_close(stats.food, 1.5);
        assert_close(stats.plastic, 0.0);
        assert_close(stats.energy, 0.0);
    }
}
