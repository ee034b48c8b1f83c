//! In-memory log store used by the terminal client and tests.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Category, EntryId, NewWasteEntry, TimeRange, UserId, WasteEntry};
use crate::ports::{CategorySum, LogStore, StoreError};

#[derive(Default)]
struct Entries {
    rows: Vec<WasteEntry>,
    next_id: u64,
}

/// Thread-safe, append-only [`LogStore`] keeping every entry in memory.
#[derive(Default)]
pub struct InMemoryLogStore {
    entries: RwLock<Entries>,
}

impl InMemoryLogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_err: T) -> StoreError {
    StoreError::Internal("log store lock poisoned".into())
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn insert(
        &self,
        user_id: &UserId,
        entry: NewWasteEntry,
        logged_at: DateTime<Utc>,
    ) -> Result<WasteEntry, StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.next_id += 1;

        let unit = entry
            .unit
            .filter(|unit| !unit.trim().is_empty())
            .unwrap_or_else(|| entry.category.default_unit().to_owned());

        let stored = WasteEntry {
            id: EntryId(entries.next_id),
            user_id: user_id.clone(),
            category: entry.category,
            amount: entry.amount,
            unit,
            note: entry.note,
            logged_at,
        };
        entries.rows.push(stored.clone());

        Ok(stored)
    }

    async fn sum_by_category(
        &self,
        user_id: &UserId,
        range: TimeRange,
    ) -> Result<Vec<CategorySum>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;

        let sums = Category::ALL
            .into_iter()
            .filter_map(|category| {
                let mut matching = entries
                    .rows
                    .iter()
                    .filter(|row| {
                        row.user_id == *user_id
                            && row.category == category
                            && range.contains(row.logged_at)
                    })
                    .peekable();
                matching.peek()?;
                let total: f64 = matching.map(|row| row.amount).sum();
                Some(CategorySum::new(category.as_str(), Some(total)))
            })
            .collect();

        Ok(sums)
    }

    async fn recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<WasteEntry>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;

        let mut rows: Vec<WasteEntry> = entries
            .rows
            .iter()
            .filter(|row| row.user_id == *user_id)
            .cloned()
            .collect();
        rows.sort_by(|left, right| {
            right
                .logged_at
                .cmp(&left.logged_at)
                .then(right.id.cmp(&left.id))
        });
        rows.truncate(limit);

        Ok(rows)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().map_err(poisoned)?.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_default_unit() {
        let store = InMemoryLogStore::new();
        let user = UserId::from("ana");
        let now = Utc::now();

        let first = store
            .insert(&user, NewWasteEntry::new(Category::Energy, 2.0), now)
            .await
            .expect("insert");
        let second = store
            .insert(
                &user,
                NewWasteEntry {
                    unit: Some("items".into()),
                    ..NewWasteEntry::new(Category::Plastic, 3.0)
                },
                now,
            )
            .await
            .expect("insert");

        assert!(first.id < second.id, "ids must increase");
        assert_eq!(first.unit, "kWh");
        assert_eq!(second.unit, "items");
        assert_eq!(store.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn sums_skip_categories_without_rows() {
        let store = InMemoryLogStore::new();
        let user = UserId::from("ana");
        let now = Utc::now();
        for amount in [1.0, 2.5] {
            store
                .insert(&user, NewWasteEntry::new(Category::Food, amount), now)
                .await
                .expect("insert");
        }

        let sums = store
            .sum_by_category(&user, TimeRange::all_time())
            .await
            .expect("sums");

        assert_eq!(sums, vec![CategorySum::new("food", Some(3.5))]);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = InMemoryLogStore::new();
        let user = UserId::from("ana");
        let now = Utc::now();
        for days_ago in [3, 1, 2] {
            store
                .insert(
                    &user,
                    NewWasteEntry::new(Category::Food, 1.0),
                    now - Duration::days(days_ago),
                )
                .await
                .expect("insert");
        }
        store
            .insert(&UserId::from("bob"), NewWasteEntry::new(Category::Food, 1.0), now)
            .await
            .expect("insert");

        let recent = store.recent(&user, 2).await.expect("recent");

        let stamps: Vec<DateTime<Utc>> = recent.iter().map(|row| row.logged_at).collect();
        assert_eq!(stamps, vec![now - Duration::days(1), now - Duration::days(2)]);
    }
}
