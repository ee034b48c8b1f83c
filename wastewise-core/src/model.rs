//! Domain data structures for waste entries and the statistics derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of the user owning a waste entry.
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(raw: &str) -> Self {
        UserId(raw.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Store-assigned identifier of a waste entry.
pub struct EntryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Waste types tracked by the application.
pub enum Category {
    /// Food waste, in kilograms.
    Food,
    /// Plastic waste, in kilograms.
    Plastic,
    /// Wasted energy, in kilowatt hours.
    Energy,
}

impl Category {
    /// All categories in their canonical order.
    pub const ALL: [Category; 3] = [Category::Food, Category::Plastic, Category::Energy];

    /// Lowercase tag used in storage and serialized output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Plastic => "plastic",
            Category::Energy => "energy",
        }
    }

    /// Unit assumed when a log action does not name one.
    #[must_use]
    pub fn default_unit(self) -> &'static str {
        match self {
            Category::Food | Category::Plastic => "kg",
            Category::Energy => "kWh",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "plastic" => Ok(Category::Plastic),
            "energy" => Ok(Category::Energy),
            _ => Err(StoreError::UnknownCategory(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single logged amount of waste. Never modified after it is stored.
pub struct WasteEntry {
    /// Identifier assigned by the log store.
    pub id: EntryId,
    /// Owner of the entry.
    pub user_id: UserId,
    /// Waste type.
    pub category: Category,
    /// Non-negative amount in `unit`.
    pub amount: f64,
    /// Unit label such as `kg` or `kWh`.
    pub unit: String,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Time the entry was logged.
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Input of a log action before the store assigns an id.
pub struct NewWasteEntry {
    /// Waste type.
    pub category: Category,
    /// Amount in `unit`.
    pub amount: f64,
    /// Unit label. Blank values fall back to [`Category::default_unit`].
    pub unit: Option<String>,
    /// Optional free-text note. Blank notes are dropped.
    pub note: Option<String>,
}

impl NewWasteEntry {
    /// Construct an entry with the default unit and no note.
    #[must_use]
    pub fn new(category: Category, amount: f64) -> Self {
        Self {
            category,
            amount,
            unit: None,
            note: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Time window used when querying the log store.
///
/// `start` is inclusive and `end` exclusive; `None` leaves that side unbounded.
pub struct TimeRange {
    /// Lower bound (inclusive).
    pub start: Option<DateTime<Utc>>,
    /// Upper bound (exclusive).
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Range covering every entry ever logged.
    #[must_use]
    pub fn all_time() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Range starting at `start` without an upper bound.
    #[must_use]
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Half-open range `[start, end)`.
    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Check whether `instant` falls into the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant < end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Summed amounts for each category.
pub struct CategoryTotals {
    /// Food waste in kg.
    pub food: f64,
    /// Plastic waste in kg.
    pub plastic: f64,
    /// Energy waste in kWh.
    pub energy: f64,
}

impl CategoryTotals {
    /// Amount recorded for `category`.
    #[must_use]
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Food => self.food,
            Category::Plastic => self.plastic,
            Category::Energy => self.energy,
        }
    }

    /// Mutable slot for `category`.
    pub fn get_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Food => &mut self.food,
            Category::Plastic => &mut self.plastic,
            Category::Energy => &mut self.energy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Progress of one category towards its monthly target.
pub struct GoalProgress {
    /// Fixed monthly target.
    pub target: f64,
    /// Current total, identical to the matching stats total.
    pub current: f64,
    /// `current / target` as a percentage, clamped to `0..=100`.
    pub pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Goal progress for every category.
pub struct Goals {
    /// Food goal.
    pub food: GoalProgress,
    /// Plastic goal.
    pub plastic: GoalProgress,
    /// Energy goal.
    pub energy: GoalProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Statistics over the trailing 30 days. Recomputed on every request.
pub struct MonthlyStats {
    /// Food waste in kg.
    pub food: f64,
    /// Plastic waste in kg.
    pub plastic: f64,
    /// Energy waste in kWh.
    pub energy: f64,
    /// Estimated CO2-equivalent in kg.
    pub co2_saved: f64,
    /// Progress towards the fixed monthly targets.
    pub goals: Goals,
}

impl MonthlyStats {
    /// The three category totals.
    #[must_use]
    pub fn totals(&self) -> CategoryTotals {
        CategoryTotals {
            food: self.food,
            plastic: self.plastic,
            energy: self.energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Totals of one 7-day bucket of the weekly trend.
pub struct WeeklyTrendPoint {
    /// Bucket label, `Wk 1` (oldest) to `Wk 6` (newest).
    pub label: String,
    /// Food waste in kg.
    pub food: f64,
    /// Plastic waste in kg.
    pub plastic: f64,
    /// Energy waste in kWh.
    pub energy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Qualitative waste level shown for a region.
pub enum PressureLevel {
    /// Above-average waste.
    High,
    /// Average waste.
    Medium,
    /// Below-average waste.
    Low,
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            PressureLevel::High => "high",
            PressureLevel::Medium => "medium",
            PressureLevel::Low => "low",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Static metadata of a region shown on the comparison map.
pub struct Region {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Qualitative level.
    pub level: PressureLevel,
}

impl Region {
    /// Synthetic user whose entries represent this region.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        let slug: String = self
            .name
            .to_lowercase()
            .chars()
            .filter(|ch| *ch != ' ')
            .collect();
        UserId(format!("demo_{slug}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Region metadata joined with its all-time totals.
pub struct RegionSummary {
    /// Static region metadata.
    #[serde(flatten)]
    pub region: Region,
    /// Food waste in kg.
    pub food: f64,
    /// Plastic waste in kg.
    pub plastic: f64,
    /// Energy waste in kWh.
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Coaching tip shown to a user.
pub struct Suggestion {
    /// Category the tip addresses.
    pub category: Category,
    /// Emoji shown next to the tip.
    pub emoji: String,
    /// Short headline.
    pub title: String,
    /// One or two sentences of advice.
    pub body: String,
    /// The user's current total for `category`.
    pub amount: f64,
}
