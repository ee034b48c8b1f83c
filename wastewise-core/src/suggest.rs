//! Suggestion ranking: a rule-based catalog with an optional external provider in front.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::model::{Category, MonthlyStats, Suggestion};
use crate::ports::{ProviderError, SuggestionProvider, SuggestionRequest};

/// Catalog entry: title and body of a coaching tip.
pub type Tip = (&'static str, &'static str);

const FOOD_TIPS: [Tip; 4] = [
    (
        "Plan meals before shopping",
        "You tend to waste food mid-week. Try planning Mon–Thu meals before your weekly shop to use existing fridge stock first.",
    ),
    (
        "First-in, first-out",
        "Move older items to the front of your fridge when you shop. This simple habit cuts food waste by up to 25%.",
    ),
    (
        "Freeze before it expires",
        "Bread, cooked rice, and fruit about to turn? Freeze them. Your freezer is your best zero-waste tool.",
    ),
    (
        "Smaller portions, seconds available",
        "Serving smaller portions and offering seconds reduces plate waste without anyone going hungry.",
    ),
];

const PLASTIC_TIPS: [Tip; 4] = [
    (
        "Carry a reusable bag",
        "Single-use carrier bags account for a large share of your plastic waste. A foldable bag in your pocket fixes this permanently.",
    ),
    (
        "Switch to bar soap & shampoo bars",
        "Liquid soap and shampoo bottles are 90% of bathroom plastic waste for most users. Bars last longer and produce zero packaging.",
    ),
    (
        "Buy in bulk",
        "Buying dry goods (rice, lentils, oats) in bulk dramatically reduces packaging waste per kg of food.",
    ),
    (
        "Reuse glass jars",
        "Instead of buying storage containers, repurpose glass jars from food products. They're airtight and last years.",
    ),
];

const ENERGY_TIPS: [Tip; 4] = [
    (
        "Standby is not off",
        "Devices on standby can account for 10–15% of home energy use. A smart power strip cuts this automatically.",
    ),
    (
        "Wash clothes at 30°C",
        "90% of a washing machine's energy goes to heating water. Washing at 30°C works just as well for most loads.",
    ),
    (
        "LED bulbs everywhere",
        "If you haven't replaced all bulbs with LEDs yet, it's the single highest-ROI energy action available.",
    ),
    (
        "Short cold showers",
        "Cutting shower time by 2 minutes saves around 10 litres of hot water, and the energy to heat it, per shower.",
    ),
];

/// Tip catalog for `category`.
#[must_use]
pub fn tips(category: Category) -> &'static [Tip] {
    match category {
        Category::Food => &FOOD_TIPS,
        Category::Plastic => &PLASTIC_TIPS,
        Category::Energy => &ENERGY_TIPS,
    }
}

/// Emoji shown next to suggestions for `category`.
#[must_use]
pub fn emoji(category: Category) -> &'static str {
    match category {
        Category::Food => "🥗",
        Category::Plastic => "🧴",
        Category::Energy => "⚡",
    }
}

/// Rule-based provider ranking categories by their totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicProvider;

impl DeterministicProvider {
    /// Rank categories by amount (descending, ties keep food, plastic, energy order)
    /// and pick the tip at the rank's position in each catalog.
    ///
    /// At most `request.count` suggestions are returned, one per category.
    #[must_use]
    pub fn rank(&self, request: &SuggestionRequest) -> Vec<Suggestion> {
        let mut ranked = Category::ALL;
        ranked.sort_by(|left, right| {
            request
                .totals
                .get(*right)
                .partial_cmp(&request.totals.get(*left))
                .unwrap_or(Ordering::Equal)
        });

        ranked
            .into_iter()
            .enumerate()
            .take(request.count)
            .filter_map(|(rank, category)| {
                let catalog = tips(category);
                let (title, body) = catalog.get(rank.checked_rem(catalog.len())?)?;
                Some(Suggestion {
                    category,
                    emoji: emoji(category).to_owned(),
                    title: (*title).to_owned(),
                    body: (*body).to_owned(),
                    amount: request.totals.get(category),
                })
            })
            .collect()
    }
}

#[async_trait]
impl SuggestionProvider for DeterministicProvider {
    fn name(&self) -> &str {
        "rules"
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, ProviderError> {
        Ok(self.rank(request))
    }
}

/// Chooses suggestions from an optional primary provider, falling back to the rules.
pub struct SuggestionEngine {
    primary: Option<Arc<dyn SuggestionProvider>>,
    fallback: DeterministicProvider,
}

impl SuggestionEngine {
    /// Engine using only the rule-based provider.
    #[must_use]
    pub fn rules_only() -> Self {
        Self {
            primary: None,
            fallback: DeterministicProvider,
        }
    }

    /// Engine asking `primary` first.
    #[must_use]
    pub fn with_primary(primary: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            primary: Some(primary),
            fallback: DeterministicProvider,
        }
    }

    /// Name of the provider consulted first.
    #[must_use]
    pub fn primary_name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.fallback.name(),
        }
    }

    /// Suggestions for `stats`: 2 for the dashboard, more when `detailed`.
    ///
    /// Never fails. Errors and empty answers from the primary provider are
    /// logged and replaced by the rule-based ranking.
    pub async fn select(&self, stats: &MonthlyStats, detailed: bool) -> Vec<Suggestion> {
        let request = SuggestionRequest::new(stats.totals(), detailed);

        if let Some(primary) = &self.primary {
            match primary.suggest(&request).await {
                Ok(suggestions) if !suggestions.is_empty() => {
                    debug!(
                        provider = primary.name(),
                        count = suggestions.len(),
                        "using provider suggestions"
                    );
                    return suggestions;
                }
                Ok(_) => warn!(
                    provider = primary.name(),
                    "provider returned no suggestions, using rules"
                ),
                Err(err) => warn!(
                    provider = primary.name(),
                    "provider failed, using rules: {err}"
                ),
            }
        }

        self.fallback.rank(&request)
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::rules_only()
    }
}
