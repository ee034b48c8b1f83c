use std::sync::Arc;

use chrono::Utc;
use wastewise_core::{
    model::{
        Category, MonthlyStats, NewWasteEntry, RegionSummary, Suggestion, UserId, WasteEntry,
        WeeklyTrendPoint,
    },
    service::{DEFAULT_RECENT_LIMIT, ServiceError, WasteWiseService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Log,
    Trend,
    Map,
    Insights,
}

impl Screen {
    pub(crate) const ALL: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Log,
        Screen::Trend,
        Screen::Map,
        Screen::Insights,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Log => "Log waste",
            Screen::Trend => "Trend",
            Screen::Map => "Map",
            Screen::Insights => "Insights",
        }
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|screen| *screen == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> Self {
        let next = (self.index() + 1) % Self::ALL.len();
        Self::ALL.get(next).copied().unwrap_or(Screen::Dashboard)
    }

    pub(crate) fn previous(self) -> Self {
        let previous = (self.index() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL.get(previous).copied().unwrap_or(Screen::Dashboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogField {
    Category,
    Amount,
    Note,
}

impl LogField {
    pub(crate) fn next(self) -> Self {
        match self {
            LogField::Category => LogField::Amount,
            LogField::Amount => LogField::Note,
            LogField::Note => LogField::Category,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            LogField::Category => LogField::Note,
            LogField::Amount => LogField::Category,
            LogField::Note => LogField::Amount,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<WasteWiseService>,
    pub user: UserId,

    pub screen: Screen,

    pub stats: Option<MonthlyStats>,
    pub suggestions: Vec<Suggestion>,
    pub trend: Vec<WeeklyTrendPoint>,
    pub regions: Vec<RegionSummary>,
    pub recent: Vec<WasteEntry>,

    pub form_category: Category,
    pub amount_input: String,
    pub note_input: String,
    pub focus: LogField,

    pub is_loading: bool,
    pub error_message: Option<String>,
    pub info_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<WasteWiseService>, user: UserId) -> Self {
        Self {
            service,
            user,
            screen: Screen::Dashboard,
            stats: None,
            suggestions: Vec::new(),
            trend: Vec::new(),
            regions: Vec::new(),
            recent: Vec::new(),
            form_category: Category::Food,
            amount_input: String::new(),
            note_input: String::new(),
            focus: LogField::Amount,
            is_loading: false,
            error_message: None,
            info_message: None,
        }
    }

    pub(crate) fn cycle_category(&mut self, forward: bool) {
        let all = Category::ALL;
        let current = all
            .iter()
            .position(|category| *category == self.form_category)
            .unwrap_or_default();
        let next = if forward {
            (current + 1) % all.len()
        } else {
            (current + all.len() - 1) % all.len()
        };
        self.form_category = all.get(next).copied().unwrap_or(Category::Food);
    }

    /// Reload the data shown on the current screen.
    pub(crate) async fn refresh(&mut self) -> Result<(), ServiceError> {
        let now = Utc::now();

        match self.screen {
            Screen::Dashboard => {
                let stats = self.service.monthly_stats(&self.user, now).await?;
                self.suggestions = self.service.suggestions_for(&stats, false).await;
                self.stats = Some(stats);
            }
            Screen::Log => {
                self.recent = self
                    .service
                    .recent_logs(&self.user, DEFAULT_RECENT_LIMIT)
                    .await?;
            }
            Screen::Trend => {
                self.trend = self.service.weekly_trend(&self.user, now).await?;
            }
            Screen::Map => {
                self.regions = self.service.region_summary().await?;
            }
            Screen::Insights => {
                let stats = self.service.monthly_stats(&self.user, now).await?;
                self.suggestions = self.service.suggestions_for(&stats, true).await;
                self.stats = Some(stats);
            }
        }

        Ok(())
    }

    /// Validate the log form and store the entry. Returns a confirmation message.
    pub(crate) async fn submit_log(&mut self) -> Result<String, String> {
        let amount = parse_amount(&self.amount_input)?;
        let entry = NewWasteEntry {
            note: Some(self.note_input.clone()),
            ..NewWasteEntry::new(self.form_category, amount)
        };

        let stored = self
            .service
            .log_waste(&self.user, entry, Utc::now())
            .await
            .map_err(|err| format!("Could not log entry: {err}"))?;

        self.amount_input.clear();
        self.note_input.clear();
        self.focus = LogField::Amount;

        Ok(format!(
            "Logged {} {} of {}",
            stored.amount, stored.unit, stored.category
        ))
    }
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, String> {
    let trimmed = input.trim().replace(',', ".");
    if trimmed.is_empty() {
        return Err("Enter an amount first".into());
    }

    let amount: f64 = trimmed
        .parse()
        .map_err(|_err| format!("'{}' is not a number", input.trim()))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount must be zero or more".into());
    }

    Ok(amount)
}
