use serde::{Deserialize, Serialize};

/// A score tier awarded when a day's percentage reaches `min_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub display_name: String,
    pub icon: String,
    pub color: String,
    /// Threshold on the -100..=100 percentage scale.
    pub min_score: f64,
    pub sort_order: i64,
    pub active: bool,
}

impl Badge {
    pub fn new(id: &str, min_score: f64) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.to_string(),
            icon: super::DEFAULT_BADGE_ICON.to_string(),
            color: super::DEFAULT_BADGE_COLOR.to_string(),
            min_score,
            sort_order: super::DEFAULT_SORT_ORDER,
            active: true,
        }
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }
}
