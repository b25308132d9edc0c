use serde::{Deserialize, Serialize};

/// Stock position relative to the low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Low,
    Medium,
    Good,
}

impl StockStatus {
    /// Classifies a stock level against the alert threshold.
    ///
    /// At or below the threshold is `Low`; above that but at or below
    /// twice the threshold is `Medium`; everything else is `Good`.
    /// Both boundaries are inclusive, so a threshold of zero reports
    /// `Low` only at exactly zero stock.
    pub fn classify(current: i64, minimum_alert: i64) -> Self {
        if current <= minimum_alert {
            StockStatus::Low
        } else if current <= minimum_alert * 2 {
            StockStatus::Medium
        } else {
            StockStatus::Good
        }
    }

    /// Returns the wire spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Low => "LOW",
            StockStatus::Medium => "MEDIUM",
            StockStatus::Good => "GOOD",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
