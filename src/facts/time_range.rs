use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The analysis window selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    #[serde(rename = "6months")]
    #[strum(serialize = "6months")]
    #[value(name = "6months")]
    SixMonths,
    Year,
    All,
}

impl TimeRange {
    /// Parse a time-range key, falling back to [`TimeRange::Week`] for anything unrecognized.
    #[must_use]
    pub fn parse_or_default(key: &str) -> Self {
        key.trim().parse().unwrap_or_default()
    }

    /// Number of days covered by this window, or `None` for an unbounded window.
    #[must_use]
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::Day => Some(1),
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::SixMonths => Some(180),
            Self::Year => Some(365),
            Self::All => None,
        }
    }

    /// Lower bound of the window relative to `now`.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }

    /// Human phrasing of the window, as used in summaries.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Day => "in the last day",
            Self::Week => "in the last week",
            Self::Month => "in the last month",
            Self::Quarter => "in the last quarter",
            Self::SixMonths => "in the last six months",
            Self::Year => "in the last year",
            Self::All => "across its history",
        }
    }

    /// Whether a timestamp falls inside the window ending at `now`.
    #[must_use]
    pub fn contains(self, now: DateTime<Utc>, at: DateTime<Utc>) -> bool {
        self.since(now).is_none_or(|since| at >= since)
    }
}
