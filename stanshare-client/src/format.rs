//! Display helpers shared by every front end
//!
//! Pure functions: currency, dates, and the status/score colour categories.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Placeholder for absent dates
pub const MISSING_DATE: &str = "N/A";
/// Output for date strings that do not parse
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a dollar amount as `$1,234.56`.
///
/// Absent, zero and non-finite amounts all render as `$0.00`.
pub fn format_currency(value: Option<f64>) -> String {
    let amount = match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };

    // Format from the float itself so large amounts are not clamped
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a backend date as `Jan 5, 2024`.
///
/// Accepts RFC 3339 timestamps, plain `YYYY-MM-DD`, and naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_string();
    };

    parse_date(raw).map_or_else(
        || INVALID_DATE.to_string(),
        |date| date.format("%b %-d, %Y").to_string(),
    )
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Visual category for a batch/job status string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Pending,
    Error,
    Neutral,
}

impl StatusCategory {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusCategory::Success => "text-green-400",
            StatusCategory::Pending => "text-yellow-400",
            StatusCategory::Error => "text-red-400",
            StatusCategory::Neutral => "text-slate-400",
        }
    }
}

pub fn status_category(status: &str) -> StatusCategory {
    match status.trim().to_lowercase().as_str() {
        "completed" | "running" => StatusCategory::Success,
        "pending" => StatusCategory::Pending,
        "failed" | "error" => StatusCategory::Error,
        _ => StatusCategory::Neutral,
    }
}

/// Visual category for a quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    Excellent,
    Warning,
    Caution,
    Critical,
}

impl ScoreCategory {
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "text-green-400 bg-green-400/10",
            ScoreCategory::Warning => "text-yellow-400 bg-yellow-400/10",
            ScoreCategory::Caution => "text-orange-400 bg-orange-400/10",
            ScoreCategory::Critical => "text-red-400 bg-red-400/10",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "excellent",
            ScoreCategory::Warning => "warning",
            ScoreCategory::Caution => "caution",
            ScoreCategory::Critical => "critical",
        }
    }
}

/// Inclusive lower bounds of the score categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    pub excellent: f64,
    pub warning: f64,
    pub caution: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            warning: 70.0,
            caution: 50.0,
        }
    }
}

impl ScoreThresholds {
    /// Thresholds must be strictly descending
    pub fn validate(&self) -> Result<()> {
        if !(self.excellent > self.warning && self.warning > self.caution) {
            return Err(ClientError::Config(format!(
                "score thresholds must descend: excellent {} > warning {} > caution {}",
                self.excellent, self.warning, self.caution
            )));
        }
        Ok(())
    }
}

pub fn score_category(score: f64, thresholds: &ScoreThresholds) -> ScoreCategory {
    if score >= thresholds.excellent {
        ScoreCategory::Excellent
    } else if score >= thresholds.warning {
        ScoreCategory::Warning
    } else if score >= thresholds.caution {
        ScoreCategory::Caution
    } else {
        ScoreCategory::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_placeholder() {
        let zero = format_currency(Some(0.0));
        assert_eq!(zero, "$0.00");
        assert_eq!(format_currency(None), zero);
        assert_eq!(format_currency(Some(f64::NAN)), zero);
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(Some(1_000_000.0)), "$1,000,000.00");
        assert_eq!(format_currency(Some(999.999)), "$1,000.00");
        assert_eq!(format_currency(Some(12.5)), "$12.50");
        assert_eq!(format_currency(Some(-1234.5)), "-$1,234.50");
        assert_eq!(format_currency(Some(123_456.78)), "$123,456.78");

        // Beyond u64 cents
        assert_eq!(format_currency(Some(1e20)), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(Some(-1e20)), "-$100,000,000,000,000,000,000.00");
        let huge = format_currency(Some(1e25));
        assert!(huge.starts_with("$10,000,000,000,000,000,"));
        assert_eq!(huge.matches(',').count(), 8);
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("   ")), "N/A");
        assert_eq!(format_date(Some("2024-01-05")), "Jan 5, 2024");
        assert_eq!(format_date(Some("2023-11-30T14:22:01Z")), "Nov 30, 2023");
        assert_eq!(format_date(Some("2023-11-30 08:00:00")), "Nov 30, 2023");
        assert_eq!(format_date(Some("not a date")), "Invalid Date");
    }

    #[test]
    fn test_status_categories() {
        assert_eq!(status_category("Completed"), StatusCategory::Success);
        assert_eq!(status_category("running"), StatusCategory::Success);
        assert_eq!(status_category("pending"), StatusCategory::Pending);
        assert_eq!(status_category("ERROR"), StatusCategory::Error);
        assert_eq!(status_category("failed"), StatusCategory::Error);
        assert_eq!(status_category("processing"), StatusCategory::Neutral);
        assert_eq!(StatusCategory::Neutral.css_class(), "text-slate-400");
    }

    #[test]
    fn test_score_categories() {
        let t = ScoreThresholds::default();
        assert_eq!(score_category(95.0, &t), ScoreCategory::Excellent);
        assert_eq!(score_category(75.0, &t), ScoreCategory::Warning);
        assert_eq!(score_category(55.0, &t), ScoreCategory::Caution);
        assert_eq!(score_category(10.0, &t), ScoreCategory::Critical);

        // Lower bounds are inclusive
        assert_eq!(score_category(90.0, &t), ScoreCategory::Excellent);
        assert_eq!(score_category(70.0, &t), ScoreCategory::Warning);
        assert_eq!(score_category(50.0, &t), ScoreCategory::Caution);
        assert_eq!(score_category(49.99, &t), ScoreCategory::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = ScoreThresholds {
            excellent: 98.0,
            warning: 90.0,
            caution: 80.0,
        };
        assert!(strict.validate().is_ok());
        assert_eq!(score_category(95.0, &strict), ScoreCategory::Warning);

        let broken = ScoreThresholds {
            excellent: 50.0,
            warning: 70.0,
            caution: 10.0,
        };
        assert!(broken.validate().is_err());
    }
}
