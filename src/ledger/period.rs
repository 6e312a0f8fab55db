use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::LedgerError;

/// Inclusive date interval; an open side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The calendar month containing `day`.
    pub fn month_of(day: NaiveDate) -> Result<Self, LedgerError> {
        let first = first_of_month(day);
        Ok(Self::between(first, last_of_month(first)?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    All,
}

impl Period {
    /// A missing query value means `all`.
    pub fn parse(raw: Option<&str>) -> Result<Self, LedgerError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(Period::All),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }

    /// From the start of the period up to and including `today`; weeks
    /// start on Sunday. Later dates are never part of the range.
    pub fn range(self, today: NaiveDate) -> Result<DateRange, LedgerError> {
        let start = match self {
            Period::Day => Some(today),
            Period::Week => Some(days_back(
                today,
                u64::from(today.weekday().num_days_from_sunday()),
            )?),
            Period::Month => Some(first_of_month(today)),
            Period::All => None,
        };
        Ok(DateRange {
            start,
            end: Some(today),
        })
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            _ => Err(LedgerError::UnknownPeriod(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub range: DateRange,
}

impl ChartView {
    /// A missing query value means `daily`.
    pub fn parse(raw: Option<&str>) -> Result<Self, LedgerError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(ChartView::Daily),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartView::Daily => "daily",
            ChartView::Weekly => "weekly",
            ChartView::Monthly => "monthly",
        }
    }

    /// Chart buckets ending with the one that contains `today`, oldest first.
    pub fn buckets(self, today: NaiveDate) -> Result<Vec<Bucket>, LedgerError> {
        match self {
            ChartView::Daily => (0..7u64)
                .rev()
                .map(|back| {
                    let day = days_back(today, back)?;
                    Ok(Bucket {
                        label: day.format("%a %-d").to_string(),
                        range: DateRange::between(day, day),
                    })
                })
                .collect(),
            ChartView::Weekly => (0..4u64)
                .rev()
                .map(|back| {
                    let end = days_back(today, back * 7)?;
                    Ok(Bucket {
                        label: format!("Week {}", back + 1),
                        range: DateRange::between(days_back(end, 6)?, end),
                    })
                })
                .collect(),
            ChartView::Monthly => (0..6u32)
                .rev()
                .map(|back| {
                    let first = first_of_month(today)
                        .checked_sub_months(Months::new(back))
                        .ok_or_else(|| out_of_range(today))?;
                    Ok(Bucket {
                        label: first.format("%b").to_string(),
                        range: DateRange::between(first, last_of_month(first)?),
                    })
                })
                .collect(),
        }
    }
}

impl FromStr for ChartView {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "daily" => Ok(ChartView::Daily),
            "weekly" => Ok(ChartView::Weekly),
            "monthly" => Ok(ChartView::Monthly),
            _ => Err(LedgerError::UnknownView(raw.to_string())),
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn last_of_month(first: NaiveDate) -> Result<NaiveDate, LedgerError> {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(first))
}

fn days_back(day: NaiveDate, days: u64) -> Result<NaiveDate, LedgerError> {
    day.checked_sub_days(Days::new(days))
        .ok_or_else(|| out_of_range(day))
}

fn out_of_range(day: NaiveDate) -> LedgerError {
    LedgerError::InvalidDate(day.to_string())
}
