use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{Bucket, DateRange, round2};
use crate::db::entities::schedule;

/// The slice of a schedule row the ledger needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub date: NaiveDate,
    pub hours: f64,
    pub project_id: Option<Uuid>,
}

impl From<&schedule::Model> for Shift {
    fn from(entry: &schedule::Model) -> Self {
        Self {
            date: entry.date,
            hours: entry.total_hours,
            project_id: entry.project_id,
        }
    }
}

/// Default hourly rate plus per-project overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCard {
    pub default_rate: f64,
    pub project_rates: HashMap<Uuid, f64>,
}

impl RateCard {
    pub fn new(default_rate: f64) -> Self {
        Self {
            default_rate,
            project_rates: HashMap::new(),
        }
    }

    /// Non-positive project rates are ignored.
    pub fn with_project_rate(mut self, project_id: Uuid, rate: Option<f64>) -> Self {
        if let Some(rate) = rate.filter(|rate| *rate > 0.0) {
            self.project_rates.insert(project_id, rate);
        }
        self
    }

    pub fn rate_for(&self, project_id: Option<Uuid>) -> f64 {
        project_id
            .and_then(|id| self.project_rates.get(&id).copied())
            .unwrap_or(self.default_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_hours: f64,
    pub entry_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Earnings {
    pub hours: f64,
    pub gross: f64,
    pub taxes: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    pub hours: f64,
    pub earnings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub hours: f64,
    pub goal: f64,
    pub remaining: f64,
    pub ratio: f64,
}

pub fn totals(shifts: &[Shift], range: DateRange) -> Totals {
    let (hours, count) = shifts
        .iter()
        .filter(|shift| range.contains(shift.date))
        .fold((0.0, 0u64), |(hours, count), shift| (hours + shift.hours, count + 1));
    Totals {
        total_hours: round2(hours),
        entry_count: count,
    }
}

fn gross_in(shifts: &[Shift], range: DateRange, rates: &RateCard) -> (f64, f64) {
    shifts
        .iter()
        .filter(|shift| range.contains(shift.date))
        .fold((0.0, 0.0), |(hours, gross), shift| {
            (
                hours + shift.hours,
                gross + shift.hours * rates.rate_for(shift.project_id),
            )
        })
}

pub fn earnings(shifts: &[Shift], range: DateRange, rates: &RateCard, tax_rate: f64) -> Earnings {
    let (hours, gross) = gross_in(shifts, range, rates);
    let taxes = gross * tax_rate;
    Earnings {
        hours: round2(hours),
        gross: round2(gross),
        taxes: round2(taxes),
        net: round2(gross - taxes),
    }
}

/// One point per chart bucket; earnings are rounded to whole units.
pub fn series(shifts: &[Shift], buckets: &[Bucket], rates: &RateCard) -> Vec<SeriesPoint> {
    buckets
        .iter()
        .map(|bucket| {
            let (hours, gross) = gross_in(shifts, bucket.range, rates);
            SeriesPoint {
                period: bucket.label.clone(),
                hours: round2(hours),
                earnings: gross.round(),
            }
        })
        .collect()
}

pub fn goal_progress(hours: f64, goal: f64) -> GoalProgress {
    let ratio = if goal > 0.0 { (hours / goal).max(0.0) } else { 0.0 };
    GoalProgress {
        hours: round2(hours),
        goal: round2(goal),
        remaining: round2((goal - hours).max(0.0)),
        ratio: round2(ratio),
    }
}
