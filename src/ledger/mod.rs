//! Hour and earnings arithmetic behind the dashboard endpoints.
//!
//! Everything here is pure: callers fetch schedule rows, convert them into
//! [`Shift`]s and hand them over together with a reference date.

mod earnings;
mod error;
mod hours;
mod period;

pub use earnings::{
    Earnings, GoalProgress, RateCard, SeriesPoint, Shift, Totals, earnings, goal_progress,
    series, totals,
};
pub use error::LedgerError;
pub use hours::{
    parse_clock, parse_date, parse_end_date, parse_month, parse_start_date, round2, shift_hours,
    shift_minutes,
};
pub use period::{Bucket, ChartView, DateRange, Period};
