//! Replaces a user's schedule with five sample weekday shifts.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use clap::Parser;

use shiftbook::{
    config::AppConfig,
    db::{
        connection,
        dao::{DaoContext, schedule_dao::NewSchedule},
    },
    ledger::shift_hours,
    logging::init_cli_tracing,
};

const SAMPLE_SHIFTS: [(&str, &str, &str); 5] = [
    ("09:00", "17:30", "Regular work day"),
    ("08:30", "17:00", "Early start"),
    ("09:00", "16:00", "Short Friday"),
    ("09:15", "18:00", "Long day"),
    ("10:00", "18:30", "Late start, late finish"),
];

#[derive(Parser)]
#[command(author, version, about = "Seed sample schedule entries")]
struct Args {
    /// User to seed (defaults to the oldest account)
    #[arg(long)]
    email: Option<String>,
    /// Last day to fill, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    until: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = AppConfig::from_env()?;
    init_cli_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database.url is required (set SHIFTBOOK_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;
    let daos = DaoContext::new(&db);

    let user = match args.email.as_deref() {
        Some(email) => daos.user().find_by_email(email).await?,
        None => daos.user().find_first().await?,
    };
    let Some(user) = user else {
        bail!("no matching user found; sign up first");
    };
    tracing::info!(email = %user.email, "seeding schedule data");

    let schedules = daos.schedule();
    let removed = schedules.delete_all_for_user(user.id).await?;
    tracing::info!(removed, "cleared existing schedule entries");

    let until = args.until.unwrap_or_else(|| Utc::now().date_naive());
    for (date, (start, end, notes)) in weekdays_back_from(until).zip(SAMPLE_SHIFTS) {
        let start_time = NaiveTime::parse_from_str(start, "%H:%M")?;
        let end_time = NaiveTime::parse_from_str(end, "%H:%M")?;
        let total_hours = shift_hours(start_time, end_time);
        schedules
            .create_entry(
                user.id,
                NewSchedule {
                    project_id: None,
                    date,
                    start_time,
                    end_time,
                    total_hours,
                    notes: Some(notes.to_string()),
                },
            )
            .await?;
        tracing::info!(%date, start, end, total_hours, "added shift");
    }

    tracing::info!("seed completed");
    Ok(())
}

/// `until` (if it is a weekday) and the weekdays before it, newest first.
fn weekdays_back_from(until: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..)
        .map(move |offset| until - Duration::days(offset))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::weekdays_back_from;

    #[test]
    fn skips_weekends() {
        let tuesday = NaiveDate::from_ymd_opt(2024, 12, 10).expect("valid date");
        let days: Vec<String> = weekdays_back_from(tuesday)
            .take(5)
            .map(|day| day.to_string())
            .collect();
        assert_eq!(
            days,
            ["2024-12-10", "2024-12-09", "2024-12-06", "2024-12-05", "2024-12-04"]
        );
    }
}
