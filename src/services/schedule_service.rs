use chrono::NaiveDate;
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{
        DaoBase, DaoLayerError, ProjectDao, ScheduleDao, ScheduleRange,
        schedule_dao::NewSchedule,
    },
    db::entities::schedule,
    error::AppError,
    ledger::{
        self, ChartView, DateRange, Earnings, Period, RateCard, SeriesPoint, Shift, Totals,
        parse_clock, parse_date, shift_hours,
    },
    services::{
        crud_service::{CrudErrors, CrudOp, CrudService},
        project_service::ProjectService,
        settings_service::SettingsService,
    },
};

/// Raw create body; times are `HH:MM[:SS]`, the date `YYYY-MM-DD` or RFC 3339.
#[derive(Debug, Clone, Default)]
pub struct ScheduleInput {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
    pub project_id: Option<Uuid>,
}

/// `notes: Some("")` clears the notes, `project_id: Some(None)` detaches.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
    pub project_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    #[serde(flatten)]
    pub totals: Totals,
    pub period: Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    pub period: Period,
    #[serde(flatten)]
    pub earnings: Earnings,
    pub hourly_rate: f64,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReport {
    pub view: ChartView,
    pub points: Vec<SeriesPoint>,
    /// Gross earnings of the whole chart window.
    pub total: f64,
    #[serde(flatten)]
    pub window: Earnings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: String,
    pub total_hours: f64,
    pub entry_count: u64,
    pub goal_hours: f64,
    pub remaining_hours: f64,
    pub progress: f64,
}

#[derive(Clone)]
pub struct ScheduleService<'a> {
    schedule_dao: ScheduleDao,
    project_dao: ProjectDao,
    settings: SettingsService<'a>,
}

impl<'a> ScheduleService<'a> {
    pub fn new(
        schedule_dao: ScheduleDao,
        project_dao: ProjectDao,
        settings: SettingsService<'a>,
    ) -> Self {
        Self {
            schedule_dao,
            project_dao,
            settings,
        }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        range: ScheduleRange,
    ) -> Result<Vec<schedule::Model>, AppError> {
        Ok(self.schedule_dao.list_for_user(user_id, range).await?)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<schedule::Model, AppError> {
        CrudService::find_owned(self, user_id, id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        input: ScheduleInput,
    ) -> Result<schedule::Model, AppError> {
        let date = parse_date(required(input.date.as_deref(), "Date is required")?)?;
        let start_time = parse_clock(required(
            input.start_time.as_deref(),
            "Start time is required",
        )?)?;
        let end_time = parse_clock(required(input.end_time.as_deref(), "End time is required")?)?;
        if let Some(project_id) = input.project_id {
            self.ensure_project(user_id, project_id).await?;
        }

        let new = NewSchedule {
            project_id: input.project_id,
            date,
            start_time,
            end_time,
            total_hours: shift_hours(start_time, end_time),
            notes: clean_notes(input.notes),
        };
        let entry = self
            .schedule_dao
            .create_entry(user_id, new)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        tracing::debug!(schedule_id = %entry.id, hours = entry.total_hours, "schedule entry created");
        Ok(entry)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SchedulePatch,
    ) -> Result<schedule::Model, AppError> {
        let current = self.get(user_id, id).await?;

        let date = patch.date.as_deref().map(parse_date).transpose()?;
        let start_time = patch.start_time.as_deref().map(parse_clock).transpose()?;
        let end_time = patch.end_time.as_deref().map(parse_clock).transpose()?;
        if let Some(Some(project_id)) = patch.project_id {
            self.ensure_project(user_id, project_id).await?;
        }

        let total_hours = (start_time.is_some() || end_time.is_some()).then(|| {
            shift_hours(
                start_time.unwrap_or(current.start_time),
                end_time.unwrap_or(current.end_time),
            )
        });
        let notes = patch.notes.map(|notes| clean_notes(Some(notes)));
        let project_id = patch.project_id;

        self.schedule_dao
            .save_changes(current, move |active| {
                if let Some(date) = date {
                    active.date = Set(date);
                }
                if let Some(start_time) = start_time {
                    active.start_time = Set(start_time);
                }
                if let Some(end_time) = end_time {
                    active.end_time = Set(end_time);
                }
                if let Some(total_hours) = total_hours {
                    active.total_hours = Set(total_hours);
                }
                if let Some(notes) = notes {
                    active.notes = Set(notes);
                }
                if let Some(project_id) = project_id {
                    active.project_id = Set(project_id);
                }
            })
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        CrudService::delete_owned(self, user_id, id).await
    }

    pub async fn totals(
        &self,
        user_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<PeriodTotals, AppError> {
        let range = period.range(today)?;
        let shifts = self.shifts(user_id, range).await?;
        Ok(PeriodTotals {
            totals: ledger::totals(&shifts, range),
            period,
        })
    }

    pub async fn earnings(
        &self,
        user_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<EarningsReport, AppError> {
        let settings = self.settings.get_or_create(user_id).await?;
        let rates = self.rate_card(user_id, settings.hourly_rate).await?;
        let range = period.range(today)?;
        let shifts = self.shifts(user_id, range).await?;

        Ok(EarningsReport {
            period,
            earnings: ledger::earnings(&shifts, range, &rates, settings.tax_rate),
            hourly_rate: settings.hourly_rate,
            tax_rate: settings.tax_rate,
        })
    }

    pub async fn series(
        &self,
        user_id: Uuid,
        view: ChartView,
        today: NaiveDate,
    ) -> Result<SeriesReport, AppError> {
        let settings = self.settings.get_or_create(user_id).await?;
        let rates = self.rate_card(user_id, settings.hourly_rate).await?;
        let buckets = view.buckets(today)?;
        let window = DateRange {
            end: Some(today),
            ..cover(buckets.iter().map(|bucket| bucket.range))
        };
        let shifts = self.shifts(user_id, window).await?;
        let earnings = ledger::earnings(&shifts, window, &rates, settings.tax_rate);

        Ok(SeriesReport {
            view,
            points: ledger::series(&shifts, &buckets, &rates),
            total: earnings.gross,
            window: earnings,
        })
    }

    /// `month` is the first day of the month to report on.
    pub async fn monthly(&self, user_id: Uuid, month: NaiveDate) -> Result<MonthlyReport, AppError> {
        let settings = self.settings.get_or_create(user_id).await?;
        let range = DateRange::month_of(month)?;
        let shifts = self.shifts(user_id, range).await?;
        let totals = ledger::totals(&shifts, range);
        let progress = ledger::goal_progress(totals.total_hours, settings.monthly_goal_hours);

        Ok(MonthlyReport {
            month: month.format("%Y-%m").to_string(),
            total_hours: totals.total_hours,
            entry_count: totals.entry_count,
            goal_hours: progress.goal,
            remaining_hours: progress.remaining,
            progress: progress.ratio,
        })
    }

    async fn shifts(&self, user_id: Uuid, range: DateRange) -> Result<Vec<Shift>, AppError> {
        let rows = self
            .schedule_dao
            .list_for_user(user_id, ScheduleRange::new(range.start, range.end))
            .await?;
        Ok(rows.iter().map(Shift::from).collect())
    }

    async fn rate_card(&self, user_id: Uuid, default_rate: f64) -> Result<RateCard, AppError> {
        ProjectService::new(self.project_dao.clone(), self.schedule_dao.clone())
            .rate_card(user_id, default_rate)
            .await
    }

    async fn ensure_project(&self, user_id: Uuid, project_id: Uuid) -> Result<(), AppError> {
        self.project_dao
            .find_owned(user_id, project_id)
            .await
            .map(|_| ())
            .map_err(|err| match err {
                DaoLayerError::NotFound { .. } => AppError::not_found("Project not found"),
                other => AppError::from(other),
            })
    }
}

fn required<'v>(value: Option<&'v str>, message: &'static str) -> Result<&'v str, AppError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request(message))
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

/// Smallest range containing all of `ranges`.
fn cover(ranges: impl Iterator<Item = DateRange>) -> DateRange {
    ranges
        .reduce(|acc, range| DateRange {
            start: acc.start.zip(range.start).map(|(a, b)| a.min(b)),
            end: acc.end.zip(range.end).map(|(a, b)| a.max(b)),
        })
        .unwrap_or_default()
}

impl CrudService for ScheduleService<'_> {
    type Dao = ScheduleDao;

    fn dao(&self) -> &Self::Dao {
        &self.schedule_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Create schedule failed",
            find_failed: "Schedule fetch failed",
            not_found: "Schedule not found",
            update_failed: "Update schedule failed",
            delete_failed: "Delete schedule failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use uuid::Uuid;

    use super::{ScheduleInput, SchedulePatch, ScheduleService, cover};
    use crate::{
        config::SettingsDefaults,
        db::dao::{DaoBase, ProjectDao, ScheduleDao, SettingsDao},
        db::entities::project,
        error::AppError,
        ledger::{ChartView, DateRange, Period},
        services::settings_service::SettingsService,
        test_helpers::{date, fixtures},
    };

    fn service<'a>(db: &DatabaseConnection, defaults: &'a SettingsDefaults) -> ScheduleService<'a> {
        ScheduleService::new(
            ScheduleDao::new(db),
            ProjectDao::new(db),
            SettingsService::new(SettingsDao::new(db), defaults),
        )
    }

    #[test]
    fn cover_spans_every_range() {
        let range = cover(
            [
                DateRange::between(date("2026-03-02"), date("2026-03-08")),
                DateRange::between(date("2026-02-23"), date("2026-03-01")),
            ]
            .into_iter(),
        );
        assert_eq!(
            range,
            DateRange::between(date("2026-02-23"), date("2026-03-08"))
        );
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let defaults = SettingsDefaults::default();
        let err = service(&db, &defaults)
            .create(
                Uuid::new_v4(),
                ScheduleInput {
                    date: Some("2026-03-10".to_string()),
                    start_time: Some("09:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("end time is missing");
        assert!(matches!(err, AppError::BadRequest(ref message) if message == "End time is required"));
    }

    #[tokio::test]
    async fn create_rejects_foreign_project() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<project::Model>::new()])
            .into_connection();
        let defaults = SettingsDefaults::default();
        let err = service(&db, &defaults)
            .create(
                Uuid::new_v4(),
                ScheduleInput {
                    date: Some("2026-03-10".to_string()),
                    start_time: Some("09:00".to_string()),
                    end_time: Some("17:00".to_string()),
                    project_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("project belongs to someone else");
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Project not found"));
    }

    #[tokio::test]
    async fn create_computes_overnight_hours() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::schedule(
                user_id,
                "2026-03-10",
                "22:00",
                "06:00",
                None,
            )]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let entry = service(&db, &defaults)
            .create(
                user_id,
                ScheduleInput {
                    date: Some("2026-03-10".to_string()),
                    start_time: Some("22:00".to_string()),
                    end_time: Some("06:00".to_string()),
                    notes: Some("  ".to_string()),
                    project_id: None,
                },
            )
            .await
            .expect("entry should be created");
        assert_eq!(entry.total_hours, 8.0);
        assert_eq!(entry.notes, None);
    }

    #[tokio::test]
    async fn update_recomputes_hours_when_a_time_changes() {
        let user_id = Uuid::new_v4();
        let current = fixtures::schedule(user_id, "2026-03-10", "09:00", "17:00", None);
        let id = current.id;
        let mut updated = current.clone();
        updated.end_time = crate::test_helpers::clock("13:30");
        updated.total_hours = 4.5;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[current], [updated]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let entry = service(&db, &defaults)
            .update(
                user_id,
                id,
                SchedulePatch {
                    end_time: Some("13:30".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");
        assert_eq!(entry.total_hours, 4.5);
    }

    #[tokio::test]
    async fn earnings_use_project_rates_and_settings_tax() {
        let user_id = Uuid::new_v4();
        let project = fixtures::project(user_id, "Acme", Some(200.0));
        let project_id = project.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)]])
            .append_query_results([[project]])
            .append_query_results([[
                fixtures::schedule(user_id, "2026-03-10", "09:00", "17:00", Some(project_id)),
                fixtures::schedule(user_id, "2026-03-09", "09:00", "11:00", None),
            ]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .earnings(user_id, Period::Month, date("2026-03-15"))
            .await
            .expect("earnings should compute");
        // 8h x 200 + 2h x 147
        assert_eq!(report.earnings.hours, 10.0);
        assert_eq!(report.earnings.gross, 1894.0);
        assert_eq!(report.earnings.taxes, 568.2);
        assert_eq!(report.earnings.net, 1325.8);
        assert_eq!(report.hourly_rate, 147.0);
    }

    #[tokio::test]
    async fn series_total_covers_the_whole_window() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)]])
            .append_query_results([Vec::<project::Model>::new()])
            .append_query_results([[fixtures::schedule(
                user_id,
                "2026-03-09",
                "09:00",
                "17:00",
                None,
            )]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .series(user_id, ChartView::Daily, date("2026-03-10"))
            .await
            .expect("series should compute");
        assert_eq!(report.points[5].earnings, 1176.0);
        assert_eq!(report.points[6].earnings, 0.0);
        assert_eq!(report.total, 1176.0);
        assert_eq!(report.window.hours, 8.0);
        assert_eq!(report.window.taxes, 352.8);
        assert_eq!(report.window.net, 823.2);
    }

    #[tokio::test]
    async fn series_ignores_shifts_after_today() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)]])
            .append_query_results([Vec::<project::Model>::new()])
            .append_query_results([[
                fixtures::schedule(user_id, "2026-03-25", "09:00", "17:00", None),
                fixtures::schedule(user_id, "2026-03-02", "09:00", "10:00", None),
            ]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .series(user_id, ChartView::Monthly, date("2026-03-10"))
            .await
            .expect("series should compute");
        assert_eq!(report.window.hours, 1.0);
        assert_eq!(report.total, 147.0);
    }

    #[tokio::test]
    async fn totals_leave_out_later_shifts_of_the_month() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                fixtures::schedule(user_id, "2026-03-20", "09:00", "17:00", None),
                fixtures::schedule(user_id, "2026-03-10", "09:00", "12:00", None),
            ]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .totals(user_id, Period::Month, date("2026-03-12"))
            .await
            .expect("totals should compute");
        assert_eq!(report.totals.total_hours, 3.0);
        assert_eq!(report.totals.entry_count, 1);
    }

    #[tokio::test]
    async fn series_returns_one_point_per_bucket() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)]])
            .append_query_results([Vec::<project::Model>::new()])
            .append_query_results([[fixtures::schedule(
                user_id,
                "2026-03-10",
                "09:00",
                "10:00",
                None,
            )]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .series(user_id, ChartView::Daily, date("2026-03-10"))
            .await
            .expect("series should compute");
        assert_eq!(report.points.len(), 7);
        assert_eq!(report.points[6].hours, 1.0);
        assert_eq!(report.points[6].earnings, 147.0);
        assert_eq!(report.total, 147.0);
    }

    #[tokio::test]
    async fn monthly_reports_goal_progress() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::settings(user_id)]])
            .append_query_results([[
                fixtures::schedule(user_id, "2026-03-10", "08:00", "16:00", None),
                fixtures::schedule(user_id, "2026-03-11", "08:00", "16:00", None),
            ]])
            .into_connection();
        let defaults = SettingsDefaults::default();

        let report = service(&db, &defaults)
            .monthly(user_id, date("2026-03-01"))
            .await
            .expect("report should compute");
        assert_eq!(report.month, "2026-03");
        assert_eq!(report.total_hours, 16.0);
        assert_eq!(report.goal_hours, 160.0);
        assert_eq!(report.remaining_hours, 144.0);
        assert_eq!(report.progress, 0.1);
    }
}
