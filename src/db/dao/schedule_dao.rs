use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{ColumnFilter, CompareOp, DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Schedule, schedule};

#[derive(Clone)]
pub struct ScheduleDao {
    db: DatabaseConnection,
}

impl DaoBase for ScheduleDao {
    type Entity = Schedule;
    const ENTITY_NAME: &'static str = "Schedule entry";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Inclusive date bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ScheduleRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn all() -> Self {
        Self::default()
    }

    fn filters(&self) -> Vec<ColumnFilter<schedule::Column>> {
        let mut filters = Vec::new();
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                filters.push(ColumnFilter::between(schedule::Column::Date, start, end));
            }
            (Some(start), None) => {
                filters.push(ColumnFilter::compare(
                    schedule::Column::Date,
                    CompareOp::Gte,
                    start,
                ));
            }
            (None, Some(end)) => {
                filters.push(ColumnFilter::compare(
                    schedule::Column::Date,
                    CompareOp::Lte,
                    end,
                ));
            }
            (None, None) => {}
        }
        filters
    }
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub project_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: f64,
    pub notes: Option<String>,
}

impl ScheduleDao {
    pub async fn create_entry(&self, user_id: Uuid, new: NewSchedule) -> DaoResult<schedule::Model> {
        let model = schedule::ActiveModel {
            user_id: Set(user_id),
            project_id: Set(new.project_id),
            date: Set(new.date),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            total_hours: Set(new.total_hours),
            notes: Set(new.notes),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Newest first: by date, then by start time.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        range: ScheduleRange,
    ) -> DaoResult<Vec<schedule::Model>> {
        let mut filters = range.filters();
        filters.push(ColumnFilter::eq(schedule::Column::UserId, user_id));
        self.list(filters).await
    }

    pub async fn list_for_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        range: ScheduleRange,
    ) -> DaoResult<Vec<schedule::Model>> {
        let mut filters = range.filters();
        filters.push(ColumnFilter::eq(schedule::Column::UserId, user_id));
        filters.push(ColumnFilter::eq(schedule::Column::ProjectId, project_id));
        self.list(filters).await
    }

    pub async fn delete_all_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        let result = Schedule::delete_many()
            .filter(schedule::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    async fn list(
        &self,
        filters: Vec<ColumnFilter<schedule::Column>>,
    ) -> DaoResult<Vec<schedule::Model>> {
        self.find_iter(None, newest_first(), filters, |query| query)
            .collect_all()
            .await
    }
}

fn newest_first() -> Vec<(schedule::Column, Order)> {
    vec![
        (schedule::Column::Date, Order::Desc),
        (schedule::Column::StartTime, Order::Desc),
    ]
}
