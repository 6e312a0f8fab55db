use chrono::NaiveDate;
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::dao::{ProjectDao, ScheduleDao, ScheduleRange, project_dao::NewProject},
    db::entities::{project, schedule},
    error::AppError,
    ledger::{self, Period, RateCard, Shift, Totals},
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
}

/// `Some("")` clears an optional text field; `hourly_rate: Some(None)`
/// clears the project rate.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: project::Model,
    pub totals: Totals,
    pub schedules: Vec<schedule::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHours {
    pub id: Uuid,
    pub name: String,
    pub total_hours: f64,
    pub entry_count: u64,
}

#[derive(Clone)]
pub struct ProjectService {
    project_dao: ProjectDao,
    schedule_dao: ScheduleDao,
}

impl ProjectService {
    pub fn new(project_dao: ProjectDao, schedule_dao: ScheduleDao) -> Self {
        Self {
            project_dao,
            schedule_dao,
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<project::Model>, AppError> {
        Ok(self.project_dao.list_for_user(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<project::Model, AppError> {
        CrudService::find_owned(self, user_id, id).await
    }

    pub async fn detail(&self, user_id: Uuid, id: Uuid) -> Result<ProjectDetail, AppError> {
        let project = self.get(user_id, id).await?;
        let schedules = self
            .schedule_dao
            .list_for_project(user_id, id, ScheduleRange::all())
            .await?;
        let shifts: Vec<Shift> = schedules.iter().map(Shift::from).collect();
        let totals = ledger::totals(&shifts, ledger::DateRange::unbounded());
        Ok(ProjectDetail {
            project,
            totals,
            schedules,
        })
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        input: ProjectInput,
    ) -> Result<project::Model, AppError> {
        let name = required_name(&input.name)?;
        let hourly_rate = normalize_rate(input.hourly_rate)?;
        let new = NewProject {
            name,
            company_name: clean_text(input.company_name),
            description: clean_text(input.description),
            hourly_rate,
        };

        self.project_dao
            .create_project(user_id, new)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProjectPatch,
    ) -> Result<project::Model, AppError> {
        let name = patch.name.as_deref().map(required_name).transpose()?;
        let hourly_rate = patch.hourly_rate.map(normalize_rate).transpose()?;
        let company_name = patch.company_name.map(|value| clean_text(Some(value)));
        let description = patch.description.map(|value| clean_text(Some(value)));

        CrudService::update_owned(self, user_id, id, move |active| {
            if let Some(name) = name {
                active.name = Set(name);
            }
            if let Some(company_name) = company_name {
                active.company_name = Set(company_name);
            }
            if let Some(description) = description {
                active.description = Set(description);
            }
            if let Some(hourly_rate) = hourly_rate {
                active.hourly_rate = Set(hourly_rate);
            }
        })
        .await
    }

    /// Schedule rows stay behind with their project unset.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        CrudService::delete_owned(self, user_id, id).await
    }

    pub async fn hours(
        &self,
        user_id: Uuid,
        id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<Totals, AppError> {
        self.get(user_id, id).await?;
        let range = period.range(today)?;
        let schedules = self
            .schedule_dao
            .list_for_project(user_id, id, ScheduleRange::new(range.start, range.end))
            .await?;
        let shifts: Vec<Shift> = schedules.iter().map(Shift::from).collect();
        Ok(ledger::totals(&shifts, range))
    }

    /// All-time hours per project, in project list order.
    pub async fn hours_by_project(&self, user_id: Uuid) -> Result<Vec<ProjectHours>, AppError> {
        let projects = self.list(user_id).await?;
        let schedules = self
            .schedule_dao
            .list_for_user(user_id, ScheduleRange::all())
            .await?;
        let shifts: Vec<Shift> = schedules.iter().map(Shift::from).collect();

        Ok(projects
            .into_iter()
            .map(|project| {
                let own: Vec<Shift> = shifts
                    .iter()
                    .filter(|shift| shift.project_id == Some(project.id))
                    .copied()
                    .collect();
                let totals = ledger::totals(&own, ledger::DateRange::unbounded());
                ProjectHours {
                    id: project.id,
                    name: project.name,
                    total_hours: totals.total_hours,
                    entry_count: totals.entry_count,
                }
            })
            .collect())
    }

    pub async fn rate_card(&self, user_id: Uuid, default_rate: f64) -> Result<RateCard, AppError> {
        let projects = self.list(user_id).await?;
        Ok(projects
            .into_iter()
            .fold(RateCard::new(default_rate), |card, project| {
                card.with_project_rate(project.id, project.hourly_rate)
            }))
    }
}

fn required_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Project name is required"));
    }
    Ok(name.to_string())
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Zero means "no project rate"; negative rates are rejected.
fn normalize_rate(rate: Option<f64>) -> Result<Option<f64>, AppError> {
    match rate {
        Some(rate) if !rate.is_finite() || rate < 0.0 => {
            Err(AppError::bad_request("Hourly rate must be zero or more"))
        }
        Some(rate) if rate == 0.0 => Ok(None),
        other => Ok(other),
    }
}

impl CrudService for ProjectService {
    type Dao = ProjectDao;

    fn dao(&self) -> &Self::Dao {
        &self.project_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Create project failed",
            find_failed: "Project fetch failed",
            not_found: "Project not found",
            update_failed: "Update project failed",
            delete_failed: "Delete project failed",
        }
    }
}
