use sea_orm::{DatabaseConnection, Order, Set};
use uuid::Uuid;

use super::{ColumnFilter, DaoBase, DaoResult};
use crate::db::entities::{prelude::Project, project};

#[derive(Clone)]
pub struct ProjectDao {
    db: DatabaseConnection,
}

impl DaoBase for ProjectDao {
    type Entity = Project;
    const ENTITY_NAME: &'static str = "Project";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
}

impl ProjectDao {
    pub async fn create_project(&self, user_id: Uuid, new: NewProject) -> DaoResult<project::Model> {
        let model = project::ActiveModel {
            user_id: Set(user_id),
            name: Set(new.name),
            company_name: Set(new.company_name),
            description: Set(new.description),
            hourly_rate: Set(new.hourly_rate),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> DaoResult<Vec<project::Model>> {
        self.find_iter(
            None,
            vec![
                (project::Column::Name, Order::Asc),
                (project::Column::CreatedAt, Order::Asc),
            ],
            vec![ColumnFilter::eq(project::Column::UserId, user_id)],
            |query| query,
        )
        .collect_all()
        .await
    }
}
