use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;
    const ENTITY_NAME: &'static str = "User";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = normalize_email(email);
        self.find(1, 1, Vec::new(), move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Oldest account first; used by tooling that needs "some" user.
    pub async fn find_first(&self) -> DaoResult<Option<user::Model>> {
        self.find(
            1,
            1,
            vec![(user::Column::CreatedAt, sea_orm::Order::Asc)],
            |query| query,
        )
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        email_verified: bool,
        image: Option<String>,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(name.trim().to_string()),
            email: Set(normalize_email(email)),
            email_verified: Set(email_verified),
            image: Set(image),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        image: Option<String>,
    ) -> DaoResult<user::Model> {
        self.update(id, move |active| {
            if let Some(name) = name {
                active.name = Set(name);
            }
            if let Some(image) = image {
                active.image = Set(Some(image));
            }
        })
        .await
    }

    pub async fn mark_email_verified(&self, id: Uuid) -> DaoResult<user::Model> {
        self.update(id, |active| {
            active.email_verified = Set(true);
        })
        .await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
