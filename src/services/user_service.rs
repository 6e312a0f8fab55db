use uuid::Uuid;

use crate::{
    db::dao::UserDao,
    db::entities::user,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn get(&self, id: Uuid) -> Result<user::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    /// Blank values keep what is stored.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<user::Model, AppError> {
        let name = non_blank(name);
        let image = non_blank(image);
        if name.is_none() && image.is_none() {
            return self.get(id).await;
        }

        self.user_dao
            .update_profile(id, name, image)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    /// Sessions, accounts, projects, schedules and settings go with the row.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), AppError> {
        CrudService::delete(self, id).await?;
        tracing::info!(user_id = %id, "user account deleted");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl CrudService for UserService {
    type Dao = UserDao;

    fn dao(&self) -> &Self::Dao {
        &self.user_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "User not found",
            update_failed: "Update user failed",
            delete_failed: "Delete user failed",
            ..CrudErrors::default()
        }
    }
}
