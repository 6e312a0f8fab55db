use sea_orm::{EntityTrait, IntoActiveModel};
use uuid::Uuid;

use crate::db::dao::{DaoBase, DaoLayerError, HasOwnerColumn};
use crate::error::AppError;

type CrudEntity<D> = <D as DaoBase>::Entity;
type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;
type CrudActiveModel<D> = <CrudEntity<D> as EntityTrait>::ActiveModel;

#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            not_found: "Resource not found",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Clone, Copy)]
pub enum CrudOp {
    Create,
    Find,
    Update,
    Delete,
}

/// Single-row operations shared by the domain services, with DAO errors
/// turned into client-facing messages.
#[async_trait::async_trait]
pub trait CrudService {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::Db(db_err) => {
                let context = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                let message = format!("{context}. Please check the logs for more details");
                AppError::internal_with_source(message, db_err)
            }
            DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
        }
    }

    async fn create<T>(&self, data: T) -> Result<CrudModel<Self::Dao>, AppError>
    where
        T: IntoActiveModel<CrudActiveModel<Self::Dao>> + Send,
    {
        self.dao()
            .create(data)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<CrudModel<Self::Dao>, AppError>
    where
        F: for<'a> FnOnce(&'a mut CrudActiveModel<Self::Dao>) + Send,
    {
        self.dao()
            .update(id, apply)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError>
    where
        CrudEntity<Self::Dao>: HasOwnerColumn,
    {
        self.dao()
            .find_owned(owner_id, id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn update_owned<F>(
        &self,
        owner_id: Uuid,
        id: Uuid,
        apply: F,
    ) -> Result<CrudModel<Self::Dao>, AppError>
    where
        CrudEntity<Self::Dao>: HasOwnerColumn,
        F: for<'a> FnOnce(&'a mut CrudActiveModel<Self::Dao>) + Send,
    {
        self.dao()
            .update_owned(owner_id, id, apply)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        CrudEntity<Self::Dao>: HasOwnerColumn,
    {
        self.dao()
            .delete_owned(owner_id, id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::{CrudErrors, CrudOp, CrudService};
    use crate::{
        db::dao::{DaoBase, DaoLayerError, ProjectDao},
        error::AppError,
    };

    struct SampleService {
        dao: ProjectDao,
    }

    impl CrudService for SampleService {
        type Dao = ProjectDao;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn errors(&self) -> CrudErrors {
            CrudErrors {
                not_found: "Sample not found",
                ..CrudErrors::default()
            }
        }
    }

    fn service() -> SampleService {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        SampleService {
            dao: ProjectDao::new(&db),
        }
    }

    #[test]
    fn not_found_uses_service_message() {
        let err = service().map_error(
            CrudOp::Find,
            DaoLayerError::NotFound {
                entity: "Project",
                id: Uuid::nil(),
            },
        );
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Sample not found"));
    }

    #[test]
    fn db_errors_become_internal_with_operation_context() {
        let err = service().map_error(
            CrudOp::Update,
            DaoLayerError::Db(DbErr::Custom("deadlock detected".to_string())),
        );
        assert_eq!(
            err.message(),
            "Update failed. Please check the logs for more details"
        );
    }
}
