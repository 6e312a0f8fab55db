use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, Order, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::base_traits::{
    HasCreatedAtColumn, HasIdActiveModel, HasOwnerColumn, TimestampedActiveModel,
};
use super::error::{DaoLayerError, DaoResult};

type DaoEntity<D> = <D as DaoBase>::Entity;
type DaoModel<D> = <DaoEntity<D> as EntityTrait>::Model;
type DaoColumn<D> = <DaoEntity<D> as EntityTrait>::Column;
type DaoActiveModel<D> = <DaoEntity<D> as EntityTrait>::ActiveModel;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

#[derive(Debug, Clone)]
pub enum FilterOp {
    Eq(sea_orm::sea_query::Value),
    Compare {
        op: CompareOp,
        value: sea_orm::sea_query::Value,
    },
    Between {
        min: sea_orm::sea_query::Value,
        max: sea_orm::sea_query::Value,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone)]
pub struct ColumnFilter<C> {
    pub column: C,
    pub op: FilterOp,
}

impl<C> ColumnFilter<C> {
    pub fn eq(column: C, value: impl Into<sea_orm::sea_query::Value>) -> Self {
        Self {
            column,
            op: FilterOp::Eq(value.into()),
        }
    }

    pub fn compare(column: C, op: CompareOp, value: impl Into<sea_orm::sea_query::Value>) -> Self {
        Self {
            column,
            op: FilterOp::Compare {
                op,
                value: value.into(),
            },
        }
    }

    pub fn between(
        column: C,
        min: impl Into<sea_orm::sea_query::Value>,
        max: impl Into<sea_orm::sea_query::Value>,
    ) -> Self {
        Self {
            column,
            op: FilterOp::Between {
                min: min.into(),
                max: max.into(),
            },
        }
    }
}

/// Walks a filtered query page by page until the last page is returned.
pub struct DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    dao: D,
    page: u64,
    page_size: u64,
    order: Vec<(DaoColumn<D>, Order)>,
    filters: Vec<ColumnFilter<DaoColumn<D>>>,
    apply: F,
    done: bool,
}

impl<D, F> DaoPager<D, F>
where
    D: DaoBase,
    F: Fn(Select<D::Entity>) -> Select<D::Entity> + Clone + Send,
{
    pub async fn next_page(&mut self) -> DaoResult<Option<PaginatedResponse<DaoModel<D>>>> {
        if self.done {
            return Ok(None);
        }

        let response = self
            .dao
            .find_with_filters(
                self.page,
                self.page_size,
                self.order.clone(),
                &self.filters,
                self.apply.clone(),
            )
            .await?;

        if !response.has_next {
            self.done = true;
        }
        self.page = self.page.saturating_add(1);

        Ok(Some(response))
    }

    pub async fn collect_all(mut self) -> DaoResult<Vec<DaoModel<D>>> {
        let mut rows = Vec::new();
        while let Some(mut response) = self.next_page().await? {
            rows.append(&mut response.data);
        }
        Ok(rows)
    }
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasCreatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;
    const MAX_PAGE_SIZE: u64 = 100;
    /// Human readable name used in not-found errors.
    const ENTITY_NAME: &'static str;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: Uuid) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<DaoActiveModel<Self>> + Send,
    ) -> DaoResult<DaoModel<Self>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<DaoModel<Self>> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or_else(|| Self::not_found(id))
    }

    async fn find(
        &self,
        page: u64,
        page_size: u64,
        order: Vec<(DaoColumn<Self>, Order)>,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<DaoModel<Self>>> {
        self.find_with_filters(page, page_size, order, &[], apply)
            .await
    }

    async fn find_with_filters(
        &self,
        page: u64,
        page_size: u64,
        order: Vec<(DaoColumn<Self>, Order)>,
        filters: &[ColumnFilter<DaoColumn<Self>>],
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<DaoModel<Self>>> {
        if page == 0 || page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { page, page_size });
        }

        let fetch_size = page_size.saturating_add(1);
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let mut data = self
            .select_with_filters(order, filters, apply)
            .limit(fetch_size)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let has_next = data.len() > page_size as usize;
        if has_next {
            data.truncate(page_size as usize);
        }

        Ok(PaginatedResponse {
            data,
            page,
            page_size,
            has_next,
        })
    }

    /// Filtered and ordered select. The id column is always the last sort
    /// key so LIMIT/OFFSET pages never overlap.
    fn select_with_filters(
        &self,
        order: Vec<(DaoColumn<Self>, Order)>,
        filters: &[ColumnFilter<DaoColumn<Self>>],
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity>,
    ) -> Select<Self::Entity> {
        let filtered = apply(Self::Entity::find());
        let filtered = filters.iter().fold(filtered, |select, filter| match &filter.op {
            FilterOp::Eq(value) => select.filter(filter.column.eq(value.clone())),
            FilterOp::Compare { op, value } => {
                let expr = Expr::col(filter.column);
                let value = Expr::val(value.clone());
                let expr = match op {
                    CompareOp::Lt => expr.lt(value),
                    CompareOp::Lte => expr.lte(value),
                    CompareOp::Gt => expr.gt(value),
                    CompareOp::Gte => expr.gte(value),
                };
                select.filter(expr)
            }
            FilterOp::Between { min, max } => select.filter(
                Expr::col(filter.column).between(Expr::val(min.clone()), Expr::val(max.clone())),
            ),
        });

        let ordered = if order.is_empty() {
            filtered.order_by_desc(Self::Entity::created_at_column())
        } else {
            order
                .into_iter()
                .fold(filtered, |select, (column, order)| select.order_by(column, order))
        };
        ordered.order_by_asc(Self::Entity::id_column())
    }

    fn find_iter<F>(
        &self,
        page_size: Option<u64>,
        order: Vec<(DaoColumn<Self>, Order)>,
        filters: Vec<ColumnFilter<DaoColumn<Self>>>,
        apply: F,
    ) -> DaoPager<Self, F>
    where
        F: Fn(Select<Self::Entity>) -> Select<Self::Entity> + Clone + Send,
    {
        DaoPager {
            dao: self.clone(),
            page: 1,
            page_size: page_size.unwrap_or(Self::MAX_PAGE_SIZE),
            order,
            filters,
            apply,
            done: false,
        }
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<DaoModel<Self>>
    where
        F: for<'a> FnOnce(&'a mut DaoActiveModel<Self>) + Send,
    {
        let model = self.find_by_id(id).await?;
        self.save_changes(model, apply).await
    }

    async fn save_changes<F>(&self, model: DaoModel<Self>, apply: F) -> DaoResult<DaoModel<Self>>
    where
        F: for<'a> FnOnce(&'a mut DaoActiveModel<Self>) + Send,
    {
        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(id)
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> DaoResult<DaoModel<Self>>
    where
        Self::Entity: HasOwnerColumn,
    {
        let model = Self::Entity::find_by_id(id)
            .filter(Self::Entity::owner_column().eq(owner_id))
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or_else(|| Self::not_found(id))
    }

    async fn update_owned<F>(&self, owner_id: Uuid, id: Uuid, apply: F) -> DaoResult<DaoModel<Self>>
    where
        Self::Entity: HasOwnerColumn,
        F: for<'a> FnOnce(&'a mut DaoActiveModel<Self>) + Send,
    {
        let model = self.find_owned(owner_id, id).await?;
        self.save_changes(model, apply).await
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> DaoResult<Uuid>
    where
        Self::Entity: HasOwnerColumn,
    {
        let result = Self::Entity::delete_many()
            .filter(Self::Entity::id_column().eq(id))
            .filter(Self::Entity::owner_column().eq(owner_id))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(id)
    }
}
