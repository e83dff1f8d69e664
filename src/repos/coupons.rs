use super::{CouponFilter, CouponStore, UsageIncrement};
use crate::entities::{IdList, coupon_entity as coupons};
use crate::error::{AppError, AppResult};
use crate::models::{Coupon, NewCoupon};
use async_trait::async_trait;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

pub struct SeaOrmCouponStore {
    pool: Arc<DatabaseConnection>,
}

impl SeaOrmCouponStore {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }
}

/// usage_limit IS NULL OR used_count < usage_limit
fn usage_available() -> Condition {
    Condition::any()
        .add(coupons::Column::UsageLimit.is_null())
        .add(Expr::col(coupons::Column::UsedCount).lt(Expr::col(coupons::Column::UsageLimit)))
}

fn redeemable_at(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(coupons::Column::IsActive.eq(true))
        .add(coupons::Column::ValidFrom.lte(now))
        .add(coupons::Column::ValidUntil.gte(now))
        .add(usage_available())
}

/// code 唯一索引冲突（并发创建 / 改名）按校验错误返回
fn map_code_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::ValidationError("Coupon code already exists".to_string())
        }
        _ => err.into(),
    }
}

#[async_trait]
impl CouponStore for SeaOrmCouponStore {
    async fn find_redeemable(&self, code: &str, now: DateTime<Utc>) -> AppResult<Option<Coupon>> {
        let model = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code))
            .filter(redeemable_at(now))
            .one(self.pool.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_redeemable(&self, now: DateTime<Utc>) -> AppResult<Vec<Coupon>> {
        let list = coupons::Entity::find()
            .filter(redeemable_at(now))
            .order_by_desc(coupons::Column::Value)
            .order_by_asc(coupons::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Coupon>> {
        let model = coupons::Entity::find_by_id(id).one(self.pool.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        let model = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code))
            .one(self.pool.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(
        &self,
        filter: CouponFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Coupon>, u64)> {
        let mut query = coupons::Entity::find();
        if let Some(active) = filter.is_active {
            query = query.filter(coupons::Column::IsActive.eq(active));
        }

        let total = query.clone().count(self.pool.as_ref()).await?;

        let items = query
            .order_by_desc(coupons::Column::CreatedAt)
            .order_by_desc(coupons::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.pool.as_ref())
            .await?;

        Ok((items.into_iter().map(Into::into).collect(), total))
    }

    async fn create(&self, coupon: NewCoupon) -> AppResult<Coupon> {
        let now = Utc::now();
        let model = coupons::ActiveModel {
            code: Set(coupon.code),
            name: Set(coupon.name),
            description: Set(coupon.description),
            coupon_type: Set(coupon.coupon_type),
            value: Set(coupon.value),
            minimum_order_amount: Set(coupon.minimum_order_amount),
            maximum_discount: Set(coupon.maximum_discount),
            valid_from: Set(coupon.valid_from),
            valid_until: Set(coupon.valid_until),
            usage_limit: Set(coupon.usage_limit),
            used_count: Set(0),
            per_user_limit: Set(coupon.per_user_limit),
            applicable_categories: Set(IdList(coupon.applicable_categories)),
            applicable_products: Set(IdList(coupon.applicable_products)),
            excluded_products: Set(IdList(coupon.excluded_products)),
            applicable_users: Set(IdList(coupon.applicable_users)),
            is_active: Set(coupon.is_active),
            is_first_time_user: Set(coupon.is_first_time_user),
            is_new_user: Set(coupon.is_new_user),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await
        .map_err(map_code_conflict)?;

        Ok(model.into())
    }

    async fn update(&self, coupon: &Coupon) -> AppResult<Option<Coupon>> {
        let Some(existing) = coupons::Entity::find_by_id(coupon.id).one(self.pool.as_ref()).await? else {
            return Ok(None);
        };

        // used_count 保持 Unchanged，不会覆盖并发的自增
        let mut am = existing.into_active_model();
        am.code = Set(coupon.code.clone());
        am.name = Set(coupon.name.clone());
        am.description = Set(coupon.description.clone());
        am.coupon_type = Set(coupon.coupon_type);
        am.value = Set(coupon.value);
        am.minimum_order_amount = Set(coupon.minimum_order_amount);
        am.maximum_discount = Set(coupon.maximum_discount);
        am.valid_from = Set(coupon.valid_from);
        am.valid_until = Set(coupon.valid_until);
        am.usage_limit = Set(coupon.usage_limit);
        am.per_user_limit = Set(coupon.per_user_limit);
        am.applicable_categories = Set(IdList(coupon.applicable_categories.clone()));
        am.applicable_products = Set(IdList(coupon.applicable_products.clone()));
        am.excluded_products = Set(IdList(coupon.excluded_products.clone()));
        am.applicable_users = Set(IdList(coupon.applicable_users.clone()));
        am.is_active = Set(coupon.is_active);
        am.is_first_time_user = Set(coupon.is_first_time_user);
        am.is_new_user = Set(coupon.is_new_user);
        am.updated_at = Set(Utc::now());

        match am.update(self.pool.as_ref()).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(map_code_conflict(e)),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = coupons::Entity::delete_by_id(id).exec(self.pool.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }

    async fn try_increment_usage(&self, id: i64) -> AppResult<UsageIncrement> {
        // 单条 UPDATE ... WHERE 完成检查与自增，避免读后写的竞争窗口
        let result = coupons::Entity::update_many()
            .col_expr(
                coupons::Column::UsedCount,
                Expr::col(coupons::Column::UsedCount).add(1),
            )
            .col_expr(coupons::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(coupons::Column::Id.eq(id))
            .filter(usage_available())
            .exec(self.pool.as_ref())
            .await?;

        if result.rows_affected == 1 {
            return Ok(UsageIncrement::Incremented);
        }

        let exists = coupons::Entity::find_by_id(id).one(self.pool.as_ref()).await?.is_some();
        if exists {
            Ok(UsageIncrement::LimitReached)
        } else {
            Ok(UsageIncrement::Missing)
        }
    }
}
