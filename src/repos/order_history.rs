use super::OrderHistoryQuery;
use crate::entities::{OrderStatus, order_entity as orders};
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// 通过订单表统计用户对某张券的使用次数
pub struct SeaOrmOrderHistory {
    pool: Arc<DatabaseConnection>,
}

impl SeaOrmOrderHistory {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderHistoryQuery for SeaOrmOrderHistory {
    async fn count_coupon_usage(&self, user_id: i64, coupon_id: i64) -> AppResult<i64> {
        let count = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::CouponId.eq(coupon_id))
            .filter(
                orders::Column::Status.is_in([OrderStatus::Completed, OrderStatus::Processing]),
            )
            .count(self.pool.as_ref())
            .await?;
        Ok(count as i64)
    }
}
