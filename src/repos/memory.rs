//! 内存实现（测试与本地调试用）
//!
//! 所有读写都在同一把 `RwLock` 下完成，`try_increment_usage` 的检查与自增
//! 在一次写锁内完成，语义与 SQL 的条件 UPDATE 一致。

use super::{CouponFilter, CouponStore, OrderHistoryQuery, UsageIncrement};
use crate::entities::OrderStatus;
use crate::error::{AppError, AppResult};
use crate::models::{Coupon, NewCoupon};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct CouponTable {
    rows: BTreeMap<i64, Coupon>,
    next_id: i64,
}

impl CouponTable {
    /// 与 code 唯一索引一致
    fn ensure_code_free(&self, code: &str, except_id: Option<i64>) -> AppResult<()> {
        let taken = self
            .rows
            .values()
            .any(|c| c.code == code && Some(c.id) != except_id);
        if taken {
            return Err(AppError::ValidationError(
                "Coupon code already exists".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCouponStore {
    table: RwLock<CouponTable>,
}

impl InMemoryCouponStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入一条完整记录（保留 id 与 used_count），用于准备测试数据
    pub async fn insert(&self, coupon: Coupon) -> Coupon {
        let mut table = self.table.write().await;
        table.next_id = table.next_id.max(coupon.id);
        table.rows.insert(coupon.id, coupon.clone());
        coupon
    }
}

#[async_trait]
impl CouponStore for InMemoryCouponStore {
    async fn find_redeemable(&self, code: &str, now: DateTime<Utc>) -> AppResult<Option<Coupon>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|c| c.code == code && c.is_valid_at(now))
            .cloned())
    }

    async fn list_redeemable(&self, now: DateTime<Utc>) -> AppResult<Vec<Coupon>> {
        let table = self.table.read().await;
        let mut list: Vec<Coupon> = table
            .rows
            .values()
            .filter(|c| c.is_valid_at(now))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.value.cmp(&a.value).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Coupon>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|c| c.code == code).cloned())
    }

    async fn list(
        &self,
        filter: CouponFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Coupon>, u64)> {
        let table = self.table.read().await;
        let mut matched: Vec<&Coupon> = table
            .rows
            .values()
            .filter(|c| filter.is_active.is_none_or(|active| c.is_active == active))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn create(&self, coupon: NewCoupon) -> AppResult<Coupon> {
        let mut table = self.table.write().await;
        table.ensure_code_free(&coupon.code, None)?;
        table.next_id += 1;
        let now = Utc::now();
        let created = Coupon {
            id: table.next_id,
            code: coupon.code,
            name: coupon.name,
            description: coupon.description,
            coupon_type: coupon.coupon_type,
            value: coupon.value,
            minimum_order_amount: coupon.minimum_order_amount,
            maximum_discount: coupon.maximum_discount,
            valid_from: coupon.valid_from,
            valid_until: coupon.valid_until,
            usage_limit: coupon.usage_limit,
            used_count: 0,
            per_user_limit: coupon.per_user_limit,
            applicable_categories: coupon.applicable_categories,
            applicable_products: coupon.applicable_products,
            excluded_products: coupon.excluded_products,
            applicable_users: coupon.applicable_users,
            is_active: coupon.is_active,
            is_first_time_user: coupon.is_first_time_user,
            is_new_user: coupon.is_new_user,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, coupon: &Coupon) -> AppResult<Option<Coupon>> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&coupon.id) {
            return Ok(None);
        }
        table.ensure_code_free(&coupon.code, Some(coupon.id))?;
        let Some(existing) = table.rows.get_mut(&coupon.id) else {
            return Ok(None);
        };

        let used_count = existing.used_count;
        let created_at = existing.created_at;
        *existing = Coupon {
            used_count,
            created_at,
            updated_at: Utc::now(),
            ..coupon.clone()
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn try_increment_usage(&self, id: i64) -> AppResult<UsageIncrement> {
        let mut table = self.table.write().await;
        let Some(coupon) = table.rows.get_mut(&id) else {
            return Ok(UsageIncrement::Missing);
        };

        if coupon.is_exhausted() {
            return Ok(UsageIncrement::LimitReached);
        }

        coupon.used_count += 1;
        coupon.updated_at = Utc::now();
        Ok(UsageIncrement::Incremented)
    }
}

#[derive(Debug, Clone)]
struct OrderRow {
    user_id: i64,
    coupon_id: Option<i64>,
    status: OrderStatus,
}

/// 内存订单记录，只保存统计优惠券使用次数需要的字段
#[derive(Default)]
pub struct InMemoryOrderHistory {
    orders: RwLock<Vec<OrderRow>>,
}

impl InMemoryOrderHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_order(&self, user_id: i64, coupon_id: Option<i64>, status: OrderStatus) {
        self.orders.write().await.push(OrderRow {
            user_id,
            coupon_id,
            status,
        });
    }
}

#[async_trait]
impl OrderHistoryQuery for InMemoryOrderHistory {
    async fn count_coupon_usage(&self, user_id: i64, coupon_id: i64) -> AppResult<i64> {
        let orders = self.orders.read().await;
        let count = orders
            .iter()
            .filter(|o| {
                o.user_id == user_id
                    && o.coupon_id == Some(coupon_id)
                    && o.status.counts_as_redemption()
            })
            .count();
        Ok(count as i64)
    }
}
