//! 存储层: 优惠券存储与订单使用记录查询
//!
//! 服务层只依赖这里的 trait；sea-orm 实现用于线上，内存实现用于测试与本地调试。

pub mod coupons;
pub mod memory;
pub mod order_history;

pub use coupons::SeaOrmCouponStore;
pub use memory::{InMemoryCouponStore, InMemoryOrderHistory};
pub use order_history::SeaOrmOrderHistory;

use crate::error::AppResult;
use crate::models::{Coupon, NewCoupon};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 原子自增 used_count 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageIncrement {
    /// 自增成功
    Incremented,
    /// 券存在但已达到 usage_limit，未自增
    LimitReached,
    /// 券不存在
    Missing,
}

/// 管理后台列表过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CouponFilter {
    /// Some(true) 只看启用，Some(false) 只看停用
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// 按 code（已规范化为大写）查找在 `now` 时刻有效的券
    async fn find_redeemable(&self, code: &str, now: DateTime<Utc>) -> AppResult<Option<Coupon>>;

    /// 在 `now` 时刻有效的全部券，按 value 降序（相同 value 按 id 升序）
    async fn list_redeemable(&self, now: DateTime<Utc>) -> AppResult<Vec<Coupon>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Coupon>>;

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>>;

    /// 分页列表（按创建时间倒序），返回 (当前页, 总数)
    async fn list(
        &self,
        filter: CouponFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Coupon>, u64)>;

    async fn create(&self, coupon: NewCoupon) -> AppResult<Coupon>;

    /// 写回除 id / used_count / created_at 以外的字段；券不存在时返回 None
    async fn update(&self, coupon: &Coupon) -> AppResult<Option<Coupon>>;

    /// 返回是否删除了记录
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// 原子条件自增: 仅当 usage_limit 未设置或 used_count < usage_limit 时 +1
    async fn try_increment_usage(&self, id: i64) -> AppResult<UsageIncrement>;
}

#[async_trait]
pub trait OrderHistoryQuery: Send + Sync {
    /// 用户使用过该券、且状态为 completed / processing 的订单数
    async fn count_coupon_usage(&self, user_id: i64, coupon_id: i64) -> AppResult<i64>;
}
