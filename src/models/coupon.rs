use crate::entities::{CouponType, coupon_entity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 优惠券
///
/// 有效（valid）的条件:
/// - `is_active` 为 true
/// - `valid_from <= now <= valid_until`（两端都包含）
/// - 未设置 `usage_limit`，或 `used_count < usage_limit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    /// 统一大写存储
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    /// percentage: 百分点; fixed: 金额
    pub value: Decimal,
    pub minimum_order_amount: Decimal,
    /// 仅对 percentage 类型生效
    pub maximum_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// None 表示不限总次数
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    pub per_user_limit: i64,
    pub applicable_categories: Vec<i64>,
    pub applicable_products: Vec<i64>,
    pub excluded_products: Vec<i64>,
    /// 非空时只有列表内的用户可用
    pub applicable_users: Vec<i64>,
    pub is_active: bool,
    pub is_first_time_user: bool,
    pub is_new_user: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// 总使用次数是否已用完
    pub fn is_exhausted(&self) -> bool {
        match self.usage_limit {
            None => false,
            Some(limit) => self.used_count >= limit,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now >= self.valid_from && now <= self.valid_until && !self.is_exhausted()
    }

    /// 用户是否可以使用该券；`user_usage_count` 为该用户此前成功使用的次数
    pub fn can_user_use_at(
        &self,
        user_id: i64,
        user_usage_count: i64,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_valid_at(now) {
            return false;
        }

        if user_usage_count >= self.per_user_limit {
            return false;
        }

        if !self.applicable_users.is_empty() && !self.applicable_users.contains(&user_id) {
            return false;
        }

        true
    }

    /// 是否配置了商品 / 分类范围
    pub fn has_item_scope(&self) -> bool {
        !self.applicable_categories.is_empty()
            || !self.applicable_products.is_empty()
            || !self.excluded_products.is_empty()
    }

    pub fn applies_to_item(&self, item: &LineItem) -> bool {
        if self.excluded_products.contains(&item.product_id) {
            return false;
        }

        if self.applicable_products.is_empty() && self.applicable_categories.is_empty() {
            return true;
        }

        let product_match = self.applicable_products.contains(&item.product_id);
        let category_match = item
            .category_id
            .map(|c| self.applicable_categories.contains(&c))
            .unwrap_or(false);

        product_match || category_match
    }

    pub fn summary(&self) -> CouponSummary {
        CouponSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            coupon_type: self.coupon_type,
            value: self.value,
            description: self.description.clone(),
        }
    }
}

impl From<coupon_entity::Model> for Coupon {
    fn from(m: coupon_entity::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            name: m.name,
            description: m.description,
            coupon_type: m.coupon_type,
            value: m.value,
            minimum_order_amount: m.minimum_order_amount,
            maximum_discount: m.maximum_discount,
            valid_from: m.valid_from,
            valid_until: m.valid_until,
            usage_limit: m.usage_limit,
            used_count: m.used_count,
            per_user_limit: m.per_user_limit,
            applicable_categories: m.applicable_categories.0,
            applicable_products: m.applicable_products.0,
            excluded_products: m.excluded_products.0,
            applicable_users: m.applicable_users.0,
            is_active: m.is_active,
            is_first_time_user: m.is_first_time_user,
            is_new_user: m.is_new_user,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 新建优惠券所需字段（已校验、code 已规范化）
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub coupon_type: CouponType,
    pub value: Decimal,
    pub minimum_order_amount: Decimal,
    pub maximum_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<i64>,
    pub per_user_limit: i64,
    pub applicable_categories: Vec<i64>,
    pub applicable_products: Vec<i64>,
    pub excluded_products: Vec<i64>,
    pub applicable_users: Vec<i64>,
    pub is_active: bool,
    pub is_first_time_user: bool,
    pub is_new_user: bool,
}

/// 订单行（用于按商品 / 分类限定范围的折扣）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// 对外展示的优惠券摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CouponSummary {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: Decimal,
    pub description: Option<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn sample_coupon(now: DateTime<Utc>) -> Coupon {
        Coupon {
            id: 1,
            code: "SAVE10".to_string(),
            name: "Save 10%".to_string(),
            description: None,
            coupon_type: CouponType::Percentage,
            value: Decimal::from(10),
            minimum_order_amount: Decimal::from(20),
            maximum_discount: None,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(7),
            usage_limit: Some(100),
            used_count: 0,
            per_user_limit: 1,
            applicable_categories: vec![],
            applicable_products: vec![],
            excluded_products: vec![],
            applicable_users: vec![],
            is_active: true,
            is_first_time_user: false,
            is_new_user: false,
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
        }
    }

    #[test]
    fn test_validity_window_is_inclusive() {
        let now = Utc::now();
        let coupon = sample_coupon(now);

        assert!(coupon.is_valid_at(coupon.valid_from));
        assert!(coupon.is_valid_at(coupon.valid_until));
        assert!(coupon.is_valid_at(now));
        assert!(!coupon.is_valid_at(coupon.valid_from - Duration::seconds(1)));
        assert!(!coupon.is_valid_at(coupon.valid_until + Duration::seconds(1)));
    }

    #[test]
    fn test_inactive_coupon_is_invalid() {
        let now = Utc::now();
        let mut coupon = sample_coupon(now);
        coupon.is_active = false;
        assert!(!coupon.is_valid_at(now));
    }

    #[test]
    fn test_usage_exhaustion() {
        let now = Utc::now();
        let mut coupon = sample_coupon(now);
        coupon.usage_limit = Some(1);
        coupon.used_count = 1;
        assert!(coupon.is_exhausted());
        assert!(!coupon.is_valid_at(now));

        coupon.usage_limit = None;
        coupon.used_count = 10_000;
        assert!(!coupon.is_exhausted());
        assert!(coupon.is_valid_at(now));
    }

    #[test]
    fn test_per_user_limit() {
        let now = Utc::now();
        let mut coupon = sample_coupon(now);
        coupon.per_user_limit = 2;

        assert!(coupon.can_user_use_at(7, 0, now));
        assert!(coupon.can_user_use_at(7, 1, now));
        assert!(!coupon.can_user_use_at(7, 2, now));
        assert!(!coupon.can_user_use_at(7, 3, now));
    }

    #[test]
    fn test_allow_list() {
        let now = Utc::now();
        let mut coupon = sample_coupon(now);
        coupon.applicable_users = vec![1, 2, 3];

        assert!(coupon.can_user_use_at(2, 0, now));
        assert!(!coupon.can_user_use_at(42, 0, now));
    }

    #[test]
    fn test_item_scope_matching() {
        let now = Utc::now();
        let mut coupon = sample_coupon(now);
        let shoe = LineItem {
            product_id: 10,
            category_id: Some(100),
            price: Decimal::from(50),
            quantity: 2,
        };
        let hat = LineItem {
            product_id: 11,
            category_id: Some(200),
            price: Decimal::from(20),
            quantity: 1,
        };

        assert!(!coupon.has_item_scope());
        assert!(coupon.applies_to_item(&shoe));

        coupon.applicable_categories = vec![100];
        assert!(coupon.has_item_scope());
        assert!(coupon.applies_to_item(&shoe));
        assert!(!coupon.applies_to_item(&hat));

        coupon.applicable_products = vec![11];
        assert!(coupon.applies_to_item(&hat));

        coupon.excluded_products = vec![10];
        assert!(!coupon.applies_to_item(&shoe));
        assert_eq!(shoe.line_total(), Decimal::from(100));
    }
}
