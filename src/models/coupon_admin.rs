use crate::entities::CouponType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_true() -> bool {
    true
}

fn default_per_user_limit() -> i64 {
    1
}

/// 创建优惠券（管理员）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: Decimal,
    #[serde(default)]
    pub minimum_order_amount: Decimal,
    #[serde(default)]
    pub maximum_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub usage_limit: Option<i64>,
    #[serde(default = "default_per_user_limit")]
    pub per_user_limit: i64,
    #[serde(default)]
    pub applicable_categories: Vec<i64>,
    #[serde(default)]
    pub applicable_products: Vec<i64>,
    #[serde(default)]
    pub excluded_products: Vec<i64>,
    #[serde(default)]
    pub applicable_users: Vec<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_first_time_user: bool,
    #[serde(default)]
    pub is_new_user: bool,
}

/// 更新优惠券（管理员，部分更新）
///
/// 可空字段使用 `Option<Option<T>>`: 缺省表示不修改，显式 `null` 表示清空。
/// `usedCount` 不可通过此接口修改。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub coupon_type: Option<CouponType>,
    pub value: Option<Decimal>,
    pub minimum_order_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub maximum_discount: Option<Option<Decimal>>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub usage_limit: Option<Option<i64>>,
    pub per_user_limit: Option<i64>,
    pub applicable_categories: Option<Vec<i64>>,
    pub applicable_products: Option<Vec<i64>>,
    pub excluded_products: Option<Vec<i64>>,
    pub applicable_users: Option<Vec<i64>>,
    pub is_active: Option<bool>,
    pub is_first_time_user: Option<bool>,
    pub is_new_user: Option<bool>,
}

/// 区分 "字段缺省" 与 "字段为 null"
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 管理员查询优惠券列表
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// active / inactive
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateCouponRequest = serde_json::from_value(serde_json::json!({
            "code": "save10",
            "name": "Save 10",
            "type": "percentage",
            "value": 10,
            "validFrom": "2026-01-01T00:00:00Z",
            "validUntil": "2026-02-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(req.coupon_type, CouponType::Percentage);
        assert_eq!(req.per_user_limit, 1);
        assert!(req.is_active);
        assert_eq!(req.minimum_order_amount, Decimal::ZERO);
        assert!(req.usage_limit.is_none());
        assert!(req.applicable_users.is_empty());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_missing() {
        let req: UpdateCouponRequest = serde_json::from_value(serde_json::json!({
            "usageLimit": null,
            "maximumDiscount": 15
        }))
        .unwrap();

        assert_eq!(req.usage_limit, Some(None));
        assert_eq!(req.maximum_discount, Some(Some(Decimal::from(15))));
        assert_eq!(req.description, None);
        assert!(req.code.is_none());
    }
}
