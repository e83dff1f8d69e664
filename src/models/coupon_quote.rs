use super::{Coupon, CouponSummary, LineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 校验优惠券请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    #[serde(default)]
    pub code: String,
    pub order_amount: Decimal,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// 校验优惠券结果（报价）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuote {
    pub coupon: CouponSummary,
    pub discount: Decimal,
    pub final_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCouponsQuery {
    /// 订单金额（默认 0）
    pub order_amount: Option<Decimal>,
}

/// 当前用户可用的优惠券
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCoupon {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub user_usage_count: i64,
    pub calculated_discount: Decimal,
}
