use crate::entities::CouponType;
use crate::error::{AppError, AppResult};
use crate::models::{Coupon, LineItem};
use crate::repos::{CouponStore, UsageIncrement};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

/// `record_redemption` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
    Recorded,
    /// 券存在但已达到总次数上限
    LimitReached,
}

/// 规范化优惠码: 去掉首尾空白并转为大写
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// 优惠券资格判断与折扣计算
///
/// `can_redeem` / `calculate_discount` 为纯计算；`find_redeemable` 与
/// `record_redemption` 委托给存储层。
#[derive(Clone)]
pub struct CouponEvaluator {
    store: Arc<dyn CouponStore>,
    item_scoped_discounts: bool,
}

impl CouponEvaluator {
    pub fn new(store: Arc<dyn CouponStore>, item_scoped_discounts: bool) -> Self {
        Self {
            store,
            item_scoped_discounts,
        }
    }

    /// 查找在 `now` 时刻可兑换的券。不存在、未启用、不在有效期、已用完都返回 None。
    pub async fn find_redeemable(
        &self,
        code: &str,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Coupon>> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(None);
        }

        let coupon = self.store.find_redeemable(&code, now).await?;
        log::debug!(
            "Coupon lookup for user {user_id}: code={code} found={}",
            coupon.is_some()
        );
        Ok(coupon.filter(|c| c.is_valid_at(now)))
    }

    pub fn can_redeem(&self, coupon: &Coupon, user_id: i64, user_prior_usage: i64) -> bool {
        self.can_redeem_at(coupon, user_id, user_prior_usage, Utc::now())
    }

    pub fn can_redeem_at(
        &self,
        coupon: &Coupon,
        user_id: i64,
        user_prior_usage: i64,
        now: DateTime<Utc>,
    ) -> bool {
        coupon.can_user_use_at(user_id, user_prior_usage, now)
    }

    pub fn calculate_discount(
        &self,
        coupon: &Coupon,
        order_amount: Decimal,
        line_items: &[LineItem],
    ) -> Decimal {
        self.calculate_discount_at(coupon, order_amount, line_items, Utc::now())
    }

    /// 折扣计算:
    /// 1. 券无效 -> 0
    /// 2. 订单金额低于最低消费 -> 0
    /// 3. percentage: 金额 * value / 100，设置了 maximum_discount 时封顶；
    ///    fixed: value；free_shipping: 0（运费减免由运费计算单独处理）
    /// 4. 结果不超过订单金额，保留两位小数
    pub fn calculate_discount_at(
        &self,
        coupon: &Coupon,
        order_amount: Decimal,
        line_items: &[LineItem],
        now: DateTime<Utc>,
    ) -> Decimal {
        if !coupon.is_valid_at(now) {
            return Decimal::ZERO;
        }

        if order_amount < coupon.minimum_order_amount {
            return Decimal::ZERO;
        }

        let base = self.discountable_amount(coupon, order_amount, line_items);

        let discount = match coupon.coupon_type {
            CouponType::Percentage => base * coupon.value / Decimal::ONE_HUNDRED,
            CouponType::Fixed => coupon.value,
            CouponType::FreeShipping => Decimal::ZERO,
        };

        // 先取整再封顶，保证折扣不超过上限与订单金额
        let mut discount =
            discount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if coupon.coupon_type == CouponType::Percentage
            && let Some(cap) = coupon.maximum_discount
        {
            discount = discount.min(cap);
        }

        discount.min(base).min(order_amount).max(Decimal::ZERO)
    }

    /// 参与折扣计算的金额。开启按商品范围折扣且券配置了范围时，只统计命中的订单行。
    fn discountable_amount(
        &self,
        coupon: &Coupon,
        order_amount: Decimal,
        line_items: &[LineItem],
    ) -> Decimal {
        if !self.item_scoped_discounts || line_items.is_empty() || !coupon.has_item_scope() {
            return order_amount;
        }

        line_items
            .iter()
            .filter(|item| coupon.applies_to_item(item))
            .map(LineItem::line_total)
            .sum()
    }

    /// 原子地将 used_count + 1；券已被删除时返回 NotFound
    pub async fn record_redemption(&self, coupon_id: i64) -> AppResult<RedemptionOutcome> {
        match self.store.try_increment_usage(coupon_id).await? {
            UsageIncrement::Incremented => Ok(RedemptionOutcome::Recorded),
            UsageIncrement::LimitReached => Ok(RedemptionOutcome::LimitReached),
            UsageIncrement::Missing => Err(AppError::NotFound(format!(
                "Coupon {coupon_id} not found"
            ))),
        }
    }
}
