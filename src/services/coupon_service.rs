use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::repos::{CouponFilter, CouponStore, OrderHistoryQuery};
use crate::services::{CouponEvaluator, RedemptionOutcome, normalize_code};
use crate::utils::validate_coupon_code;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Clone)]
pub struct CouponService {
    evaluator: CouponEvaluator,
    store: Arc<dyn CouponStore>,
    order_history: Arc<dyn OrderHistoryQuery>,
}

impl CouponService {
    pub fn new(
        store: Arc<dyn CouponStore>,
        order_history: Arc<dyn OrderHistoryQuery>,
        item_scoped_discounts: bool,
    ) -> Self {
        Self {
            evaluator: CouponEvaluator::new(store.clone(), item_scoped_discounts),
            store,
            order_history,
        }
    }

    pub fn evaluator(&self) -> &CouponEvaluator {
        &self.evaluator
    }

    /// 校验并报价（只读，不修改任何数据）
    ///
    /// 1. 查找可兑换的券，找不到 -> InvalidCoupon
    /// 2. 查询用户历史使用次数，不可用 -> CouponNotUsable
    /// 3. 计算折扣，折扣为 0 -> MinimumNotMet
    pub async fn validate(
        &self,
        user_id: i64,
        request: ValidateCouponRequest,
    ) -> AppResult<CouponQuote> {
        if request.code.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Coupon code is required".to_string(),
            ));
        }
        if request.order_amount < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Order amount must not be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let coupon = self
            .evaluator
            .find_redeemable(&request.code, user_id, now)
            .await?
            .ok_or(AppError::InvalidCoupon)?;

        let prior_usage = self
            .order_history
            .count_coupon_usage(user_id, coupon.id)
            .await?;

        if !self
            .evaluator
            .can_redeem_at(&coupon, user_id, prior_usage, now)
        {
            return Err(AppError::CouponNotUsable);
        }

        let discount = self.evaluator.calculate_discount_at(
            &coupon,
            request.order_amount,
            &request.items,
            now,
        );

        if discount <= Decimal::ZERO {
            return Err(AppError::MinimumNotMet {
                minimum: coupon.minimum_order_amount,
            });
        }

        Ok(CouponQuote {
            coupon: coupon.summary(),
            discount,
            final_amount: request.order_amount - discount,
        })
    }

    /// 当前用户在给定订单金额下可用的券（按面值降序）
    pub async fn list_available(
        &self,
        user_id: i64,
        order_amount: Decimal,
    ) -> AppResult<Vec<AvailableCoupon>> {
        let now = Utc::now();
        let candidates = self.store.list_redeemable(now).await?;

        let mut available = Vec::new();
        for coupon in candidates {
            if order_amount < coupon.minimum_order_amount {
                continue;
            }

            let user_usage_count = self
                .order_history
                .count_coupon_usage(user_id, coupon.id)
                .await?;

            if !self
                .evaluator
                .can_redeem_at(&coupon, user_id, user_usage_count, now)
            {
                continue;
            }

            let calculated_discount =
                self.evaluator
                    .calculate_discount_at(&coupon, order_amount, &[], now);
            if calculated_discount <= Decimal::ZERO {
                continue;
            }

            available.push(AvailableCoupon {
                coupon,
                user_usage_count,
                calculated_discount,
            });
        }

        Ok(available)
    }

    /// 订单确认后记录券的使用。
    /// 记录失败只写日志，不影响下单；返回是否成功计数。
    pub async fn commit_redemption(&self, coupon_id: i64) -> bool {
        match self.evaluator.record_redemption(coupon_id).await {
            Ok(RedemptionOutcome::Recorded) => {
                log::info!("Coupon {coupon_id} redemption recorded");
                true
            }
            Ok(RedemptionOutcome::LimitReached) => {
                log::warn!("Coupon {coupon_id} usage limit reached, redemption not counted");
                false
            }
            Err(AppError::NotFound(_)) => {
                log::warn!("Coupon {coupon_id} disappeared before redemption was recorded");
                false
            }
            Err(e) => {
                log::error!("Failed to record redemption of coupon {coupon_id}: {e:?}");
                false
            }
        }
    }

    // -----------------------------
    // 管理后台
    // -----------------------------

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> AppResult<Coupon> {
        let code = normalize_code(&request.code);
        validate_coupon_code(&code)?;

        let new_coupon = NewCoupon {
            code,
            name: request.name.trim().to_string(),
            description: request.description,
            coupon_type: request.coupon_type,
            value: request.value,
            minimum_order_amount: request.minimum_order_amount,
            maximum_discount: request.maximum_discount,
            valid_from: request.valid_from,
            valid_until: request.valid_until,
            usage_limit: request.usage_limit,
            per_user_limit: request.per_user_limit,
            applicable_categories: request.applicable_categories,
            applicable_products: request.applicable_products,
            excluded_products: request.excluded_products,
            applicable_users: request.applicable_users,
            is_active: request.is_active,
            is_first_time_user: request.is_first_time_user,
            is_new_user: request.is_new_user,
        };
        validate_rules(&CouponRules::from(&new_coupon))?;

        if self.store.find_by_code(&new_coupon.code).await?.is_some() {
            return Err(AppError::ValidationError(
                "Coupon code already exists".to_string(),
            ));
        }

        let coupon = self.store.create(new_coupon).await?;
        log::info!("Coupon {} created (id={})", coupon.code, coupon.id);
        Ok(coupon)
    }

    pub async fn list_coupons(
        &self,
        query: &CouponListQuery,
    ) -> AppResult<PaginatedResponse<Coupon>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let filter = match query.status.as_deref() {
            Some("active") => CouponFilter {
                is_active: Some(true),
            },
            Some("inactive") => CouponFilter {
                is_active: Some(false),
            },
            _ => CouponFilter::default(),
        };

        let (items, total) = self
            .store
            .list(filter, params.get_offset(), params.get_limit())
            .await?;

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_coupon(&self, id: i64) -> AppResult<Coupon> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coupon not found".to_string()))
    }

    pub async fn update_coupon(
        &self,
        id: i64,
        request: UpdateCouponRequest,
    ) -> AppResult<Coupon> {
        let mut coupon = self.get_coupon(id).await?;

        if let Some(code) = request.code {
            let code = normalize_code(&code);
            validate_coupon_code(&code)?;
            let taken = self.store.find_by_code(&code).await?;
            if taken.is_some_and(|other| other.id != id) {
                return Err(AppError::ValidationError(
                    "Coupon code already exists".to_string(),
                ));
            }
            coupon.code = code;
        }
        if let Some(name) = request.name {
            coupon.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            coupon.description = description;
        }
        if let Some(coupon_type) = request.coupon_type {
            coupon.coupon_type = coupon_type;
        }
        if let Some(value) = request.value {
            coupon.value = value;
        }
        if let Some(minimum) = request.minimum_order_amount {
            coupon.minimum_order_amount = minimum;
        }
        if let Some(maximum) = request.maximum_discount {
            coupon.maximum_discount = maximum;
        }
        if let Some(valid_from) = request.valid_from {
            coupon.valid_from = valid_from;
        }
        if let Some(valid_until) = request.valid_until {
            coupon.valid_until = valid_until;
        }
        if let Some(usage_limit) = request.usage_limit {
            coupon.usage_limit = usage_limit;
        }
        if let Some(per_user_limit) = request.per_user_limit {
            coupon.per_user_limit = per_user_limit;
        }
        if let Some(ids) = request.applicable_categories {
            coupon.applicable_categories = ids;
        }
        if let Some(ids) = request.applicable_products {
            coupon.applicable_products = ids;
        }
        if let Some(ids) = request.excluded_products {
            coupon.excluded_products = ids;
        }
        if let Some(ids) = request.applicable_users {
            coupon.applicable_users = ids;
        }
        if let Some(is_active) = request.is_active {
            coupon.is_active = is_active;
        }
        if let Some(flag) = request.is_first_time_user {
            coupon.is_first_time_user = flag;
        }
        if let Some(flag) = request.is_new_user {
            coupon.is_new_user = flag;
        }

        validate_rules(&CouponRules::from(&coupon))?;

        let updated = self
            .store
            .update(&coupon)
            .await?
            .ok_or_else(|| AppError::NotFound("Coupon not found".to_string()))?;
        log::info!("Coupon {} updated (id={})", updated.code, updated.id);
        Ok(updated)
    }

    pub async fn delete_coupon(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("Coupon not found".to_string()));
        }
        log::info!("Coupon {id} deleted");
        Ok(())
    }
}

/// 创建 / 更新时共用的字段校验视图
struct CouponRules<'a> {
    name: &'a str,
    description: Option<&'a str>,
    coupon_type: crate::entities::CouponType,
    value: Decimal,
    minimum_order_amount: Decimal,
    maximum_discount: Option<Decimal>,
    valid_from: chrono::DateTime<Utc>,
    valid_until: chrono::DateTime<Utc>,
    usage_limit: Option<i64>,
    per_user_limit: i64,
}

impl<'a> From<&'a NewCoupon> for CouponRules<'a> {
    fn from(c: &'a NewCoupon) -> Self {
        Self {
            name: &c.name,
            description: c.description.as_deref(),
            coupon_type: c.coupon_type,
            value: c.value,
            minimum_order_amount: c.minimum_order_amount,
            maximum_discount: c.maximum_discount,
            valid_from: c.valid_from,
            valid_until: c.valid_until,
            usage_limit: c.usage_limit,
            per_user_limit: c.per_user_limit,
        }
    }
}

impl<'a> From<&'a Coupon> for CouponRules<'a> {
    fn from(c: &'a Coupon) -> Self {
        Self {
            name: &c.name,
            description: c.description.as_deref(),
            coupon_type: c.coupon_type,
            value: c.value,
            minimum_order_amount: c.minimum_order_amount,
            maximum_discount: c.maximum_discount,
            valid_from: c.valid_from,
            valid_until: c.valid_until,
            usage_limit: c.usage_limit,
            per_user_limit: c.per_user_limit,
        }
    }
}

fn validate_rules(rules: &CouponRules<'_>) -> AppResult<()> {
    let invalid = |msg: &str| Err(AppError::ValidationError(msg.to_string()));

    if rules.name.is_empty() || rules.name.chars().count() > MAX_NAME_LEN {
        return invalid("Coupon name must be between 1 and 100 characters");
    }
    if rules
        .description
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return invalid("Coupon description must be at most 500 characters");
    }
    if rules.valid_from >= rules.valid_until {
        return invalid("Valid until date must be after valid from date");
    }
    if rules.value < Decimal::ZERO {
        return invalid("Coupon value must not be negative");
    }
    if rules.coupon_type == crate::entities::CouponType::Percentage
        && rules.value > Decimal::ONE_HUNDRED
    {
        return invalid("Percentage value must not exceed 100");
    }
    if rules.minimum_order_amount < Decimal::ZERO {
        return invalid("Minimum order amount must not be negative");
    }
    if rules.maximum_discount.is_some_and(|m| m < Decimal::ZERO) {
        return invalid("Maximum discount must not be negative");
    }
    // 金额列为 decimal(12,2)
    let amounts = [
        Some(rules.value),
        Some(rules.minimum_order_amount),
        rules.maximum_discount,
    ];
    if amounts
        .into_iter()
        .flatten()
        .any(|amount| amount.normalize().scale() > 2)
    {
        return invalid("Amounts must have at most 2 decimal places");
    }
    if rules.usage_limit.is_some_and(|l| l < 0) {
        return invalid("Usage limit must not be negative");
    }
    if rules.per_user_limit < 1 {
        return invalid("Per user limit must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CouponType, OrderStatus};
    use crate::models::coupon::tests::sample_coupon;
    use crate::repos::{InMemoryCouponStore, InMemoryOrderHistory};
    use chrono::Duration;

    struct Fixture {
        store: Arc<InMemoryCouponStore>,
        history: Arc<InMemoryOrderHistory>,
        service: CouponService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryCouponStore::new());
        let history = Arc::new(InMemoryOrderHistory::new());
        let service = CouponService::new(store.clone(), history.clone(), false);
        Fixture {
            store,
            history,
            service,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn validate_request(code: &str, amount: &str) -> ValidateCouponRequest {
        ValidateCouponRequest {
            code: code.to_string(),
            order_amount: dec(amount),
            items: vec![],
        }
    }

    fn create_request(code: &str) -> CreateCouponRequest {
        let now = Utc::now();
        CreateCouponRequest {
            code: code.to_string(),
            name: "Spring sale".to_string(),
            description: Some("10% off".to_string()),
            coupon_type: CouponType::Percentage,
            value: dec("10"),
            minimum_order_amount: dec("20"),
            maximum_discount: None,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(7),
            usage_limit: Some(100),
            per_user_limit: 1,
            applicable_categories: vec![],
            applicable_products: vec![],
            excluded_products: vec![],
            applicable_users: vec![],
            is_active: true,
            is_first_time_user: false,
            is_new_user: false,
        }
    }

    #[tokio::test]
    async fn test_save10_end_to_end_quote() {
        let f = fixture();
        f.store.insert(sample_coupon(Utc::now())).await;

        let quote = f
            .service
            .validate(42, validate_request("save10", "200"))
            .await
            .unwrap();

        assert_eq!(quote.coupon.code, "SAVE10");
        assert_eq!(quote.coupon.coupon_type, CouponType::Percentage);
        assert_eq!(quote.discount, dec("20"));
        assert_eq!(quote.final_amount, dec("180"));
    }

    #[tokio::test]
    async fn test_validate_is_read_only_and_repeatable() {
        let f = fixture();
        f.store.insert(sample_coupon(Utc::now())).await;

        let first = f
            .service
            .validate(42, validate_request("SAVE10", "200"))
            .await
            .unwrap();
        let second = f
            .service
            .validate(42, validate_request("SAVE10", "200"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(f.store.find_by_id(1).await.unwrap().unwrap().used_count, 0);
    }

    #[tokio::test]
    async fn test_validate_error_kinds() {
        let f = fixture();
        let now = Utc::now();
        f.store.insert(sample_coupon(now)).await;

        let mut expired = sample_coupon(now);
        expired.id = 2;
        expired.code = "OLD".to_string();
        expired.valid_until = now - Duration::hours(1);
        expired.valid_from = now - Duration::days(3);
        f.store.insert(expired).await;

        assert!(matches!(
            f.service.validate(1, validate_request("", "200")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            f.service.validate(1, validate_request("NOPE", "200")).await,
            Err(AppError::InvalidCoupon)
        ));
        assert!(matches!(
            f.service.validate(1, validate_request("OLD", "200")).await,
            Err(AppError::InvalidCoupon)
        ));
        match f.service.validate(1, validate_request("SAVE10", "19.99")).await {
            Err(AppError::MinimumNotMet { minimum }) => assert_eq!(minimum, dec("20")),
            other => panic!("unexpected result: {other:?}"),
        }

        f.history
            .record_order(1, Some(1), OrderStatus::Completed)
            .await;
        assert!(matches!(
            f.service.validate(1, validate_request("SAVE10", "200")).await,
            Err(AppError::CouponNotUsable)
        ));
        // 已取消订单不计入使用次数
        f.history
            .record_order(2, Some(1), OrderStatus::Cancelled)
            .await;
        assert!(f.service.validate(2, validate_request("SAVE10", "200")).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_user_outside_allow_list() {
        let f = fixture();
        let mut coupon = sample_coupon(Utc::now());
        coupon.applicable_users = vec![7];
        f.store.insert(coupon).await;

        assert!(matches!(
            f.service.validate(8, validate_request("SAVE10", "200")).await,
            Err(AppError::CouponNotUsable)
        ));
        assert!(f.service.validate(7, validate_request("SAVE10", "200")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_available_filters_and_annotates() {
        let f = fixture();
        let now = Utc::now();

        let mut big = sample_coupon(now);
        big.id = 1;
        big.code = "BIG".to_string();
        big.coupon_type = CouponType::Fixed;
        big.value = dec("50");
        big.minimum_order_amount = dec("300");
        f.store.insert(big).await;

        let mut fixed = sample_coupon(now);
        fixed.id = 2;
        fixed.code = "FIVE".to_string();
        fixed.coupon_type = CouponType::Fixed;
        fixed.value = dec("5");
        fixed.minimum_order_amount = Decimal::ZERO;
        fixed.per_user_limit = 3;
        f.store.insert(fixed).await;

        let mut pct = sample_coupon(now);
        pct.id = 3;
        pct.code = "PCT".to_string();
        f.store.insert(pct).await;

        let mut shipping = sample_coupon(now);
        shipping.id = 4;
        shipping.code = "SHIP".to_string();
        shipping.coupon_type = CouponType::FreeShipping;
        shipping.value = dec("99");
        f.store.insert(shipping).await;

        let mut used_up = sample_coupon(now);
        used_up.id = 5;
        used_up.code = "USED".to_string();
        used_up.value = dec("30");
        f.store.insert(used_up).await;
        f.history
            .record_order(9, Some(5), OrderStatus::Completed)
            .await;
        f.history
            .record_order(9, Some(2), OrderStatus::Processing)
            .await;

        let list = f.service.list_available(9, dec("100")).await.unwrap();
        let codes: Vec<&str> = list.iter().map(|a| a.coupon.code.as_str()).collect();
        assert_eq!(codes, vec!["PCT", "FIVE"]);

        assert_eq!(list[0].calculated_discount, dec("10"));
        assert_eq!(list[0].user_usage_count, 0);
        assert_eq!(list[1].calculated_discount, dec("5"));
        assert_eq!(list[1].user_usage_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_redemptions_never_exceed_usage_limit() {
        let f = fixture();
        let mut coupon = sample_coupon(Utc::now());
        coupon.usage_limit = Some(5);
        coupon.used_count = 2;
        f.store.insert(coupon).await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = f.service.clone();
            handles.push(tokio::spawn(async move {
                service.evaluator().record_redemption(1).await
            }));
        }

        let mut recorded = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == RedemptionOutcome::Recorded {
                recorded += 1;
            }
        }

        assert_eq!(recorded, 3);
        assert_eq!(f.store.find_by_id(1).await.unwrap().unwrap().used_count, 5);
    }

    #[tokio::test]
    async fn test_commit_redemption_swallows_failures() {
        let f = fixture();
        let mut coupon = sample_coupon(Utc::now());
        coupon.usage_limit = Some(1);
        f.store.insert(coupon).await;

        assert!(f.service.commit_redemption(1).await);
        assert!(!f.service.commit_redemption(1).await);
        assert!(!f.service.commit_redemption(404).await);
    }

    #[tokio::test]
    async fn test_create_coupon_normalizes_and_rejects_duplicates() {
        let f = fixture();

        let created = f
            .service
            .create_coupon(create_request(" spring10 "))
            .await
            .unwrap();
        assert_eq!(created.code, "SPRING10");
        assert_eq!(created.used_count, 0);

        let err = f
            .service
            .create_coupon(create_request("Spring10"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("already exists")));
    }

    #[tokio::test]
    async fn test_create_coupon_validates_fields() {
        let f = fixture();

        let mut bad_dates = create_request("DATES");
        bad_dates.valid_until = bad_dates.valid_from;
        assert!(f.service.create_coupon(bad_dates).await.is_err());

        let mut negative = create_request("NEG");
        negative.value = dec("-1");
        assert!(f.service.create_coupon(negative).await.is_err());

        let mut too_much = create_request("PCT200");
        too_much.value = dec("200");
        assert!(f.service.create_coupon(too_much).await.is_err());

        let mut zero_per_user = create_request("ZERO");
        zero_per_user.per_user_limit = 0;
        assert!(f.service.create_coupon(zero_per_user).await.is_err());

        let mut long_name = create_request("LONG");
        long_name.name = "x".repeat(101);
        assert!(f.service.create_coupon(long_name).await.is_err());

        assert!(f.service.create_coupon(create_request("a b")).await.is_err());
    }

    #[tokio::test]
    async fn test_amounts_with_more_than_two_decimals_are_rejected() {
        let f = fixture();

        let mut value = create_request("SCALE1");
        value.coupon_type = CouponType::Fixed;
        value.value = dec("12.345");
        assert!(matches!(
            f.service.create_coupon(value).await,
            Err(AppError::ValidationError(_))
        ));

        let mut minimum = create_request("SCALE2");
        minimum.minimum_order_amount = dec("20.001");
        assert!(f.service.create_coupon(minimum).await.is_err());

        let mut cap = create_request("SCALE3");
        cap.maximum_discount = Some(dec("5.555"));
        assert!(f.service.create_coupon(cap).await.is_err());

        // 末尾的 0 不算精度
        let mut padded = create_request("SCALE4");
        padded.value = dec("12.500");
        assert!(f.service.create_coupon(padded).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_with_same_code_report_duplicate() {
        let f = fixture();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = f.service.clone();
            handles.push(tokio::spawn(async move {
                service.create_coupon(create_request("RACE")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::ValidationError(msg)) => assert!(msg.contains("already exists")),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_update_coupon_merges_and_validates() {
        let f = fixture();
        let created = f
            .service
            .create_coupon(create_request("SPRING10"))
            .await
            .unwrap();
        f.service
            .create_coupon(create_request("OTHER"))
            .await
            .unwrap();

        let updated = f
            .service
            .update_coupon(
                created.id,
                UpdateCouponRequest {
                    name: Some("Renamed".to_string()),
                    usage_limit: Some(None),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(updated.usage_limit.is_none());
        assert!(!updated.is_active);
        assert_eq!(updated.code, "SPRING10");

        // 只修改一端日期时也要校验先后顺序
        let err = f
            .service
            .update_coupon(
                created.id,
                UpdateCouponRequest {
                    valid_until: Some(created.valid_from - Duration::days(1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(err, Err(AppError::ValidationError(_))));

        let err = f
            .service
            .update_coupon(
                created.id,
                UpdateCouponRequest {
                    code: Some("other".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(err, Err(AppError::ValidationError(_))));

        let err = f
            .service
            .update_coupon(999, UpdateCouponRequest::default())
            .await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_and_delete_coupons() {
        let f = fixture();
        f.service
            .create_coupon(create_request("ONE"))
            .await
            .unwrap();
        let mut inactive = create_request("TWO");
        inactive.is_active = false;
        let two = f.service.create_coupon(inactive).await.unwrap();

        let all = f
            .service
            .list_coupons(&CouponListQuery {
                page: None,
                per_page: None,
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let active = f
            .service
            .list_coupons(&CouponListQuery {
                page: Some(1),
                per_page: Some(10),
                status: Some("active".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(active.total, 1);
        assert_eq!(active.data[0].code, "ONE");

        f.service.delete_coupon(two.id).await.unwrap();
        assert!(matches!(
            f.service.delete_coupon(two.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.get_coupon(two.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
