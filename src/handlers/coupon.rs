use super::admin;
use crate::error::AppError;
use crate::middlewares::current_user;
use crate::models::*;
use crate::services::CouponService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use rust_decimal::Decimal;

#[utoipa::path(
    post,
    path = "/coupons/validate",
    tag = "coupon",
    request_body = ValidateCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券可用，返回折扣报价", body = CouponQuote),
        (status = 400, description = "COUPON_NOT_USABLE / MINIMUM_NOT_MET / VALIDATION_ERROR"),
        (status = 401, description = "未授权"),
        (status = 404, description = "INVALID_COUPON")
    )
)]
pub async fn validate_coupon(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    request: web::Json<ValidateCouponRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match coupon_service.validate(user.id, request.into_inner()).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/coupons/available",
    tag = "coupon",
    params(
        ("orderAmount" = Option<f64>, Query, description = "订单金额，默认 0")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "可用优惠券列表", body = [AvailableCoupon]),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_available_coupons(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    query: web::Query<AvailableCouponsQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    let order_amount = query.order_amount.unwrap_or(Decimal::ZERO);
    if order_amount < Decimal::ZERO {
        return Ok(
            AppError::ValidationError("Order amount must not be negative".to_string())
                .error_response(),
        );
    }

    match coupon_service.list_available(user.id, order_amount).await {
        Ok(coupons) => Ok(HttpResponse::Ok().json(ApiResponse::success(coupons))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coupon_config(cfg: &mut web::ServiceConfig) {
    // 固定路径需在 "/{id}" 之前注册
    cfg.service(
        web::scope("/coupons")
            .route("/validate", web::post().to(validate_coupon))
            .route("/available", web::get().to(get_available_coupons))
            .route("", web::post().to(admin::create_coupon))
            .route("", web::get().to(admin::list_coupons))
            .route("/{id}", web::get().to(admin::get_coupon))
            .route("/{id}", web::patch().to(admin::update_coupon))
            .route("/{id}", web::delete().to(admin::delete_coupon)),
    );
}
