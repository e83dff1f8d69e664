//! 优惠券管理接口，仅限 admin 角色

use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::CouponService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/coupons",
    tag = "coupon-admin",
    request_body = CreateCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "创建成功", body = Coupon),
        (status = 400, description = "请求参数错误"),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn create_coupon(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    request: web::Json<CreateCouponRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match coupon_service.create_coupon(request.into_inner()).await {
        Ok(coupon) => Ok(HttpResponse::Created().json(ApiResponse::success(coupon))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/coupons",
    tag = "coupon-admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("status" = Option<String>, Query, description = "状态: active/inactive")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券列表"),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn list_coupons(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    query: web::Query<CouponListQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match coupon_service.list_coupons(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/coupons/{id}",
    tag = "coupon-admin",
    params(
        ("id" = i64, Path, description = "优惠券 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券详情", body = Coupon),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "不存在")
    )
)]
pub async fn get_coupon(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match coupon_service.get_coupon(path.into_inner()).await {
        Ok(coupon) => Ok(HttpResponse::Ok().json(ApiResponse::success(coupon))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/coupons/{id}",
    tag = "coupon-admin",
    params(
        ("id" = i64, Path, description = "优惠券 ID")
    ),
    request_body = UpdateCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = Coupon),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "不存在")
    )
)]
pub async fn update_coupon(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateCouponRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    match coupon_service
        .update_coupon(path.into_inner(), request.into_inner())
        .await
    {
        Ok(coupon) => Ok(HttpResponse::Ok().json(ApiResponse::success(coupon))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/coupons/{id}",
    tag = "coupon-admin",
    params(
        ("id" = i64, Path, description = "优惠券 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "不存在")
    )
)]
pub async fn delete_coupon(
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&req) {
        return Ok(e.error_response());
    }

    let id = path.into_inner();
    match coupon_service.delete_coupon(id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": id },
            "message": "Coupon deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
