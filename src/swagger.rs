use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::CouponType;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::coupon::validate_coupon,
        handlers::coupon::get_available_coupons,
        handlers::admin::create_coupon,
        handlers::admin::list_coupons,
        handlers::admin::get_coupon,
        handlers::admin::update_coupon,
        handlers::admin::delete_coupon,
    ),
    components(
        schemas(
            Coupon,
            CouponType,
            CouponSummary,
            LineItem,
            ValidateCouponRequest,
            CouponQuote,
            AvailableCoupon,
            CreateCouponRequest,
            UpdateCouponRequest,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "coupon", description = "Coupon validation API"),
        (name = "coupon-admin", description = "Coupon management API"),
    ),
    info(
        title = "Storefront Coupons API",
        version = "1.0.0",
        description = "Coupon validation, discount quoting and management"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
