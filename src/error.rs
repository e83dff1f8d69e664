use crate::models::ApiResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rust_decimal::Decimal;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 不存在 / 未启用 / 不在有效期 / 已用完，对客户端不做区分
    #[error("Invalid or expired coupon code")]
    InvalidCoupon,

    /// 券本身有效，但当前用户不可用（次数已满或不在指定用户内）
    #[error("You cannot use this coupon")]
    CouponNotUsable,

    #[error("Minimum order amount of ${minimum} required for this coupon")]
    MinimumNotMet { minimum: Decimal },

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                "AUTH_ERROR",
                "Invalid access token".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InvalidCoupon => (StatusCode::NOT_FOUND, "INVALID_COUPON", self.to_string()),
            AppError::CouponNotUsable => {
                (StatusCode::BAD_REQUEST, "COUPON_NOT_USABLE", self.to_string())
            }
            AppError::MinimumNotMet { .. } => {
                (StatusCode::BAD_REQUEST, "MINIMUM_NOT_MET", self.to_string())
            }
            AppError::PermissionDenied => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Permission denied".to_string())
            }
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        if status_code.is_server_error() {
            log::error!("{error_code}: {self}");
        } else {
            log::warn!("{error_code}: {self}");
        }

        HttpResponse::build(status_code).json(ApiResponse::error(error_code, &message))
    }
}
