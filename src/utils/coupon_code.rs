use crate::error::{AppError, AppResult};
use regex::Regex;

/// 校验规范化后的优惠码: 3-32 位大写字母、数字、下划线或连字符
pub fn validate_coupon_code(code: &str) -> AppResult<()> {
    let code_regex = Regex::new(r"^[A-Z0-9_-]{3,32}$")
        .map_err(|e| AppError::InternalError(format!("Invalid coupon code pattern: {e}")))?;

    if !code_regex.is_match(code) {
        return Err(AppError::ValidationError(
            "Coupon code must be 3-32 characters of A-Z, 0-9, '_' or '-'".to_string(),
        ));
    }

    Ok(())
}
