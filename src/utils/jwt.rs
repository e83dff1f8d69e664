use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// 本地签发令牌的默认有效期（秒）
const DEFAULT_ACCESS_EXPIRES_IN: i64 = 7200;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    #[serde(default = "default_role")]
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String, // "access"
}

fn default_role() -> String {
    ROLE_CUSTOMER.to_string()
}

impl Claims {
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid user ID in token".to_string()))
    }
}

/// 令牌由账户服务签发，这里只负责校验（签发仅用于测试与本地调试）
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: DEFAULT_ACCESS_EXPIRES_IN,
        }
    }

    /// 调整本地签发令牌的有效期，只影响 `generate_access_token`
    pub fn with_access_expires_in(mut self, seconds: i64) -> Self {
        self.access_token_expires_in = seconds;
        self
    }

    pub fn generate_access_token(&self, user_id: i64, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: "access".to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip_keeps_role() {
        let jwt = JwtService::new("test-secret");
        let token = jwt.generate_access_token(42, ROLE_ADMIN).unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, ROLE_ADMIN);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("secret-a");
        let verifier = JwtService::new("secret-b");
        let token = issuer.generate_access_token(1, ROLE_CUSTOMER).unwrap();

        assert!(matches!(
            verifier.verify_access_token(&token),
            Err(AppError::JwtError(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // 超出默认 60 秒 leeway
        let jwt = JwtService::new("test-secret").with_access_expires_in(-120);
        let token = jwt.generate_access_token(1, ROLE_CUSTOMER).unwrap();
        assert!(jwt.verify_access_token(&token).is_err());
    }
}
