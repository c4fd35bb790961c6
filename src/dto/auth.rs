use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Emails are trimmed and lowercased before storage.
#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "shopper@example.com")]
    pub email: String,
    /// At least 8 characters.
    #[schema(example = "correct horse")]
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "shopper@example.com")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
}
