use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;
const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn issue_token(user_id: Uuid, role: &str, secret: &str) -> AppResult<(String, DateTime<Utc>)> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, expiration))
}

fn validate_registration(payload: &RegisterRequest) -> AppResult<()> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    validate_registration(&payload)?;
    let RegisterRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let password_hash = hash_password(&password)?;

    let user: User = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(password_hash)
    .fetch_one(&state.pool)
    .await?;

    audit::record(
        &state.pool,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success("User created", user, None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let (token, expires_at) = issue_token(user.id, &user.role, &state.jwt_secret)?;
    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        expires_at,
    };

    audit::record(
        &state.pool,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        resp,
        Some(Meta::empty()),
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    match found {
        Some(u) => Ok(ApiResponse::success("Profile", u, None)),
        None => Err(AppError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::authenticate;

    #[test]
    fn issued_token_authenticates() {
        let id = Uuid::new_v4();
        let (token, expires_at) = issue_token(id, "user", "secret").expect("token");
        assert!(expires_at > Utc::now());
        let user = authenticate(&format!("Bearer {token}"), "secret").expect("valid");
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, "user");
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").expect("hash");
        let parsed = PasswordHash::new(&hash).expect("parse");
        assert!(Argon2::default().verify_password(b"correct horse", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn registration_rules() {
        let bad_email = RegisterRequest {
            email: "nope".into(),
            password: "longenough".into(),
        };
        assert!(validate_registration(&bad_email).is_err());
        let short = RegisterRequest {
            email: "a@b.c".into(),
            password: "short".into(),
        };
        assert!(validate_registration(&short).is_err());
        let ok = RegisterRequest {
            email: "a@b.c".into(),
            password: "longenough".into(),
        };
        assert!(validate_registration(&ok).is_ok());
    }
}
