use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ADMIN_ROLE)
}

/// Validate a bearer token and extract the caller.
pub fn authenticate(auth_header: &str, secret: &str) -> Result<AuthUser, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
        .trim();

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        authenticate(auth_str, &state.jwt_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, sub: &str, role: &str) -> String {
        token_expiring(secret, sub, role, chrono::Utc::now().timestamp() + 600)
    }

    fn token_expiring(secret: &str, sub: &str, role: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.into(),
            role: role.into(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("token")
    }

    #[test]
    fn valid_token_yields_user() {
        let id = Uuid::new_v4();
        let header = format!("Bearer {}", token("s3cret", &id.to_string(), "admin"));
        let user = authenticate(&header, "s3cret").expect("authenticated");
        assert_eq!(user.user_id, id);
        assert!(ensure_admin(&user).is_ok());
    }

    #[test]
    fn wrong_secret_or_scheme_is_rejected() {
        let raw = token("s3cret", &Uuid::new_v4().to_string(), "user");
        assert!(authenticate(&format!("Bearer {raw}"), "other").is_err());
        assert!(authenticate(&format!("Basic {raw}"), "s3cret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let raw = token_expiring("s3cret", &Uuid::new_v4().to_string(), "user", exp);
        assert!(matches!(
            authenticate(&format!("Bearer {raw}"), "s3cret"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn non_admin_is_forbidden() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: "user".into(),
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));
    }
}
