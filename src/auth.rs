use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::{NewUser, Role, User, UserRecord},
    password,
    repository::RepositoryState,
};

/// Claims
///
/// Payload of the session tokens this server issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Role at issue time. Informational only; access checks re-read the user.
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// issue_token
///
/// Signs an HS256 session token for `user`, valid for `jwt_expire_days`.
pub fn issue_token(user: &User, config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let exp = now.saturating_add(config.jwt_expire_days.saturating_mul(24 * 60 * 60));
    let claims = Claims {
        sub: user.id,
        role: user.role,
        iat: usize::try_from(now).unwrap_or_default(),
        exp: usize::try_from(exp).unwrap_or_default(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// Validates signature and expiry and returns the claims.
pub fn verify_token(token: &str, config: &AppConfig) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("rejected bearer token: {e}");
        ApiError::unauthorized()
    })
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Using it as a handler
/// argument makes the route require a valid bearer token for an existing user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub user: User,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// AuthUser extractor
///
/// 1. Local bypass: with `AUTH_HEADER_BYPASS=true` in `Env::Local`, an
///    `x-user-id` header naming an existing user authenticates as that user.
/// 2. `Authorization: Bearer <jwt>` is verified (signature and `exp`).
/// 3. The user is re-read from the repository so deleted accounts and role
///    changes take effect immediately.
///
/// Rejects with 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.allows_header_bypass() {
            let bypass_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id| Uuid::parse_str(id).ok());
            if let Some(user_id) = bypass_id {
                if let Some(record) = repo.find_user(user_id).await? {
                    return Ok(AuthUser::from(record.user));
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(ApiError::unauthorized)?;

        let claims = verify_token(token, &config)?;

        let record = repo
            .find_user(claims.sub)
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(AuthUser::from(record.user))
    }
}

/// Optional identity: absent or invalid credentials yield `None` instead of a 401.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(<AuthUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .ok())
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        AuthUser {
            id: user.id,
            role: user.role,
            user,
        }
    }
}

/// AdminUser
///
/// An `AuthUser` whose role is admin. Authenticated non-admins get 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden(format!(
                "User role {} is not authorized to access this route",
                user.role
            )));
        }
        Ok(AdminUser(user))
    }
}

/// Hashes the password of a validated account and stores it.
pub async fn create_account(repo: &RepositoryState, new_user: NewUser) -> Result<User, ApiError> {
    if repo.find_user_by_email(&new_user.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists with this email".to_string()));
    }
    let record = UserRecord {
        user: User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            role: new_user.role,
            standard: new_user.standard,
            medium: new_user.medium,
            created_at: Utc::now(),
        },
        password_hash: password::hash_password(&new_user.password)?,
        reset_password_token: None,
        reset_password_expire: None,
    };
    Ok(repo.create_user(record).await?.user)
}

/// seed_admin
///
/// Creates the configured administrator account on startup if it is missing.
pub async fn seed_admin(repo: &RepositoryState, config: &AppConfig) -> Result<(), ApiError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    if repo.find_user_by_email(email).await?.is_some() {
        tracing::debug!(%email, "admin account already present");
        return Ok(());
    }
    let admin = NewUser {
        name: "Administrator".to_string(),
        email: email.clone(),
        password: password.clone(),
        phone: None,
        role: Role::Admin,
        standard: None,
        medium: None,
    };
    create_account(repo, admin).await?;
    tracing::info!(%email, "seeded admin account");
    Ok(())
}
