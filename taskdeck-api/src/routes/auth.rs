/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration (with optional invite tokens for elevated roles)
/// - Login
/// - Profile read and update
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token
/// - `GET /api/auth/profile` - Current user's profile
/// - `PUT /api/auth/profile` - Update current user's profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, middleware::CurrentUser, password},
    models::user::{CreateUser, Role, UpdateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional profile image URL
    pub profile_image_url: Option<String>,

    /// Invite token for the admin role
    pub admin_invite_token: Option<String>,

    /// Invite token for the manager role (wire name `managerToken`)
    #[serde(rename = "managerToken")]
    pub manager_invite_token: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// User payload plus a fresh bearer token
///
/// The flattened user serializes in camelCase with the password hash
/// omitted, matching what `GET /api/auth/profile` returns.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The user record
    #[serde(flatten)]
    pub user: User,

    /// Signed JWT, valid 7 days
    pub token: String,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// New department
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,

    /// New profile image URL
    pub profile_image_url: Option<String>,
}

/// Resolves the role granted at registration
///
/// The manager token wins when both tokens are submitted and valid.
/// Tokens that don't match (or aren't configured) silently fall through
/// to the member role rather than failing the registration.
fn invited_role(state: &AppState, req: &RegisterRequest) -> Role {
    let invites = &state.config.invites;

    let manager_match = matches!(
        (&req.manager_invite_token, &invites.manager_token),
        (Some(submitted), Some(expected)) if submitted == expected
    );
    if manager_match {
        return Role::Manager;
    }

    let admin_match = matches!(
        (&req.admin_invite_token, &invites.admin_token),
        (Some(submitted), Some(expected)) if submitted == expected
    );
    if admin_match {
        return Role::Admin;
    }

    Role::Member
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "hunter2hunter2",
///   "adminInviteToken": "..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let role = invited_role(&state, &req);
    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role,
            profile_image_url: req.profile_image_url,
        },
    )
    .await?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login with email and password
///
/// Credential failures are indistinguishable on purpose: an unknown
/// email and a wrong password return the same 401.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid email or password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let matches = password::verify_password(&req.password, &user.password_hash)?;
    if !matches {
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(AuthResponse { user, token }))
}

/// Get the authenticated user's profile
pub async fn get_profile(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<User>> {
    Ok(Json(current.0))
}

/// Update the authenticated user's profile
///
/// Only the submitted fields change. A changed password re-hashes; the
/// response carries a fresh token so clients don't wait out the old one.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let password_hash = match req.password {
        Some(ref plaintext) => Some(password::hash_password(plaintext)?),
        None => None,
    };

    let update = UpdateUser {
        name: req.name,
        email: req.email,
        password_hash,
        department: req.department,
        profile_image_url: req.profile_image_url,
        ..UpdateUser::default()
    };

    let user = User::update(&state.db, current.0.id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(AuthResponse { user, token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "longenough"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let bad_email: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "not-an-email",
            "password": "longenough"
        }))
        .unwrap();
        assert!(bad_email.validate().is_err());

        let short_password: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "short"
        }))
        .unwrap();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_register_request_wire_token_names() {
        // The two invite tokens use different wire conventions: admin is
        // camelCase, manager is the bare "managerToken" name.
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "longenough",
            "adminInviteToken": "abc",
            "managerToken": "def"
        }))
        .unwrap();

        assert_eq!(req.admin_invite_token.as_deref(), Some("abc"));
        assert_eq!(req.manager_invite_token.as_deref(), Some("def"));
    }

    fn invite_state(admin: Option<&str>, manager: Option<&str>) -> AppState {
        let config = crate::config::Config {
            api: crate::config::ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: crate::config::DatabaseConfig {
                url: "postgres://localhost/unused".to_string(),
                max_connections: 1,
            },
            jwt: crate::config::JwtConfig {
                secret: "0123456789abcdef0123456789abcdef".to_string(),
            },
            invites: crate::config::InviteConfig {
                admin_token: admin.map(String::from),
                manager_token: manager.map(String::from),
            },
        };
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        AppState::new(pool, config)
    }

    fn register_with_tokens(admin: Option<&str>, manager: Option<&str>) -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "longenough",
            "adminInviteToken": admin,
            "managerToken": manager,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_invited_role_manager_token_grants_manager() {
        let state = invite_state(Some("adm"), Some("mgr"));
        let req = register_with_tokens(None, Some("mgr"));
        assert_eq!(invited_role(&state, &req), Role::Manager);
    }

    #[tokio::test]
    async fn test_invited_role_manager_token_wins_over_admin() {
        let state = invite_state(Some("adm"), Some("mgr"));
        let req = register_with_tokens(Some("adm"), Some("mgr"));
        assert_eq!(invited_role(&state, &req), Role::Manager);
    }

    #[tokio::test]
    async fn test_invited_role_admin_token_grants_admin() {
        let state = invite_state(Some("adm"), Some("mgr"));
        let req = register_with_tokens(Some("adm"), None);
        assert_eq!(invited_role(&state, &req), Role::Admin);
    }

    #[tokio::test]
    async fn test_invited_role_wrong_tokens_fall_back_to_member() {
        let state = invite_state(Some("adm"), Some("mgr"));
        let req = register_with_tokens(Some("nope"), Some("also-nope"));
        assert_eq!(invited_role(&state, &req), Role::Member);
    }

    #[tokio::test]
    async fn test_invited_role_unconfigured_tokens_never_match() {
        let state = invite_state(None, None);
        let req = register_with_tokens(Some(""), Some(""));
        assert_eq!(invited_role(&state, &req), Role::Member);
    }
}
