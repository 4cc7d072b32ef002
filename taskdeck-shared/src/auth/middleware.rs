/// Authentication middleware for Axum
///
/// Validates `Authorization: Bearer <token>` headers, resolves the
/// token's subject to a live user row, and adds a [`CurrentUser`] to the
/// request extensions for handlers to extract.
///
/// Loading the user on every request (rather than trusting the claims)
/// means role changes and deletions take effect immediately instead of
/// at token expiry.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(current): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", current.0.name)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// The authenticated user, added to request extensions
///
/// Wraps the full user row minus nothing; the password hash field never
/// serializes, so handlers can echo the inner value back to clients.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Token validation failed
    InvalidToken(String),

    /// Token subject no longer exists
    UnknownUser,

    /// Database error
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AuthError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "Not authorized, no token",
                None,
            ),
            AuthError::InvalidToken(detail) => {
                (StatusCode::UNAUTHORIZED, "Token failed", Some(detail))
            }
            AuthError::UnknownUser => (StatusCode::UNAUTHORIZED, "Token failed", None),
            AuthError::DatabaseError(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error", Some(detail))
            }
        };

        let body = match detail {
            Some(detail) => json!({ "message": message, "error": detail }),
            None => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// JWT authentication middleware
///
/// Returns 401 when the header is missing or malformed, the token fails
/// validation, or the subject user has been deleted.
pub async fn jwt_auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or(AuthError::UnknownUser)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the pool and secret for use with `middleware::from_fn`.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use taskdeck_shared::auth::middleware::create_jwt_middleware;
/// use sqlx::PgPool;
///
/// fn protected(pool: PgPool) -> Router {
///     Router::new()
///         .route("/protected", get(|| async { "OK" }))
///         .layer(middleware::from_fn(create_jwt_middleware(pool, "secret")))
/// }
/// ```
pub fn create_jwt_middleware(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(pool, secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::UnknownUser.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
