//! Bearer-token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::db::Database;
use crate::models::User;

/// The authenticated caller, attached to the request by [`require_auth`]
/// and read by handlers as an extension.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user: User,
    /// Fingerprint of the presented token, kept so logout can revoke it.
    pub token_fingerprint: String,
}

/// Resolve the `Authorization: Bearer` token to a user or reject with 401.
pub async fn require_auth(
    State(db): State<Database>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        Some(_) => {
            tracing::warn!("Invalid Authorization header format");
            return Err(unauthorized());
        }
        None => {
            return Err(unauthorized());
        }
    };

    let fingerprint = auth::token_fingerprint(token);
    let user = db.user_for_token(&fingerprint).map_err(|e| {
        tracing::error!("Token lookup failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })?;

    match user {
        Some(user) => {
            request.extensions_mut().insert(AuthSession {
                user,
                token_fingerprint: fingerprint,
            });
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!("Unknown or revoked session token");
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}
