//! Authentication and authorization middleware.
//!
//! `require_auth` verifies the bearer credential and attaches a
//! [`CurrentUser`] to the request. `require_admin` additionally resolves the
//! caller's admin flag from the role store. Neither middleware mutates any
//! state beyond the lookup.

pub mod password;
mod token;

pub use token::{Claims, TokenError, TokenService};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::AppState;

/// The authenticated principal making a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
        }
    }
}

/// Middleware: reject requests without a valid bearer token.
///
/// On success the verified [`CurrentUser`] is inserted into the request
/// extensions for downstream handlers and middleware.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = header_value
        .and_then(TokenService::extract_from_header)
        .ok_or_else(|| AppError::Unauthenticated("No token provided".to_string()))?;

    let claims = state.tokens.validate(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        AppError::Unauthenticated("Invalid token".to_string())
    })?;

    req.extensions_mut().insert(CurrentUser::from(claims));
    Ok(next.run(req).await)
}

/// Middleware: reject authenticated callers whose role record is missing or
/// not flagged as admin.
///
/// The flag is always looked up in the role store rather than read from a
/// token claim, so promotions and demotions apply to tokens already issued.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthenticated("No token provided".to_string()))?;

    let account = state.repo.get_admin(&user.uid).await?;
    match account {
        Some(account) if account.is_admin => Ok(next.run(req).await),
        _ => {
            tracing::warn!(uid = %user.uid, "Admin access denied");
            Err(AppError::Forbidden("Admins only".to_string()))
        }
    }
}
