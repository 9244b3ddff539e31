//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match. Ownership checks (a seller acting on *their own* listing) happen in
//! the handlers and the offer engine, not here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use heirloom_core::error::CoreError;
use heirloom_core::roles::{ROLE_BUYER, ROLE_SELLER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then insist on `role`.
async fn authenticate_as(
    parts: &mut Parts,
    state: &AppState,
    role: &'static str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        tracing::debug!(
            user_id = user.user_id,
            role = %user.role,
            required = role,
            "Role check failed"
        );
        return Err(CoreError::Forbidden(format!("{role} role required")).into());
    }
    Ok(user)
}

/// Only buyers place offers.
///
/// ```ignore
/// async fn make_offer(RequireBuyer(user): RequireBuyer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireBuyer(pub AuthUser);

impl FromRequestParts<AppState> for RequireBuyer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate_as(parts, state, ROLE_BUYER).await.map(RequireBuyer)
    }
}

/// Only sellers manage listings and decide offers.
pub struct RequireSeller(pub AuthUser);

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate_as(parts, state, ROLE_SELLER).await.map(RequireSeller)
    }
}

/// Any signed-in user, buyer or seller.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state).await.map(RequireAuth)
    }
}
