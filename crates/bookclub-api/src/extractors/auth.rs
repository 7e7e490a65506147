//! Authentication extractors
//!
//! Validates the bearer token from the Authorization header and loads the
//! caller's account, so mute and ban state is current for every request.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use bookclub_core::{Actor, AuthenticatedActor};
use chrono::Utc;

use crate::response::ApiError;
use crate::state::AppState;

/// Signed-in caller, required
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedActor);

/// Caller that may be a guest
///
/// A missing header yields `Actor::Guest`; a header carrying a bad token is
/// still rejected.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Actor);

async fn resolve(state: &AppState, token: &str) -> Result<AuthenticatedActor, ApiError> {
    let claims = state.jwt_service().validate_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Invalid access token");
        ApiError::InvalidAuth
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user ID in token");
        ApiError::InvalidAuth
    })?;

    let user = state
        .service_context()
        .user_repo()
        .find_by_id(user_id)
        .await
        .map_err(ApiError::Domain)?
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Token subject has no account");
            ApiError::InvalidAuth
        })?;

    Ok(AuthenticatedActor::from_user(&user, Utc::now()))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let actor = resolve(&app_state, bearer.token()).await?;

        Ok(CurrentUser(actor))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_result =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;

        match auth_result {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                let actor = resolve(&app_state, bearer.token()).await?;
                Ok(MaybeUser(Actor::User(actor)))
            }
            Err(_) => Ok(MaybeUser(Actor::Guest)),
        }
    }
}
