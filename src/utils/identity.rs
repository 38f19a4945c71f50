use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::data::models::UserId;
use crate::features::training::TrainingError;

/// Header carrying the caller id, set by the authentication gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    fn from_parts(parts: &Parts) -> Option<Self> {
        let raw = parts.headers.get(USER_ID_HEADER)?.to_str().ok()?;

        match raw.trim().parse::<UserId>() {
            Ok(user_id) if user_id > 0 => Some(CurrentUser(user_id)),
            _ => {
                log::warn!("Rejecting malformed {} header: {:?}", USER_ID_HEADER, raw);
                None
            }
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = TrainingError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        CurrentUser::from_parts(parts).ok_or(TrainingError::Unauthenticated)
    }
}
