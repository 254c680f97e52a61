//! Gateway-injected identity header extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// User identity injected by the gateway via the `x-ladle-user-id` header.
///
/// Returns 401 if `x-ladle-user-id` is absent or cannot be parsed as UUID.
/// Object-level permission checks (403) are done by usecases after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-ladle-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id })
        }
    }
}

/// Optional variant of [`IdentityHeaders`] for endpoints that serve anonymous
/// readers too.
///
/// An absent `x-ladle-user-id` header yields `MaybeIdentity(None)`; a header
/// that is present but not a valid UUID is still rejected with 401, so a
/// malformed gateway cannot be mistaken for an anonymous caller.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<IdentityHeaders>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get("x-ladle-user-id")
            .map(|v| v.to_str().ok().map(str::to_owned));

        async move {
            match header {
                None => Ok(Self(None)),
                Some(value) => {
                    let user_id = value
                        .and_then(|s| s.parse::<Uuid>().ok())
                        .ok_or(StatusCode::UNAUTHORIZED)?;
                    Ok(Self(Some(IdentityHeaders { user_id })))
                }
            }
        }
    }
}
