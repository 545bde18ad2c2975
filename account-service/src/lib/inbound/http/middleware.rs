use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::account::identity::AuthenticatedIdentity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication gate, applied to every route.
///
/// Attaches an [`AuthenticatedIdentity`] to the request extensions when the
/// `Authorization` header carries a bearer token that resolves to an account.
/// Never rejects: an unusable token leaves the request anonymous and route
/// policy decides what happens next.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthenticatedIdentity>().is_none() {
        if let Some(token) = bearer_token(&req) {
            if let Some(identity) = state.identity_resolver.resolve(&token).await {
                tracing::debug!(email = %identity.email(), "Request authenticated");
                req.extensions_mut().insert(identity);
            }
        }
    }

    next.run(req).await
}

/// Route policy for protected routes: no identity, no entry.
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<AuthenticatedIdentity>().is_none() {
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(req).await)
}

/// Raw token from an `Authorization: Bearer <token>` header.
///
/// Headers that are missing, not visible ASCII, or use another scheme yield `None`.
fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::to_owned)
}

/// Extractor for the identity the gate attached to this request.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(ApiError::unauthorized)
    }
}
