use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_current_account::get_current_account;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::signup::signup;
use super::handlers::update_current_account::update_current_account;
use super::middleware::authenticate;
use super::middleware::require_authentication;
use crate::account::gate::AuthenticationGate;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;
use crate::account::ports::IdentityResolver;
use crate::account::service::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub identity_resolver: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Wire the account service and the authentication gate over one store.
    pub fn from_store<S>(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self
    where
        S: CredentialStore,
    {
        Self {
            account_service: Arc::new(AccountService::new(store.clone(), authenticator.clone())),
            identity_resolver: Arc::new(AuthenticationGate::new(store, authenticator)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route(
            "/users/me",
            get(get_current_account).put(update_current_account),
        )
        .route_layer(middleware::from_fn(require_authentication));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(state.clone(), authenticate)),
        )
        .with_state(state)
}
