//! HTTP handlers module
//!
//! Contains the route table and all HTTP endpoint handling logic

pub mod convert;
pub mod responder;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::services::{CurrencyConverter, HttpRateProvider, RateProvider};
use anyhow::Result;
use axum::{
    handler::Handler,
    middleware,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub converter: CurrencyConverter,
}

impl AppState {
    /// Build state around any rate provider
    pub fn new(settings: Settings, provider: Arc<dyn RateProvider>) -> Self {
        Self {
            settings,
            converter: CurrencyConverter::new(provider),
        }
    }
}

/// One entry of the route table
pub struct Route {
    pub name: &'static str,
    pub method: MethodFilter,
    pub path: &'static str,
    handler: MethodRouter<Arc<AppState>>,
}

impl Route {
    fn new<H, T>(name: &'static str, method: MethodFilter, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, Arc<AppState>>,
        T: 'static,
    {
        Self {
            name,
            method,
            path,
            handler: on(method, handler),
        }
    }
}

/// The route table, built once at startup
pub fn routes() -> Vec<Route> {
    vec![Route::new(
        "convert",
        MethodFilter::GET,
        "/convert",
        convert::convert_currency,
    )]
}

/// Create application router talking to the configured rate provider
pub async fn create_router(settings: Settings) -> Result<Router> {
    let provider = HttpRateProvider::new(&settings.rates)?;
    let state = Arc::new(AppState::new(settings, Arc::new(provider)));

    Ok(build_router(state))
}

/// Register the route table on a router with the middleware stack
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();
    for route in routes() {
        debug!("Registering route {} {:?} {}", route.name, route.method, route.path);
        router = router.route(route.path, route.handler);
    }

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_logging_middleware,
        ));

    router.layer(middleware_stack).with_state(state)
}
