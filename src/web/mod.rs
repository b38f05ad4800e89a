//! Web layer - HTTP routes, shared state and error mapping.
//!
//! This is thin glue between HTTP and [`crate::core`]: handlers extract form
//! fields and the session, call one core operation and render the result. All
//! business rules live in the core modules.

/// Route handlers (catalog, auth, cart, checkout, returns)
pub mod handlers;
/// Shared page chrome and HTML helpers
pub mod pages;
/// Cookie-based session resolution
pub mod session;

use crate::{config::settings::Settings, errors::Error};
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state available to all handlers.
///
/// The connection is held behind an [`Arc`] because `DatabaseConnection` is
/// not `Clone` when sea-orm's `mock` feature is enabled (as it is in tests).
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all operations
    pub db: Arc<DatabaseConnection>,
    /// Shop settings and user-facing message strings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates the shared handler state.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Settings) -> Self {
        Self {
            db: Arc::new(db),
            settings: Arc::new(settings),
        }
    }
}

/// Builds the storefront router with all routes wired to handlers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::catalog::home))
        .route("/product_detail/:slug", get(handlers::catalog::detail))
        .route(
            "/product_detail/:slug/edit",
            get(handlers::catalog::edit_form).post(handlers::catalog::edit),
        )
        .route(
            "/add_product.html",
            get(handlers::catalog::add_form).post(handlers::catalog::add),
        )
        .route(
            "/signup.html",
            get(handlers::auth::signup_form).post(handlers::auth::signup),
        )
        .route(
            "/signin.html",
            get(handlers::auth::signin_form).post(handlers::auth::signin),
        )
        .route("/logout.html", post(handlers::auth::logout))
        .route("/add_cart/:slug", post(handlers::cart::add))
        .route("/remove_cart/:item_id", post(handlers::cart::remove))
        .route("/cart.html", get(handlers::cart::view))
        .route("/buy", post(handlers::checkout::buy))
        .route("/purchase.html", get(handlers::checkout::history))
        .route("/returns.html", get(handlers::returns::pending))
        .route("/return/:purchase_pk", post(handlers::returns::request))
        .route("/notice_return/:return_pk", post(handlers::returns::approve))
        .route("/vitality_return/:return_pk", post(handlers::returns::reject))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for Error {
    /// Maps domain errors to plain-text HTTP responses.
    ///
    /// Domain failures are terminal for the request and rendered directly;
    /// infrastructure failures are logged and hidden behind a generic 500.
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Error::InsufficientStock { .. } | Error::ReturnAlreadyRequested { .. } => {
                StatusCode::CONFLICT
            }
            Error::ReturnWindowExpired { .. } => StatusCode::GONE,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::ProductNotFound { .. }
            | Error::PurchaseNotFound { .. }
            | Error::ReturnNotFound { .. }
            | Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidQuantity { .. }
            | Error::InvalidAmount { .. }
            | Error::Config { .. } => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Io(_) | Error::EnvVar(_) => {
                tracing::error!(error = %self, "request failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
                    .into_response();
            }
        };
        (status, self.to_string()).into_response()
    }
}
