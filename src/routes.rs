use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_auth;
use crate::rest::Reply;
use crate::state::AppState;

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .layer(cors_layer(&config.security.cors_origins));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health::health))
        .route("/v1/auth", post(public::auth::login))
        .route("/v1/auth/forgot", patch(public::auth::forgot_password))
        .route("/v1/accounts/register", post(public::account::register))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{account, attendance, location};

    Router::new()
        .route(
            "/v1/accounts",
            get(account::get).patch(account::update).delete(account::delete),
        )
        .route("/v1/attendance", post(attendance::add))
        .route("/v1/attendance/history", get(attendance::history))
        .route("/v1/attendance/locations", get(attendance::by_location))
        .route(
            "/v1/locations",
            get(location::list)
                .post(location::create)
                .patch(location::update)
                .delete(location::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Empty origin list means any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found(State(state): State<AppState>) -> Reply {
    state.responder.message(StatusCode::NOT_FOUND, &[])
}
