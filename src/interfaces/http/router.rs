//! HTTP router: screens, back-office API, media, health and metrics

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::middleware::{require_staff, session_middleware};
use super::modules::admin::{mccs, nodes, substations, users};
use super::modules::health::health_check;
use super::modules::locator;
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::auth;
use super::openapi::{openapi_json, OPENAPI_PATH};
use super::state::AppState;

pub const ADMIN_API_PREFIX: &str = "/admin/api/v1";

const DEFAULT_MEDIA_MOUNT: &str = "/media";

fn screen_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(locator::home))
        .route("/substation/{id}/", get(locator::substation_detail))
        .route("/mcc/{slug}/", get(locator::mcc_detail))
        .route("/node/{slug}/", get(locator::node_detail))
        .route(
            "/add_node/",
            get(locator::add_node_page)
                .post(locator::add_node_submit)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/edit/{slug}/",
            get(locator::edit_node_page)
                .post(locator::edit_node_submit)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/search/", get(locator::search_nodes))
        .route(
            "/node/{slug}/delete/",
            get(locator::delete_node_page).post(locator::delete_node_submit),
        )
        .route("/node_delete_confirm/", get(locator::node_delete_confirm))
        .route("/login/", get(locator::login_form).post(locator::login_submit))
        .route("/logout/", any(locator::logout))
}

fn admin_routes(max_upload_bytes: usize) -> Router<AppState> {
    let guarded = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/substations",
            get(substations::list_substations).post(substations::create_substation),
        )
        .route(
            "/substations/{id}",
            get(substations::get_substation)
                .put(substations::update_substation)
                .delete(substations::delete_substation),
        )
        .route("/mccs", get(mccs::list_mccs).post(mccs::create_mcc))
        .route(
            "/mccs/{id}",
            get(mccs::get_mcc).put(mccs::update_mcc).delete(mccs::delete_mcc),
        )
        .route("/nodes", get(nodes::list_nodes).post(nodes::create_node))
        .route(
            "/nodes/{slug}",
            get(nodes::get_node)
                .put(nodes::update_node)
                .delete(nodes::delete_node),
        )
        .route(
            "/nodes/{slug}/label",
            post(nodes::upload_label)
                .delete(nodes::clear_label)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}/permissions", put(users::set_permissions))
        .route_layer(middleware::from_fn(require_staff));

    guarded.route("/auth/login", post(auth::login))
}

fn media_mount(url_prefix: &str) -> String {
    let trimmed = url_prefix.trim_matches('/');
    if trimmed.is_empty() || trimmed.contains("://") {
        DEFAULT_MEDIA_MOUNT.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Build the application router. `/metrics` is mounted only when a
/// Prometheus recorder is installed.
pub fn create_router(state: AppState, metrics: Option<MetricsState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = ServeDir::new(state.media.root());
    let mount = media_mount(state.media.url_prefix());
    let max_upload_bytes = state.settings.max_upload_bytes;

    let mut app = Router::new()
        .merge(screen_routes(max_upload_bytes))
        .nest(ADMIN_API_PREFIX, admin_routes(max_upload_bytes))
        .route(OPENAPI_PATH, get(openapi_json))
        .route("/health", get(health_check))
        .nest_service(&mount, media)
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .with_state(state);

    if let Some(metrics) = metrics {
        app = app.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(metrics),
        );
    }

    app.layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_mount_paths() {
        assert_eq!(media_mount("/media/"), "/media");
        assert_eq!(media_mount("/uploads"), "/uploads");
        assert_eq!(media_mount("/"), "/media");
    }
}
