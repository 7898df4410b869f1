use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes())
        .nest("/defects", defect_routes())
        .nest("/members", member_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn defect_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::defect::list_defects).post(handlers::defect::create_defect),
        )
        // Static segment must be registered before the `{id}` capture.
        .route(
            "/notifications/pending",
            get(handlers::notification::pending_notifications),
        )
        .route(
            "/{id}",
            get(handlers::defect::get_defect)
                .patch(handlers::defect::update_defect)
                .delete(handlers::defect::delete_defect),
        )
        .route("/{id}/status", patch(handlers::defect::set_defect_status))
        .route(
            "/{id}/after-photo",
            patch(handlers::defect::attach_after_photo),
        )
        .route(
            "/{id}/mark-notified",
            patch(handlers::notification::mark_notified),
        )
        // Base64 photos blow past the default 2MB body limit.
        .layer(handlers::defect::photo_body_limit())
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::member::list_members),
        )
        .route("/invite", post(handlers::member::invite_member))
        .route("/{id}", delete(handlers::member::remove_member))
}
