// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let esteira_routes = Router::new()
        .route("/etapas", get(handlers::crm::list_stages))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cliente_routes = Router::new()
        .route(
            "/",
            post(handlers::crm::create_client).get(handlers::crm::list_clients),
        )
        .route("/{id}", get(handlers::crm::get_client))
        .route("/{id}/tarefas", put(handlers::crm::update_tasks))
        .route("/{id}/progresso", get(handlers::crm::get_progress))
        .route("/{id}/vendedor", put(handlers::crm::set_salesperson))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .nest("/api/usuarios", user_routes)
        .nest("/api/esteira", esteira_routes)
        .nest("/api/clientes", cliente_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
