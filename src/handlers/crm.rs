// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::crm::{
        AtualizarTarefasPayload, Cliente, CriarClientePayload, DefinirVendedorPayload, ProgressoCliente,
    },
    services::esteira::Etapa,
};

// =============================================================================
//  ÁREA 1: ESTEIRA
// =============================================================================

// GET /api/esteira/etapas
#[utoipa::path(
    get,
    path = "/api/esteira/etapas",
    tag = "Esteira",
    responses(
        (status = 200, description = "Etapas na ordem da esteira", body = Vec<Etapa>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_stages(State(app_state): State<AppState>) -> Json<Vec<Etapa>> {
    Json(app_state.crm_service.esteira().etapas().to_vec())
}

// PUT /api/clientes/{id}/tarefas
#[utoipa::path(
    put,
    path = "/api/clientes/{id}/tarefas",
    tag = "Esteira",
    request_body = AtualizarTarefasPayload,
    responses(
        (status = 200, description = "Cliente com etapa recalculada (e vendedor, se atribuído)", body = Cliente),
        (status = 400, description = "Corpo não é JSON, ou tarefas_concluidas ausente ou não é um objeto"),
        (status = 404, description = "Cliente não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do Cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tasks(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<AtualizarTarefasPayload>, AppError>,
) -> Result<Json<Cliente>, AppError> {
    let solicitante = user.solicitante();

    let cliente = app_state
        .crm_service
        .update_tasks(id, payload.tarefas_concluidas, solicitante.as_ref())
        .await?;

    Ok(Json(cliente))
}

// GET /api/clientes/{id}/progresso
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/progresso",
    tag = "Esteira",
    responses(
        (status = 200, description = "Progresso por etapa", body = ProgressoCliente),
        (status = 404, description = "Cliente não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do Cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_progress(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProgressoCliente>, AppError> {
    let progresso = app_state.crm_service.client_progress(id).await?;
    Ok(Json(progresso))
}

// =============================================================================
//  ÁREA 2: CLIENTES
// =============================================================================

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CriarClientePayload,
    responses(
        (status = 201, description = "Cliente criado na primeira etapa", body = Cliente),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CriarClientePayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state.crm_service.create_client(&payload).await?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Cliente>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(State(app_state): State<AppState>) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = app_state.crm_service.list_clients().await?;
    Ok(Json(clientes))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do Cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = app_state.crm_service.get_client(id).await?;
    Ok(Json(cliente))
}

// PUT /api/clientes/{id}/vendedor
#[utoipa::path(
    put,
    path = "/api/clientes/{id}/vendedor",
    tag = "Clientes",
    request_body = DefinirVendedorPayload,
    responses(
        (status = 200, description = "Vendedor alterado", body = Cliente),
        (status = 404, description = "Cliente ou usuário não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do Cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_salesperson(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): WithRejection<Json<DefinirVendedorPayload>, AppError>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = app_state
        .crm_service
        .set_salesperson(id, payload.vendedor_id)
        .await?;

    Ok(Json(cliente))
}
