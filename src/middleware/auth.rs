// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Claims, Solicitante},
};

// O middleware em si: valida o Bearer e guarda as claims na requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let claims = app_state.auth_service.validate_token(bearer.token())?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

// Extrator para obter as claims do usuário autenticado nos handlers
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    /// Identidade usada pela atribuição automática. `None` quando o token
    /// não traz nome ou perfil.
    pub fn solicitante(&self) -> Option<Solicitante> {
        Solicitante::from_claims(&self.0)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
