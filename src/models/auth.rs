// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Perfil administrativo. Fica fora da lista padrão de atribuição, por isso
/// só os testes o referenciam.
#[cfg(test)]
pub const PERFIL_ADMIN: i32 = 1;
pub const PERFIL_CONSULTOR: i32 = 2;
pub const PERFIL_COMERCIAL: i32 = 3;
pub const PERFIL_EQUIPE_INTERNA: i32 = 4;

// Representa um usuário (vendedor, consultor, admin) vindo do banco
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Usuario {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Ana Souza")]
    pub nome: String,
    #[schema(example = "ana@escola.com.br")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub senha_hash: String,

    #[schema(example = 4)]
    pub perfil_id: i32,

    pub created_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@escola.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT.
// `nome` e `perfil_id` são opcionais para aceitar tokens antigos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub perfil_id: Option<i32>,
    pub exp: usize,
    pub iat: usize,
}

/// Quem está fazendo a requisição, já resolvido a partir do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solicitante {
    pub id: i32,
    pub nome: String,
    pub perfil_id: i32,
}

impl Solicitante {
    /// Só resolve quando o token traz nome e perfil. Sem isso não há como
    /// creditar o cliente a ninguém.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let nome = claims.nome.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        Some(Self {
            id: claims.sub,
            nome: nome.to_string(),
            perfil_id: claims.perfil_id?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(nome: Option<&str>, perfil_id: Option<i32>) -> Claims {
        Claims {
            sub: 10,
            nome: nome.map(str::to_string),
            perfil_id,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn solicitante_requires_name_and_profile() {
        assert_eq!(
            Solicitante::from_claims(&claims(Some("Bruno"), Some(PERFIL_COMERCIAL))),
            Some(Solicitante { id: 10, nome: "Bruno".into(), perfil_id: 3 })
        );
        assert_eq!(Solicitante::from_claims(&claims(None, Some(2))), None);
        assert_eq!(Solicitante::from_claims(&claims(Some("   "), Some(2))), None);
        assert_eq!(Solicitante::from_claims(&claims(Some("Bruno"), None)), None);
    }
}
