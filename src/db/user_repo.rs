use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::auth::Usuario};

#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError>;
}

// O repositório de usuários, responsável pelas leituras na tabela 'usuarios'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepository for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }
}
