// src/db/crm_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::crm::{AtualizacaoTarefas, Cliente, CriarClientePayload, Vendedor},
};

/// Acesso à tabela `clientes`. Os métodos que alteram uma linha retornam
/// `Ok(None)` quando o id não existe.
#[async_trait]
pub trait ClienteRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, AppError>;

    async fn list(&self) -> Result<Vec<Cliente>, AppError>;

    async fn create(&self, payload: &CriarClientePayload, status_inicial: &str) -> Result<Cliente, AppError>;

    /// Grava mapa de tarefas, status e (talvez) vendedor numa única instrução.
    async fn update_tasks(
        &self,
        id: i32,
        atualizacao: &AtualizacaoTarefas,
    ) -> Result<Option<Cliente>, AppError>;

    /// Troca explícita de vendedor. `None` limpa as duas colunas.
    async fn set_salesperson(&self, id: i32, vendedor: Option<&Vendedor>) -> Result<Option<Cliente>, AppError>;
}

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClienteRepository for CrmRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cliente)
    }

    async fn list(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(clientes)
    }

    async fn create(&self, payload: &CriarClientePayload, status_inicial: &str) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nome, tipo, cnpj, cidade, uf, telefone, status, tarefas_concluidas)
            VALUES ($1, $2, $3, $4, $5, $6, $7, '{}'::jsonb)
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(payload.tipo.as_deref())
        .bind(payload.cnpj.as_deref())
        .bind(payload.cidade.as_deref())
        .bind(payload.uf.as_deref())
        .bind(payload.telefone.as_deref())
        .bind(status_inicial)
        .fetch_one(&self.pool)
        .await?;

        Ok(cliente)
    }

    async fn update_tasks(
        &self,
        id: i32,
        atualizacao: &AtualizacaoTarefas,
    ) -> Result<Option<Cliente>, AppError> {
        let (vendedor_id, vendedor_nome) = match &atualizacao.novo_vendedor {
            Some(v) => (Some(v.id), Some(v.nome.as_str())),
            None => (None, None),
        };

        // Sem atribuição nova (ou se o usuário sumiu do cadastro) o vendedor
        // atual é mantido; a etapa é gravada de qualquer forma.
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            WITH vendedor AS (SELECT id FROM usuarios WHERE id = $4)
            UPDATE clientes
            SET tarefas_concluidas = $2,
                status = $3,
                vendedor_responsavel_id = COALESCE((SELECT id FROM vendedor), vendedor_responsavel_id),
                vendedor_responsavel = CASE
                    WHEN EXISTS (SELECT 1 FROM vendedor) THEN $5
                    ELSE vendedor_responsavel
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&atualizacao.tarefas_concluidas)
        .bind(&atualizacao.status)
        .bind(vendedor_id)
        .bind(vendedor_nome)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cliente)
    }

    async fn set_salesperson(&self, id: i32, vendedor: Option<&Vendedor>) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes
            SET vendedor_responsavel_id = $2,
                vendedor_responsavel = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vendedor.map(|v| v.id))
        .bind(vendedor.map(|v| v.nome.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(cliente)
    }
}
