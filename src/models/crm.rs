// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// --- CLIENTE (a linha da tabela `clientes`) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Colégio Horizonte")]
    pub nome: String,
    #[schema(example = "Escola particular")]
    pub tipo: Option<String>,
    #[schema(example = "12345678000199")]
    pub cnpj: Option<String>,
    #[schema(example = "Campinas")]
    pub cidade: Option<String>,
    #[schema(example = "SP")]
    pub uf: Option<String>,
    pub telefone: Option<String>,

    // Etapa atual da esteira. Linhas antigas podem ter NULL ou um valor fora da lista.
    #[schema(example = "aumentar_conexao")]
    pub status: Option<String>,

    // As duas colunas do vendedor são sempre escritas juntas, a partir de um `Vendedor`.
    #[schema(example = "Ana Souza")]
    pub vendedor_responsavel: Option<String>,
    #[schema(example = 7)]
    pub vendedor_responsavel_id: Option<i32>,

    // Etapa -> índices das tarefas concluídas. JSONB solto, normalizado antes de usar.
    #[schema(value_type = Object, example = json!({"prospeccao": [0, 1, 2]}))]
    pub tarefas_concluidas: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cliente {
    /// Considera o cliente com vendedor se qualquer uma das duas colunas estiver preenchida.
    pub fn tem_vendedor(&self) -> bool {
        self.vendedor_responsavel_id.is_some()
            || self
                .vendedor_responsavel
                .as_deref()
                .is_some_and(|nome| !nome.trim().is_empty())
    }
}

/// Nome e id do vendedor, gravados sempre em par.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendedor {
    pub id: i32,
    pub nome: String,
}

/// O que a atualização de tarefas grava numa única instrução.
#[derive(Debug, Clone)]
pub struct AtualizacaoTarefas {
    pub tarefas_concluidas: Value,
    pub status: String,
    // None = manter o vendedor atual
    pub novo_vendedor: Option<Vendedor>,
}

// --- PAYLOADS ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CriarClientePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Colégio Horizonte")]
    pub nome: String,

    #[schema(example = "Escola particular")]
    pub tipo: Option<String>,

    #[validate(length(min = 11, max = 18, message = "CNPJ/CPF inválido."))]
    #[schema(example = "12345678000199")]
    pub cnpj: Option<String>,

    pub cidade: Option<String>,

    #[validate(length(equal = 2, message = "A UF deve ter 2 letras."))]
    #[schema(example = "SP")]
    pub uf: Option<String>,

    pub telefone: Option<String>,
}

/// Corpo do PUT de tarefas. `Value` para que um formato errado chegue até a
/// validação da regra e vire 400, e não um erro de desserialização.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AtualizarTarefasPayload {
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"prospeccao": [0, 1, 2], "aumentar_conexao": [0]}))]
    pub tarefas_concluidas: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DefinirVendedorPayload {
    // null remove o vendedor
    #[schema(example = 7)]
    pub vendedor_id: Option<i32>,
}

// --- PROGRESSO ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressoEtapa {
    #[schema(example = "prospeccao")]
    pub id: String,
    #[schema(example = "Prospecção")]
    pub nome: String,
    pub concluidas: usize,
    pub minimo: usize,
    pub completa: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressoCliente {
    pub cliente_id: i32,
    #[schema(example = "aumentar_conexao")]
    pub etapa_atual: String,
    pub etapas: Vec<ProgressoEtapa>,
}
