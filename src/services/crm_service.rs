// src/services/crm_service.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{ClienteRepository, UsuarioRepository},
    models::{
        auth::Solicitante,
        crm::{AtualizacaoTarefas, Cliente, CriarClientePayload, ProgressoCliente, Vendedor},
    },
    services::{atribuicao::RegraAtribuicao, esteira::Esteira},
};

#[derive(Clone)]
pub struct CrmService {
    clientes: Arc<dyn ClienteRepository>,
    usuarios: Arc<dyn UsuarioRepository>,
    esteira: Arc<Esteira>,
    regra: RegraAtribuicao,
}

impl CrmService {
    pub fn new(
        clientes: Arc<dyn ClienteRepository>,
        usuarios: Arc<dyn UsuarioRepository>,
        esteira: Arc<Esteira>,
        regra: RegraAtribuicao,
    ) -> Self {
        Self { clientes, usuarios, esteira, regra }
    }

    pub fn esteira(&self) -> &Esteira {
        &self.esteira
    }

    // =========================================================================
    //  ESTEIRA: ATUALIZAÇÃO DE TAREFAS
    // =========================================================================

    /// Substitui o mapa de tarefas do cliente, recalcula a etapa e, se for o
    /// caso, atribui o solicitante como vendedor.
    ///
    /// A decisão de atribuição usa a linha lida ANTES da escrita; a escrita é
    /// uma única instrução. Duas chamadas concorrentes: vale a última.
    pub async fn update_tasks(
        &self,
        cliente_id: i32,
        tarefas_concluidas: Value,
        solicitante: Option<&Solicitante>,
    ) -> Result<Cliente, AppError> {
        // 0. Formato: precisa ser objeto. Nada é lido nem gravado se não for.
        if !tarefas_concluidas.is_object() {
            return Err(AppError::TarefasInvalidas);
        }

        // 1. Linha atual
        let atual = self
            .clientes
            .find_by_id(cliente_id)
            .await?
            .ok_or(AppError::ClienteNaoEncontrado)?;

        // 2. Nova etapa
        let novo_status = self.esteira.etapa_atual_do_json(Some(&tarefas_concluidas)).id.clone();

        // 3. Vendedor (só se ainda não houver)
        let novo_vendedor = match self.regra.decidir(&atual, solicitante) {
            Some(candidato) => self.registered_salesperson(candidato).await,
            None => None,
        };

        // 4. Grava tudo junto
        let atualizacao = AtualizacaoTarefas {
            tarefas_concluidas,
            status: novo_status,
            novo_vendedor,
        };
        let atualizado = self
            .clientes
            .update_tasks(cliente_id, &atualizacao)
            .await?
            .ok_or(AppError::ClienteNaoEncontrado)?;

        tracing::info!(
            cliente_id,
            status_anterior = atual.status.as_deref().unwrap_or("-"),
            status = %atualizacao.status,
            atribuido = atualizacao.novo_vendedor.is_some(),
            "Tarefas do cliente atualizadas"
        );

        Ok(atualizado)
    }

    /// O token vale por dias; o usuário pode ter sido removido nesse meio
    /// tempo. Sem cadastro não há atribuição, e a atualização segue.
    async fn registered_salesperson(&self, candidato: Vendedor) -> Option<Vendedor> {
        match self.usuarios.find_by_id(candidato.id).await {
            Ok(Some(usuario)) => Some(Vendedor { id: usuario.id, nome: usuario.nome }),
            Ok(None) => {
                tracing::warn!(usuario_id = candidato.id, "Solicitante não está cadastrado; atribuição ignorada");
                None
            }
            Err(e) => {
                tracing::warn!(usuario_id = candidato.id, "Falha ao conferir o solicitante; atribuição ignorada: {}", e);
                None
            }
        }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client(&self, payload: &CriarClientePayload) -> Result<Cliente, AppError> {
        let status_inicial = &self.esteira.primeira().id;
        let cliente = self.clientes.create(payload, status_inicial).await?;

        tracing::info!(cliente_id = cliente.id, "Cliente criado");
        Ok(cliente)
    }

    pub async fn list_clients(&self) -> Result<Vec<Cliente>, AppError> {
        self.clientes.list().await
    }

    pub async fn get_client(&self, id: i32) -> Result<Cliente, AppError> {
        self.clientes
            .find_by_id(id)
            .await?
            .ok_or(AppError::ClienteNaoEncontrado)
    }

    pub async fn client_progress(&self, id: i32) -> Result<ProgressoCliente, AppError> {
        let cliente = self.get_client(id).await?;
        Ok(self.esteira.progresso(cliente.id, cliente.tarefas_concluidas.as_ref()))
    }

    /// Troca manual de vendedor. O nome vem sempre do cadastro do usuário,
    /// nunca do corpo da requisição, para as duas colunas não divergirem.
    pub async fn set_salesperson(&self, cliente_id: i32, vendedor_id: Option<i32>) -> Result<Cliente, AppError> {
        let vendedor = match vendedor_id {
            Some(id) => {
                let usuario = self
                    .usuarios
                    .find_by_id(id)
                    .await?
                    .ok_or(AppError::UsuarioNaoEncontrado)?;
                Some(Vendedor { id: usuario.id, nome: usuario.nome })
            }
            None => None,
        };

        let cliente = self
            .clientes
            .set_salesperson(cliente_id, vendedor.as_ref())
            .await?
            .ok_or(AppError::ClienteNaoEncontrado)?;

        tracing::info!(cliente_id, vendedor_id = ?vendedor_id, "Vendedor alterado manualmente");
        Ok(cliente)
    }
}
