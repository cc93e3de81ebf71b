// Repositórios em memória usados pelos testes de serviço e de rota.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::{
    common::error::AppError,
    db::{ClienteRepository, UsuarioRepository},
    models::{
        auth::Usuario,
        crm::{AtualizacaoTarefas, Cliente, CriarClientePayload, Vendedor},
    },
};

#[derive(Default)]
pub struct ClientesEmMemoria {
    linhas: Mutex<Vec<Cliente>>,
    // Conta as escritas para os testes verificarem que nada foi gravado
    pub escritas: Mutex<usize>,
}

impl ClientesEmMemoria {
    pub fn com(clientes: Vec<Cliente>) -> Self {
        Self {
            linhas: Mutex::new(clientes),
            escritas: Mutex::new(0),
        }
    }

    pub fn total_escritas(&self) -> usize {
        *self.escritas.lock().unwrap()
    }

    fn registrar_escrita(&self) {
        *self.escritas.lock().unwrap() += 1;
    }
}

#[async_trait]
impl ClienteRepository for ClientesEmMemoria {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, AppError> {
        Ok(self.linhas.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Cliente>, AppError> {
        let mut todos = self.linhas.lock().unwrap().clone();
        todos.sort_by_key(|c| c.id);
        Ok(todos)
    }

    async fn create(&self, payload: &CriarClientePayload, status_inicial: &str) -> Result<Cliente, AppError> {
        self.registrar_escrita();
        let mut linhas = self.linhas.lock().unwrap();
        let id = linhas.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let agora = Utc::now();
        let cliente = Cliente {
            id,
            nome: payload.nome.clone(),
            tipo: payload.tipo.clone(),
            cnpj: payload.cnpj.clone(),
            cidade: payload.cidade.clone(),
            uf: payload.uf.clone(),
            telefone: payload.telefone.clone(),
            status: Some(status_inicial.to_string()),
            vendedor_responsavel: None,
            vendedor_responsavel_id: None,
            tarefas_concluidas: Some(json!({})),
            created_at: agora,
            updated_at: agora,
        };
        linhas.push(cliente.clone());
        Ok(cliente)
    }

    async fn update_tasks(
        &self,
        id: i32,
        atualizacao: &AtualizacaoTarefas,
    ) -> Result<Option<Cliente>, AppError> {
        self.registrar_escrita();
        let mut linhas = self.linhas.lock().unwrap();
        let Some(cliente) = linhas.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        cliente.tarefas_concluidas = Some(atualizacao.tarefas_concluidas.clone());
        cliente.status = Some(atualizacao.status.clone());
        if let Some(vendedor) = &atualizacao.novo_vendedor {
            cliente.vendedor_responsavel_id = Some(vendedor.id);
            cliente.vendedor_responsavel = Some(vendedor.nome.clone());
        }
        cliente.updated_at = Utc::now();
        Ok(Some(cliente.clone()))
    }

    async fn set_salesperson(&self, id: i32, vendedor: Option<&Vendedor>) -> Result<Option<Cliente>, AppError> {
        self.registrar_escrita();
        let mut linhas = self.linhas.lock().unwrap();
        let Some(cliente) = linhas.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        cliente.vendedor_responsavel_id = vendedor.map(|v| v.id);
        cliente.vendedor_responsavel = vendedor.map(|v| v.nome.clone());
        cliente.updated_at = Utc::now();
        Ok(Some(cliente.clone()))
    }
}

#[derive(Default)]
pub struct UsuariosEmMemoria {
    linhas: Vec<Usuario>,
}

impl UsuariosEmMemoria {
    pub fn com(usuarios: Vec<Usuario>) -> Self {
        Self { linhas: usuarios }
    }
}

#[async_trait]
impl UsuarioRepository for UsuariosEmMemoria {
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        Ok(self.linhas.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        Ok(self.linhas.iter().find(|u| u.id == id).cloned())
    }
}

// --- Fixtures ---

pub fn cliente_sem_vendedor(id: i32) -> Cliente {
    let agora = Utc::now();
    Cliente {
        id,
        nome: format!("Escola {id}"),
        tipo: Some("Escola pública".into()),
        cnpj: None,
        cidade: Some("Recife".into()),
        uf: Some("PE".into()),
        telefone: None,
        status: Some("prospeccao".into()),
        vendedor_responsavel: None,
        vendedor_responsavel_id: None,
        tarefas_concluidas: None,
        created_at: agora,
        updated_at: agora,
    }
}

pub fn cliente_com_vendedor(id: i32, nome: &str, vendedor_id: i32) -> Cliente {
    Cliente {
        vendedor_responsavel: Some(nome.to_string()),
        vendedor_responsavel_id: Some(vendedor_id),
        ..cliente_sem_vendedor(id)
    }
}

pub fn usuario(id: i32, nome: &str, perfil_id: i32, senha: &str) -> Usuario {
    Usuario {
        id,
        nome: nome.to_string(),
        email: format!("{}@escola.com.br", nome.to_lowercase()),
        // custo baixo para os testes não demorarem
        senha_hash: bcrypt::hash(senha, 4).unwrap(),
        perfil_id,
        created_at: Utc::now(),
    }
}
