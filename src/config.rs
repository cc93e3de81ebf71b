// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ClienteRepository, CrmRepository, UserRepository, UsuarioRepository},
    services::{
        atribuicao::RegraAtribuicao,
        auth::AuthService,
        esteira::{Esteira, MINIMO_TAREFAS_PADRAO},
        CrmService,
    },
};

/// Configuração lida do ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub minimo_tarefas: usize,
    pub perfis_atribuicao: Vec<i32>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            minimo_tarefas: parse_var("ESTEIRA_MIN_TAREFAS", MINIMO_TAREFAS_PADRAO)?,
            perfis_atribuicao: match env::var("PERFIS_ATRIBUICAO") {
                Ok(valor) => parse_perfis(&valor)?,
                Err(_) => RegraAtribuicao::default().perfis_qualificados().to_vec(),
            },
        })
    }
}

fn parse_var<T>(nome: &str, padrao: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(nome) {
        Ok(valor) => valor
            .trim()
            .parse()
            .with_context(|| format!("{nome} inválida: '{valor}'")),
        Err(_) => Ok(padrao),
    }
}

/// "2, 3,4" -> [2, 3, 4]
fn parse_perfis(valor: &str) -> anyhow::Result<Vec<i32>> {
    valor
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<i32>()
                .with_context(|| format!("PERFIS_ATRIBUICAO contém um perfil inválido: '{p}'"))
        })
        .collect()
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub crm_service: CrmService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let clientes: Arc<dyn ClienteRepository> = Arc::new(CrmRepository::new(db_pool.clone()));
        let usuarios: Arc<dyn UsuarioRepository> = Arc::new(UserRepository::new(db_pool.clone()));

        let state = Self::from_parts(settings, clientes, usuarios);
        Ok((state, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(
        settings: &Settings,
        clientes: Arc<dyn ClienteRepository>,
        usuarios: Arc<dyn UsuarioRepository>,
    ) -> Self {
        let esteira = Arc::new(Esteira::padrao(settings.minimo_tarefas));
        let regra = RegraAtribuicao::new(settings.perfis_atribuicao.clone());

        Self {
            auth_service: AuthService::new(usuarios.clone(), settings.jwt_secret.clone()),
            crm_service: CrmService::new(clientes, usuarios, esteira, regra),
        }
    }
}
