// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Esteira ---
        handlers::crm::list_stages,
        handlers::crm::update_tasks,
        handlers::crm::get_progress,

        // --- Clientes ---
        handlers::crm::create_client,
        handlers::crm::list_clients,
        handlers::crm::get_client,
        handlers::crm::set_salesperson,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Esteira ---
            services::esteira::Etapa,
            models::crm::ProgressoEtapa,
            models::crm::ProgressoCliente,

            // --- Clientes ---
            models::crm::Cliente,
            models::crm::CriarClientePayload,
            models::crm::AtualizarTarefasPayload,
            models::crm::DefinirVendedorPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Esteira", description = "Etapas, tarefas e atribuição automática de vendedor"),
        (name = "Clientes", description = "Cadastro de clientes e vendedor responsável")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
