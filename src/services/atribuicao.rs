// src/services/atribuicao.rs

use crate::models::{
    auth::{Solicitante, PERFIL_COMERCIAL, PERFIL_CONSULTOR, PERFIL_EQUIPE_INTERNA},
    crm::{Cliente, Vendedor},
};

/// Quem pode "pegar" um cliente sem vendedor só por atualizar as tarefas dele.
#[derive(Debug, Clone)]
pub struct RegraAtribuicao {
    perfis_qualificados: Vec<i32>,
}

impl RegraAtribuicao {
    pub fn new(perfis_qualificados: Vec<i32>) -> Self {
        Self { perfis_qualificados }
    }

    pub fn perfis_qualificados(&self) -> &[i32] {
        &self.perfis_qualificados
    }

    /// Decide o novo vendedor do cliente, olhando a linha ANTES da atualização.
    ///
    /// `None` significa "não mexer": o cliente já tem vendedor, o solicitante
    /// não foi identificado, ou o perfil dele não qualifica. Nenhum desses
    /// casos é erro.
    pub fn decidir(&self, cliente: &Cliente, solicitante: Option<&Solicitante>) -> Option<Vendedor> {
        if cliente.tem_vendedor() {
            return None;
        }

        let solicitante = solicitante?;
        if !self.perfis_qualificados.contains(&solicitante.perfil_id) {
            tracing::debug!(
                cliente_id = cliente.id,
                perfil_id = solicitante.perfil_id,
                "Perfil não qualifica para atribuição automática"
            );
            return None;
        }

        Some(Vendedor {
            id: solicitante.id,
            nome: solicitante.nome.clone(),
        })
    }
}

impl Default for RegraAtribuicao {
    fn default() -> Self {
        Self::new(vec![PERFIL_CONSULTOR, PERFIL_COMERCIAL, PERFIL_EQUIPE_INTERNA])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::PERFIL_ADMIN;
    use chrono::Utc;

    fn cliente(vendedor: Option<(&str, i32)>) -> Cliente {
        Cliente {
            id: 1,
            nome: "Escola Estadual Modelo".into(),
            tipo: None,
            cnpj: None,
            cidade: None,
            uf: None,
            telefone: None,
            status: Some("prospeccao".into()),
            vendedor_responsavel: vendedor.map(|(nome, _)| nome.to_string()),
            vendedor_responsavel_id: vendedor.map(|(_, id)| id),
            tarefas_concluidas: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn solicitante(perfil_id: i32) -> Solicitante {
        Solicitante { id: 20, nome: "Carlos".into(), perfil_id }
    }

    #[test]
    fn qualifying_roles_take_unassigned_client() {
        let regra = RegraAtribuicao::default();
        for perfil in [PERFIL_CONSULTOR, PERFIL_COMERCIAL, PERFIL_EQUIPE_INTERNA] {
            assert_eq!(
                regra.decidir(&cliente(None), Some(&solicitante(perfil))),
                Some(Vendedor { id: 20, nome: "Carlos".into() })
            );
        }
    }

    #[test]
    fn admin_and_unknown_roles_are_skipped() {
        let regra = RegraAtribuicao::default();
        assert_eq!(regra.decidir(&cliente(None), Some(&solicitante(PERFIL_ADMIN))), None);
        assert_eq!(regra.decidir(&cliente(None), Some(&solicitante(99))), None);
    }

    #[test]
    fn missing_identity_is_a_no_op() {
        assert_eq!(RegraAtribuicao::default().decidir(&cliente(None), None), None);
    }

    #[test]
    fn existing_salesperson_is_never_replaced() {
        let regra = RegraAtribuicao::default();
        let atual = cliente(Some(("Ana", 5)));
        for perfil in [PERFIL_ADMIN, PERFIL_CONSULTOR, PERFIL_COMERCIAL, PERFIL_EQUIPE_INTERNA] {
            assert_eq!(regra.decidir(&atual, Some(&solicitante(perfil))), None);
        }
    }

    #[test]
    fn half_filled_salesperson_counts_as_assigned() {
        let regra = RegraAtribuicao::default();
        let mut so_nome = cliente(None);
        so_nome.vendedor_responsavel = Some("Ana".into());
        let mut so_id = cliente(None);
        so_id.vendedor_responsavel_id = Some(5);

        assert_eq!(regra.decidir(&so_nome, Some(&solicitante(PERFIL_CONSULTOR))), None);
        assert_eq!(regra.decidir(&so_id, Some(&solicitante(PERFIL_CONSULTOR))), None);
    }

    #[test]
    fn blank_name_without_id_is_unassigned() {
        let mut atual = cliente(None);
        atual.vendedor_responsavel = Some("  ".into());
        assert!(RegraAtribuicao::default()
            .decidir(&atual, Some(&solicitante(PERFIL_EQUIPE_INTERNA)))
            .is_some());
    }

    #[test]
    fn configured_roles_replace_defaults() {
        let regra = RegraAtribuicao::new(vec![PERFIL_ADMIN]);
        assert!(regra.decidir(&cliente(None), Some(&solicitante(PERFIL_ADMIN))).is_some());
        assert!(regra.decidir(&cliente(None), Some(&solicitante(PERFIL_CONSULTOR))).is_none());
    }
}
