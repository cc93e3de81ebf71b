// src/services/esteira.rs

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::crm::{ProgressoCliente, ProgressoEtapa};

/// Mínimo de tarefas concluídas para considerar uma etapa feita.
pub const MINIMO_TAREFAS_PADRAO: usize = 3;

// (id, nome) na ordem da esteira
const ETAPAS_PADRAO: [(&str, &str); 12] = [
    ("prospeccao", "Prospecção"),
    ("aumentar_conexao", "Aumentar Conexão"),
    ("envio_consultor", "Envio de Consultor"),
    ("efetivacao", "Efetivação"),
    ("registros_legais", "Registros Legais"),
    ("separacao", "Separação"),
    ("entrega", "Entrega"),
    ("recebimentos", "Recebimentos"),
    ("formacao", "Formação"),
    ("documentarios", "Documentários"),
    ("gerar_graficos", "Gerar Gráficos"),
    ("renovacao", "Renovação"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Etapa {
    #[schema(example = "prospeccao")]
    pub id: String,
    #[schema(example = "Prospecção")]
    pub nome: String,
    #[schema(example = 3)]
    pub minimo_tarefas: usize,
}

/// Contagem de tarefas concluídas por etapa, já normalizada.
///
/// O JSON gravado no cliente não tem garantia nenhuma de formato, então tudo
/// que não for lista conta como zero. Índices repetidos ou fora da faixa
/// contam normalmente: o sinal de progresso é o tamanho da lista.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TarefasConcluidas {
    contagens: BTreeMap<String, usize>,
}

impl TarefasConcluidas {
    /// Retorna `None` quando o valor não é um objeto (null, string, lista...).
    pub fn normalizar(valor: &Value) -> Option<Self> {
        let objeto = valor.as_object()?;
        let contagens = objeto
            .iter()
            .map(|(etapa, tarefas)| {
                let total = tarefas.as_array().map_or(0, Vec::len);
                (etapa.clone(), total)
            })
            .collect();
        Some(Self { contagens })
    }

    pub fn concluidas(&self, etapa_id: &str) -> usize {
        self.contagens.get(etapa_id).copied().unwrap_or(0)
    }
}

/// A tabela ordenada de etapas. Nunca vazia.
#[derive(Debug, Clone)]
pub struct Esteira {
    etapas: Vec<Etapa>,
}

impl Esteira {
    /// As 12 etapas padrão, todas com o mesmo mínimo.
    pub fn padrao(minimo_tarefas: usize) -> Self {
        let etapas = ETAPAS_PADRAO
            .iter()
            .map(|(id, nome)| Etapa {
                id: (*id).to_string(),
                nome: (*nome).to_string(),
                minimo_tarefas,
            })
            .collect();
        Self { etapas }
    }

    pub fn etapas(&self) -> &[Etapa] {
        &self.etapas
    }

    pub fn primeira(&self) -> &Etapa {
        &self.etapas[0]
    }

    pub fn ultima(&self) -> &Etapa {
        &self.etapas[self.etapas.len() - 1]
    }

    /// Primeira etapa, na ordem, que ainda não atingiu o mínimo.
    /// Sem mapa de tarefas, o cliente está na primeira etapa; com todas
    /// completas, fica na última (renovação).
    pub fn etapa_atual(&self, tarefas: Option<&TarefasConcluidas>) -> &Etapa {
        let Some(tarefas) = tarefas else {
            return self.primeira();
        };

        self.etapas
            .iter()
            .find(|etapa| tarefas.concluidas(&etapa.id) < etapa.minimo_tarefas)
            .unwrap_or_else(|| self.ultima())
    }

    /// Atalho para o JSON cru que vem do banco ou da requisição.
    pub fn etapa_atual_do_json(&self, valor: Option<&Value>) -> &Etapa {
        let tarefas = valor.and_then(TarefasConcluidas::normalizar);
        self.etapa_atual(tarefas.as_ref())
    }

    pub fn progresso(&self, cliente_id: i32, valor: Option<&Value>) -> ProgressoCliente {
        let tarefas = valor.and_then(TarefasConcluidas::normalizar).unwrap_or_default();
        let etapas = self
            .etapas
            .iter()
            .map(|etapa| {
                let concluidas = tarefas.concluidas(&etapa.id);
                ProgressoEtapa {
                    id: etapa.id.clone(),
                    nome: etapa.nome.clone(),
                    concluidas,
                    minimo: etapa.minimo_tarefas,
                    completa: concluidas >= etapa.minimo_tarefas,
                }
            })
            .collect();

        ProgressoCliente {
            cliente_id,
            etapa_atual: self.etapa_atual(Some(&tarefas)).id.clone(),
            etapas,
        }
    }
}

impl Default for Esteira {
    fn default() -> Self {
        Self::padrao(MINIMO_TAREFAS_PADRAO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todas_completas() -> Value {
        let mapa: serde_json::Map<String, Value> = ETAPAS_PADRAO
            .iter()
            .map(|(id, _)| ((*id).to_string(), json!([0, 1, 2])))
            .collect();
        Value::Object(mapa)
    }

    #[test]
    fn empty_map_starts_at_first_stage() {
        let esteira = Esteira::default();
        assert_eq!(esteira.etapa_atual_do_json(Some(&json!({}))).id, "prospeccao");
    }

    #[test]
    fn first_stage_done_moves_to_second() {
        let esteira = Esteira::default();
        let tarefas = json!({ "prospeccao": [0, 1, 2] });
        assert_eq!(esteira.etapa_atual_do_json(Some(&tarefas)).id, "aumentar_conexao");
    }

    #[test]
    fn all_stages_done_stays_on_last() {
        let esteira = Esteira::default();
        assert_eq!(esteira.etapa_atual_do_json(Some(&todas_completas())).id, "renovacao");
    }

    #[test]
    fn earlier_incomplete_stage_wins_regardless_of_count() {
        let esteira = Esteira::default();
        // entrega tem menos tarefas, mas aumentar_conexao vem antes
        let tarefas = json!({
            "prospeccao": [0, 1, 2],
            "aumentar_conexao": [0, 1],
            "envio_consultor": [0, 1, 2],
            "entrega": []
        });
        assert_eq!(esteira.etapa_atual_do_json(Some(&tarefas)).id, "aumentar_conexao");
    }

    #[test]
    fn later_progress_does_not_skip_empty_first_stage() {
        let esteira = Esteira::default();
        let tarefas = json!({ "efetivacao": [0, 1, 2, 3] });
        assert_eq!(esteira.etapa_atual_do_json(Some(&tarefas)).id, "prospeccao");
    }

    #[test]
    fn malformed_input_never_panics() {
        let esteira = Esteira::default();
        for valor in [json!(null), json!("prospeccao"), json!([1, 2, 3]), json!(12)] {
            assert_eq!(esteira.etapa_atual_do_json(Some(&valor)).id, "prospeccao");
        }
        assert_eq!(esteira.etapa_atual_do_json(None).id, "prospeccao");
    }

    #[test]
    fn non_array_stage_counts_as_zero() {
        let tarefas = TarefasConcluidas::normalizar(&json!({
            "prospeccao": "0,1,2",
            "aumentar_conexao": { "0": true },
            "entrega": [5, 5, 5, 99]
        }))
        .unwrap();
        assert_eq!(tarefas.concluidas("prospeccao"), 0);
        assert_eq!(tarefas.concluidas("aumentar_conexao"), 0);
        assert_eq!(tarefas.concluidas("entrega"), 4);
        assert_eq!(tarefas.concluidas("inexistente"), 0);
    }

    #[test]
    fn duplicated_indices_count_towards_minimum() {
        let esteira = Esteira::default();
        let tarefas = json!({ "prospeccao": [1, 1, 1] });
        assert_eq!(esteira.etapa_atual_do_json(Some(&tarefas)).id, "aumentar_conexao");
    }

    #[test]
    fn custom_minimum_is_respected() {
        let esteira = Esteira::padrao(5);
        let tarefas = json!({ "prospeccao": [0, 1, 2] });
        assert_eq!(esteira.etapa_atual_do_json(Some(&tarefas)).id, "prospeccao");
    }

    #[test]
    fn progress_reports_every_stage_in_order() {
        let esteira = Esteira::default();
        let progresso = esteira.progresso(9, Some(&json!({ "prospeccao": [0, 1, 2, 3] })));

        assert_eq!(progresso.cliente_id, 9);
        assert_eq!(progresso.etapa_atual, "aumentar_conexao");
        assert_eq!(progresso.etapas.len(), 12);
        assert_eq!(progresso.etapas[0].concluidas, 4);
        assert!(progresso.etapas[0].completa);
        assert!(!progresso.etapas[1].completa);
        assert_eq!(progresso.etapas[11].id, "renovacao");
    }
}
