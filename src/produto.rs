use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{RegimeApuracao, RegimeTributario};

/// Registro central do formulário: classificação e atributos tributários de um item.
///
/// Os campos de conjunto fechado (UFs, regimes, tipo de benefício) guardam o texto
/// digitado pelo operador, para que um valor fora do conjunto seja reportado como
/// violação pelo esquema em vez de ser descartado na entrada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoFiscal {
    pub id: String,
    pub descricao: String,
    pub ncm: String,
    pub unidade_medida: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cest: Option<String>,
    pub icms: Icms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipi: Option<Ipi>,
    pub pis_cofins: PisCofins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<Iss>,
    pub preco_compra: String,
    pub preco_venda: String,
    pub fornecedor: Fornecedor,
    #[serde(default)]
    pub notas_fiscais: Vec<NotaFiscal>,
    #[serde(default)]
    pub beneficios_fiscais: Vec<BeneficioFiscal>,
    #[serde(default)]
    pub historico_classificacao: Vec<HistoricoClassificacao>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icms {
    pub aliquota: String,
    pub origem_estado: String,
    pub destino_estado: String,
    pub regime_tributario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducao_base_calculo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituicao_tributaria: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_tipi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliquota: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PisCofins {
    pub regime_apuracao: String,
    pub pis_aliquota: String,
    pub cofins_aliquota: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pode_gerar_credito: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iss {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliquota: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fornecedor {
    pub nome: String,
    pub cnpj: String,
    pub estado: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotaFiscal {
    pub numero: String,
    pub data_emissao: String,
    pub valor_total: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficioFiscal {
    pub tipo: String,
    pub descricao: String,
    pub estado_aplicavel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoClassificacao {
    pub ncm_anterior: String,
    pub data_alteracao: String,
    pub motivo: String,
}

impl ProdutoFiscal {
    /// Cria um produto com os padrões do formulário.
    ///
    /// Os padrões preenchem ICMS, PIS/COFINS, preços, unidade e a UF do fornecedor,
    /// de modo que um produto recém-criado viola apenas `descricao`, `ncm`,
    /// `fornecedor.nome` e `fornecedor.cnpj`.
    pub fn novo(id: impl Into<String>) -> Self {
        ProdutoFiscal {
            id: id.into(),
            descricao: String::new(),
            ncm: String::new(),
            unidade_medida: "UN".to_string(),
            categoria: None,
            subcategoria: None,
            gtin: None,
            cest: None,
            icms: Icms {
                aliquota: "18".to_string(),
                origem_estado: "SP".to_string(),
                destino_estado: "SP".to_string(),
                regime_tributario: RegimeTributario::SimplesNacional.to_string(),
                reducao_base_calculo: None,
                substituicao_tributaria: None,
            },
            ipi: None,
            pis_cofins: PisCofins {
                regime_apuracao: RegimeApuracao::Cumulativo.to_string(),
                pis_aliquota: "0.65".to_string(),
                cofins_aliquota: "3".to_string(),
                pode_gerar_credito: None,
            },
            iss: None,
            preco_compra: "0".to_string(),
            preco_venda: "0".to_string(),
            fornecedor: Fornecedor {
                nome: String::new(),
                cnpj: String::new(),
                estado: "SP".to_string(),
            },
            notas_fiscais: Vec::new(),
            beneficios_fiscais: Vec::new(),
            historico_classificacao: Vec::new(),
        }
    }

    pub fn tamanho_da_lista(&self, lista: Lista) -> usize {
        match lista {
            Lista::NotasFiscais => self.notas_fiscais.len(),
            Lista::BeneficiosFiscais => self.beneficios_fiscais.len(),
            Lista::HistoricoClassificacao => self.historico_classificacao.len(),
        }
    }
}

/// As três listas opcionais de um produto, endereçadas por posição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lista {
    NotasFiscais,
    BeneficiosFiscais,
    HistoricoClassificacao,
}

impl Lista {
    pub const TODAS: [Lista; 3] = [
        Lista::NotasFiscais,
        Lista::BeneficiosFiscais,
        Lista::HistoricoClassificacao,
    ];

    /// Nome do segmento no caminho do campo.
    pub fn nome(&self) -> &'static str {
        match self {
            Lista::NotasFiscais => "notasFiscais",
            Lista::BeneficiosFiscais => "beneficiosFiscais",
            Lista::HistoricoClassificacao => "historicoClassificacao",
        }
    }

    pub fn from_nome(nome: &str) -> Option<Lista> {
        Lista::TODAS.into_iter().find(|lista| lista.nome() == nome)
    }

    /// Elemento em branco, usado ao acrescentar uma linha pela interface.
    pub fn item_em_branco(&self) -> ItemLista {
        match self {
            Lista::NotasFiscais => ItemLista::NotaFiscal(NotaFiscal::default()),
            Lista::BeneficiosFiscais => ItemLista::BeneficioFiscal(BeneficioFiscal::default()),
            Lista::HistoricoClassificacao => {
                ItemLista::HistoricoClassificacao(HistoricoClassificacao::default())
            }
        }
    }
}

impl fmt::Display for Lista {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nome())
    }
}

/// Elemento de uma das listas opcionais.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemLista {
    NotaFiscal(NotaFiscal),
    BeneficioFiscal(BeneficioFiscal),
    HistoricoClassificacao(HistoricoClassificacao),
}

impl ItemLista {
    pub fn lista(&self) -> Lista {
        match self {
            ItemLista::NotaFiscal(_) => Lista::NotasFiscais,
            ItemLista::BeneficioFiscal(_) => Lista::BeneficiosFiscais,
            ItemLista::HistoricoClassificacao(_) => Lista::HistoricoClassificacao,
        }
    }
}
