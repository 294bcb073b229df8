use serde::Serialize;
use std::fmt;

use crate::{Campo, ChaveErro, MapaErros};

/// Agrupamento da interface usado para sinalizar onde estão os erros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Aba {
    Identificacao,
    DadosFiscais,
    DadosComerciais,
}

impl Aba {
    pub const TODAS: [Aba; 3] = [Aba::Identificacao, Aba::DadosFiscais, Aba::DadosComerciais];

    /// Trechos procurados no caminho do campo (segmentos unidos por '-').
    pub fn padroes(&self) -> &'static [&'static str] {
        match self {
            Aba::Identificacao => &["descricao", "ncm", "unidadeMedida"],
            Aba::DadosFiscais => &["icms", "pisCofins"],
            Aba::DadosComerciais => &["precoCompra", "precoVenda", "fornecedor"],
        }
    }

    pub fn titulo(&self) -> &'static str {
        match self {
            Aba::Identificacao => "Identificação",
            Aba::DadosFiscais => "Dados Fiscais",
            Aba::DadosComerciais => "Dados Comerciais",
        }
    }
}

impl fmt::Display for Aba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.titulo())
    }
}

/// Classifica o campo pela primeira aba cujo padrão ocorra no caminho.
///
/// A busca é por trecho, não por segmento inteiro: `historicoClassificacao-0-ncmAnterior`
/// contém `ncm` e cai em Identificação. Campos sem correspondência devolvem `None`.
///
/// ```
/// use formulario_produtos_fiscais::{classificar, Aba, Campo, CampoIcms, CampoNotaFiscal};
///
/// assert_eq!(classificar(&Campo::Icms(CampoIcms::OrigemEstado)), Some(Aba::DadosFiscais));
/// assert_eq!(classificar(&Campo::NotaFiscal(0, CampoNotaFiscal::Numero)), None);
/// ```
pub fn classificar(campo: &Campo) -> Option<Aba> {
    let caminho = campo.caminho("-");
    Aba::TODAS
        .into_iter()
        .find(|aba| aba.padroes().iter().any(|padrao| caminho.contains(padrao)))
}

/// `true` = aba sem erros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidadeAbas {
    pub identificacao: bool,
    pub dados_fiscais: bool,
    pub dados_comerciais: bool,
}

impl Default for ValidadeAbas {
    fn default() -> Self {
        ValidadeAbas {
            identificacao: true,
            dados_fiscais: true,
            dados_comerciais: true,
        }
    }
}

impl ValidadeAbas {
    fn invalidar(&mut self, aba: Aba) {
        match aba {
            Aba::Identificacao => self.identificacao = false,
            Aba::DadosFiscais => self.dados_fiscais = false,
            Aba::DadosComerciais => self.dados_comerciais = false,
        }
    }

    pub fn aba_valida(&self, aba: Aba) -> bool {
        match aba {
            Aba::Identificacao => self.identificacao,
            Aba::DadosFiscais => self.dados_fiscais,
            Aba::DadosComerciais => self.dados_comerciais,
        }
    }

    pub fn todas_validas(&self) -> bool {
        Aba::TODAS.iter().all(|&aba| self.aba_valida(aba))
    }

    fn a_partir_de<'a>(chaves: impl Iterator<Item = &'a ChaveErro>) -> Self {
        chaves
            .filter_map(|chave| classificar(&chave.campo))
            .fold(ValidadeAbas::default(), |mut validade, aba| {
                validade.invalidar(aba);
                validade
            })
    }
}

/// Validade das abas de um produto.
pub fn validade_abas(erros: &MapaErros, indice_produto: usize) -> ValidadeAbas {
    ValidadeAbas::a_partir_de(
        erros
            .keys()
            .filter(|chave| chave.indice_produto == indice_produto),
    )
}

/// Validade das abas considerando todos os produtos do formulário.
pub fn validade_abas_global(erros: &MapaErros) -> ValidadeAbas {
    ValidadeAbas::a_partir_de(erros.keys())
}

/// No máximo um produto expandido por vez.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansao {
    expandido: Option<String>,
}

impl Expansao {
    pub fn expandido(&self) -> Option<&str> {
        self.expandido.as_deref()
    }

    pub fn esta_expandido(&self, id: &str) -> bool {
        self.expandido.as_deref() == Some(id)
    }

    /// Recolhe se `id` já estava expandido; caso contrário expande `id` e recolhe o anterior.
    pub fn alternar(&mut self, id: &str) {
        if self.esta_expandido(id) {
            self.expandido = None;
        } else {
            self.expandir(id);
        }
    }

    pub fn expandir(&mut self, id: &str) {
        self.expandido = Some(id.to_string());
    }

    /// Limpa a referência quando o produto expandido é removido.
    pub fn ao_remover(&mut self, id: &str) {
        if self.esta_expandido(id) {
            self.expandido = None;
        }
    }
}
