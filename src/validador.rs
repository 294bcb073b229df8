use serde::{Serialize, Serializer};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};
use tracing::debug;

use crate::{Campo, FormularioError, ProdutoFiscal, RE_CHAVE_ERRO, validar_produto};

/// Chave do mapa de erros: posição do produto + caminho do campo.
///
/// A forma textual é `produto-<índice>-<segmentos unidos por '-'>`, a mesma
/// usada pela interface para localizar a mensagem de cada campo.
///
/// ```
/// use formulario_produtos_fiscais::{Campo, CampoIcms, ChaveErro};
///
/// let chave = ChaveErro::new(1, Campo::Icms(CampoIcms::OrigemEstado));
/// assert_eq!(chave.to_string(), "produto-1-icms-origemEstado");
/// assert_eq!("produto-1-icms-origemEstado".parse::<ChaveErro>().unwrap(), chave);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChaveErro {
    pub indice_produto: usize,
    pub campo: Campo,
}

impl ChaveErro {
    pub fn new(indice_produto: usize, campo: Campo) -> Self {
        ChaveErro {
            indice_produto,
            campo,
        }
    }
}

impl fmt::Display for ChaveErro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "produto-{}-{}", self.indice_produto, self.campo.caminho("-"))
    }
}

impl FromStr for ChaveErro {
    type Err = FormularioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalida = || FormularioError::ChaveErroInvalida {
            chave: s.to_string(),
        };

        let captures = RE_CHAVE_ERRO.captures(s).ok_or_else(invalida)?;

        let indice_produto = captures[1].parse::<usize>().map_err(|_| invalida())?;
        let segmentos: Vec<&str> = captures[2].split('-').collect();
        let campo = Campo::from_segmentos(&segmentos).ok_or_else(invalida)?;

        Ok(ChaveErro::new(indice_produto, campo))
    }
}

impl Serialize for ChaveErro {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mensagens de violação por chave; a primeira é a exibida ao lado do campo.
pub type MapaErros = BTreeMap<ChaveErro, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultadoValidacao {
    pub erros: MapaErros,
    pub valido: bool,
}

impl ResultadoValidacao {
    pub fn erros_de(&self, indice_produto: usize, campo: &Campo) -> Option<&[String]> {
        self.erros
            .get(&ChaveErro::new(indice_produto, *campo))
            .map(Vec::as_slice)
    }

    pub fn primeiro_erro(&self, indice_produto: usize, campo: &Campo) -> Option<&str> {
        self.erros_de(indice_produto, campo)
            .and_then(|mensagens| mensagens.first())
            .map(String::as_str)
    }

    pub fn erros_do_produto(
        &self,
        indice_produto: usize,
    ) -> impl Iterator<Item = (&ChaveErro, &Vec<String>)> {
        self.erros
            .iter()
            .filter(move |(chave, _)| chave.indice_produto == indice_produto)
    }

    pub fn total_violacoes(&self) -> usize {
        self.erros.values().map(Vec::len).sum()
    }

    pub fn produtos_com_erro(&self) -> BTreeSet<usize> {
        self.erros.keys().map(|chave| chave.indice_produto).collect()
    }
}

/// Valida todos os produtos, na ordem de exibição.
///
/// O formulário é válido somente se houver ao menos um produto e nenhuma violação.
pub fn validar<'a>(produtos: impl IntoIterator<Item = &'a ProdutoFiscal>) -> ResultadoValidacao {
    let mut erros = MapaErros::new();
    let mut quantidade = 0;

    for (indice, produto) in produtos.into_iter().enumerate() {
        quantidade += 1;
        for violacao in validar_produto(produto) {
            erros
                .entry(ChaveErro::new(indice, violacao.campo))
                .or_default()
                .push(violacao.mensagem);
        }
    }

    let valido = quantidade > 0 && erros.is_empty();
    debug!(produtos = quantidade, chaves = erros.len(), valido, "validação concluída");

    ResultadoValidacao { erros, valido }
}
