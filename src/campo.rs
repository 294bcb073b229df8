use serde::{Serialize, Serializer};
use std::{borrow::Cow, fmt, str::FromStr};

use crate::{
    FormularioError, FormularioResult, Ipi, Iss, Lista, ProdutoFiscal, RE_CAMINHO_CAMPO,
    RE_SEPARADOR_CAMINHO,
};

/// Gera o enum das folhas de um grupo (objeto aninhado ou elemento de lista)
/// com o nome de segmento de cada folha.
macro_rules! campos_do_grupo {
    (
        $(#[$meta:meta])*
        $nome:ident { $($variante:ident => $texto:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $nome {
            $($variante,)+
        }

        impl $nome {
            pub const TODOS: &'static [$nome] = &[$($nome::$variante),+];

            pub fn nome(&self) -> &'static str {
                match self {
                    $(Self::$variante => $texto,)+
                }
            }

            pub fn from_nome(nome: &str) -> Option<Self> {
                match nome {
                    $($texto => Some(Self::$variante),)+
                    _ => None,
                }
            }
        }
    };
}

campos_do_grupo! {
    CampoIcms {
        Aliquota => "aliquota",
        OrigemEstado => "origemEstado",
        DestinoEstado => "destinoEstado",
        RegimeTributario => "regimeTributario",
        ReducaoBaseCalculo => "reducaoBaseCalculo",
        SubstituicaoTributaria => "substituicaoTributaria",
    }
}

campos_do_grupo! {
    CampoIpi {
        CodigoTipi => "codigoTipi",
        Aliquota => "aliquota",
    }
}

campos_do_grupo! {
    CampoPisCofins {
        RegimeApuracao => "regimeApuracao",
        PisAliquota => "pisAliquota",
        CofinsAliquota => "cofinsAliquota",
        PodeGerarCredito => "podeGerarCredito",
    }
}

campos_do_grupo! {
    CampoIss {
        Aliquota => "aliquota",
        Municipio => "municipio",
    }
}

campos_do_grupo! {
    CampoFornecedor {
        Nome => "nome",
        Cnpj => "cnpj",
        Estado => "estado",
    }
}

campos_do_grupo! {
    CampoNotaFiscal {
        Numero => "numero",
        DataEmissao => "dataEmissao",
        ValorTotal => "valorTotal",
    }
}

campos_do_grupo! {
    CampoBeneficio {
        Tipo => "tipo",
        Descricao => "descricao",
        EstadoAplicavel => "estadoAplicavel",
    }
}

campos_do_grupo! {
    CampoHistorico {
        NcmAnterior => "ncmAnterior",
        DataAlteracao => "dataAlteracao",
        Motivo => "motivo",
    }
}

/// Endereço tipado de uma folha de `ProdutoFiscal`, em profundidade 1 a 3.
///
/// Os elementos das listas opcionais são endereçados pela posição.
///
/// ```
/// use formulario_produtos_fiscais::{Campo, CampoIcms, CampoNotaFiscal};
///
/// let campo: Campo = "icms.origemEstado".parse().unwrap();
/// assert_eq!(campo, Campo::Icms(CampoIcms::OrigemEstado));
///
/// let nota: Campo = "notasFiscais[2].numero".parse().unwrap();
/// assert_eq!(nota, Campo::NotaFiscal(2, CampoNotaFiscal::Numero));
/// assert_eq!(nota.to_string(), "notasFiscais.2.numero");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Campo {
    Descricao,
    Ncm,
    UnidadeMedida,
    Categoria,
    Subcategoria,
    Gtin,
    Cest,
    Icms(CampoIcms),
    Ipi(CampoIpi),
    PisCofins(CampoPisCofins),
    Iss(CampoIss),
    PrecoCompra,
    PrecoVenda,
    Fornecedor(CampoFornecedor),
    NotaFiscal(usize, CampoNotaFiscal),
    BeneficioFiscal(usize, CampoBeneficio),
    HistoricoClassificacao(usize, CampoHistorico),
}

const CAMPOS_RAIZ: [(&str, Campo); 9] = [
    ("descricao", Campo::Descricao),
    ("ncm", Campo::Ncm),
    ("unidadeMedida", Campo::UnidadeMedida),
    ("categoria", Campo::Categoria),
    ("subcategoria", Campo::Subcategoria),
    ("gtin", Campo::Gtin),
    ("cest", Campo::Cest),
    ("precoCompra", Campo::PrecoCompra),
    ("precoVenda", Campo::PrecoVenda),
];

/// Tipo do valor guardado numa folha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoCampo {
    Texto,
    Booleano,
}

impl fmt::Display for TipoCampo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipoCampo::Texto => f.write_str("texto"),
            TipoCampo::Booleano => f.write_str("booleano"),
        }
    }
}

impl Campo {
    /// Segmentos do caminho, ex.: `["icms", "origemEstado"]` ou `["notasFiscais", "0", "numero"]`.
    pub fn segmentos(&self) -> Vec<Cow<'static, str>> {
        let lista = |lista: Lista, indice: usize, folha: &'static str| {
            vec![
                Cow::Borrowed(lista.nome()),
                Cow::Owned(indice.to_string()),
                Cow::Borrowed(folha),
            ]
        };

        match *self {
            Campo::Icms(c) => vec!["icms".into(), c.nome().into()],
            Campo::Ipi(c) => vec!["ipi".into(), c.nome().into()],
            Campo::PisCofins(c) => vec!["pisCofins".into(), c.nome().into()],
            Campo::Iss(c) => vec!["iss".into(), c.nome().into()],
            Campo::Fornecedor(c) => vec!["fornecedor".into(), c.nome().into()],
            Campo::NotaFiscal(i, c) => lista(Lista::NotasFiscais, i, c.nome()),
            Campo::BeneficioFiscal(i, c) => lista(Lista::BeneficiosFiscais, i, c.nome()),
            Campo::HistoricoClassificacao(i, c) => {
                lista(Lista::HistoricoClassificacao, i, c.nome())
            }
            raiz => CAMPOS_RAIZ
                .iter()
                .find(|(_, campo)| *campo == raiz)
                .map(|(nome, _)| vec![Cow::Borrowed(*nome)])
                .unwrap_or_default(),
        }
    }

    /// Caminho com os segmentos unidos pelo separador dado.
    pub fn caminho(&self, separador: &str) -> String {
        self.segmentos().join(separador)
    }

    pub fn from_segmentos(segmentos: &[&str]) -> Option<Campo> {
        match *segmentos {
            [nome] => CAMPOS_RAIZ
                .iter()
                .find(|(raiz, _)| *raiz == nome)
                .map(|&(_, campo)| campo),
            [grupo, folha] => match grupo {
                "icms" => CampoIcms::from_nome(folha).map(Campo::Icms),
                "ipi" => CampoIpi::from_nome(folha).map(Campo::Ipi),
                "pisCofins" => CampoPisCofins::from_nome(folha).map(Campo::PisCofins),
                "iss" => CampoIss::from_nome(folha).map(Campo::Iss),
                "fornecedor" => CampoFornecedor::from_nome(folha).map(Campo::Fornecedor),
                _ => None,
            },
            [lista, indice, folha] => {
                let indice: usize = indice.parse().ok()?;
                match Lista::from_nome(lista)? {
                    Lista::NotasFiscais => {
                        CampoNotaFiscal::from_nome(folha).map(|c| Campo::NotaFiscal(indice, c))
                    }
                    Lista::BeneficiosFiscais => {
                        CampoBeneficio::from_nome(folha).map(|c| Campo::BeneficioFiscal(indice, c))
                    }
                    Lista::HistoricoClassificacao => CampoHistorico::from_nome(folha)
                        .map(|c| Campo::HistoricoClassificacao(indice, c)),
                }
            }
            _ => None,
        }
    }

    pub fn tipo(&self) -> TipoCampo {
        match self {
            Campo::Icms(CampoIcms::SubstituicaoTributaria)
            | Campo::PisCofins(CampoPisCofins::PodeGerarCredito) => TipoCampo::Booleano,
            _ => TipoCampo::Texto,
        }
    }
}

impl fmt::Display for Campo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.caminho("."))
    }
}

impl FromStr for Campo {
    type Err = FormularioError;

    /// Aceita `icms.aliquota`, `icms-aliquota` e `notasFiscais[0].numero`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalido = || FormularioError::CaminhoInvalido {
            caminho: s.to_string(),
        };

        let caminho = s.trim();
        if !RE_CAMINHO_CAMPO.is_match(caminho) {
            return Err(invalido());
        }

        let segmentos: Vec<&str> = RE_SEPARADOR_CAMINHO
            .split(caminho)
            .filter(|segmento| !segmento.is_empty())
            .collect();

        Campo::from_segmentos(&segmentos).ok_or_else(invalido)
    }
}

impl Serialize for Campo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Valor a gravar numa folha. `Nenhum` desfaz uma folha opcional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Valor {
    Texto(String),
    Booleano(bool),
    Nenhum,
}

impl From<&str> for Valor {
    fn from(texto: &str) -> Self {
        Valor::Texto(texto.to_string())
    }
}

impl From<String> for Valor {
    fn from(texto: String) -> Self {
        Valor::Texto(texto)
    }
}

impl From<bool> for Valor {
    fn from(b: bool) -> Self {
        Valor::Booleano(b)
    }
}

impl Valor {
    /// Converte o texto bruto (linha de comando) conforme o tipo do campo.
    pub fn interpretar(campo: &Campo, bruto: &str) -> FormularioResult<Valor> {
        match campo.tipo() {
            TipoCampo::Texto => Ok(Valor::Texto(bruto.to_string())),
            TipoCampo::Booleano => match bruto.trim().to_lowercase().as_str() {
                "true" | "sim" | "s" | "1" => Ok(Valor::Booleano(true)),
                "false" | "não" | "nao" | "n" | "0" => Ok(Valor::Booleano(false)),
                "" => Ok(Valor::Nenhum),
                _ => Err(incompativel(campo)),
            },
        }
    }
}

/// Leitura emprestada de uma folha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValorCampo<'a> {
    Texto(&'a str),
    Booleano(bool),
}

impl<'a> ValorCampo<'a> {
    pub fn texto(&self) -> Option<&'a str> {
        match *self {
            ValorCampo::Texto(s) => Some(s),
            ValorCampo::Booleano(_) => None,
        }
    }
}

fn incompativel(campo: &Campo) -> FormularioError {
    FormularioError::ValorIncompativel {
        campo: campo.to_string(),
        esperado: campo.tipo(),
    }
}

fn obrigatorio(campo: &Campo, valor: Valor) -> FormularioResult<String> {
    match valor {
        Valor::Texto(s) => Ok(s),
        Valor::Nenhum => Err(FormularioError::CampoObrigatorio {
            campo: campo.to_string(),
        }),
        Valor::Booleano(_) => Err(incompativel(campo)),
    }
}

fn opcional(campo: &Campo, valor: Valor) -> FormularioResult<Option<String>> {
    match valor {
        Valor::Texto(s) => Ok(Some(s)),
        Valor::Nenhum => Ok(None),
        Valor::Booleano(_) => Err(incompativel(campo)),
    }
}

fn booleano(campo: &Campo, valor: Valor) -> FormularioResult<Option<bool>> {
    match valor {
        Valor::Booleano(b) => Ok(Some(b)),
        Valor::Nenhum => Ok(None),
        Valor::Texto(_) => Err(incompativel(campo)),
    }
}

impl ProdutoFiscal {
    /// Lê a folha endereçada. `None` para folha opcional vazia, objeto opcional
    /// ausente ou elemento de lista inexistente.
    pub fn ler(&self, campo: &Campo) -> Option<ValorCampo<'_>> {
        use ValorCampo::{Booleano, Texto};

        match *campo {
            Campo::Descricao => Some(Texto(&self.descricao)),
            Campo::Ncm => Some(Texto(&self.ncm)),
            Campo::UnidadeMedida => Some(Texto(&self.unidade_medida)),
            Campo::Categoria => self.categoria.as_deref().map(Texto),
            Campo::Subcategoria => self.subcategoria.as_deref().map(Texto),
            Campo::Gtin => self.gtin.as_deref().map(Texto),
            Campo::Cest => self.cest.as_deref().map(Texto),
            Campo::PrecoCompra => Some(Texto(&self.preco_compra)),
            Campo::PrecoVenda => Some(Texto(&self.preco_venda)),
            Campo::Icms(c) => {
                let icms = &self.icms;
                match c {
                    CampoIcms::Aliquota => Some(Texto(&icms.aliquota)),
                    CampoIcms::OrigemEstado => Some(Texto(&icms.origem_estado)),
                    CampoIcms::DestinoEstado => Some(Texto(&icms.destino_estado)),
                    CampoIcms::RegimeTributario => Some(Texto(&icms.regime_tributario)),
                    CampoIcms::ReducaoBaseCalculo => {
                        icms.reducao_base_calculo.as_deref().map(Texto)
                    }
                    CampoIcms::SubstituicaoTributaria => icms.substituicao_tributaria.map(Booleano),
                }
            }
            Campo::Ipi(c) => {
                let ipi = self.ipi.as_ref()?;
                match c {
                    CampoIpi::CodigoTipi => ipi.codigo_tipi.as_deref().map(Texto),
                    CampoIpi::Aliquota => ipi.aliquota.as_deref().map(Texto),
                }
            }
            Campo::PisCofins(c) => {
                let pc = &self.pis_cofins;
                match c {
                    CampoPisCofins::RegimeApuracao => Some(Texto(&pc.regime_apuracao)),
                    CampoPisCofins::PisAliquota => Some(Texto(&pc.pis_aliquota)),
                    CampoPisCofins::CofinsAliquota => Some(Texto(&pc.cofins_aliquota)),
                    CampoPisCofins::PodeGerarCredito => pc.pode_gerar_credito.map(Booleano),
                }
            }
            Campo::Iss(c) => {
                let iss = self.iss.as_ref()?;
                match c {
                    CampoIss::Aliquota => iss.aliquota.as_deref().map(Texto),
                    CampoIss::Municipio => iss.municipio.as_deref().map(Texto),
                }
            }
            Campo::Fornecedor(c) => {
                let f = &self.fornecedor;
                match c {
                    CampoFornecedor::Nome => Some(Texto(&f.nome)),
                    CampoFornecedor::Cnpj => Some(Texto(&f.cnpj)),
                    CampoFornecedor::Estado => Some(Texto(&f.estado)),
                }
            }
            Campo::NotaFiscal(i, c) => {
                let nota = self.notas_fiscais.get(i)?;
                Some(Texto(match c {
                    CampoNotaFiscal::Numero => nota.numero.as_str(),
                    CampoNotaFiscal::DataEmissao => nota.data_emissao.as_str(),
                    CampoNotaFiscal::ValorTotal => nota.valor_total.as_str(),
                }))
            }
            Campo::BeneficioFiscal(i, c) => {
                let beneficio = self.beneficios_fiscais.get(i)?;
                Some(Texto(match c {
                    CampoBeneficio::Tipo => beneficio.tipo.as_str(),
                    CampoBeneficio::Descricao => beneficio.descricao.as_str(),
                    CampoBeneficio::EstadoAplicavel => beneficio.estado_aplicavel.as_str(),
                }))
            }
            Campo::HistoricoClassificacao(i, c) => {
                let historico = self.historico_classificacao.get(i)?;
                Some(Texto(match c {
                    CampoHistorico::NcmAnterior => historico.ncm_anterior.as_str(),
                    CampoHistorico::DataAlteracao => historico.data_alteracao.as_str(),
                    CampoHistorico::Motivo => historico.motivo.as_str(),
                }))
            }
        }
    }

    /// Grava somente a folha endereçada; os irmãos em todos os níveis ficam intactos.
    ///
    /// O valor é convertido antes de qualquer mutação: em caso de erro o produto
    /// não é alterado. Gravar dentro de `ipi` ou `iss` ausentes cria o objeto vazio.
    pub fn escrever(&mut self, campo: &Campo, valor: Valor) -> FormularioResult<()> {
        match *campo {
            Campo::Descricao => self.descricao = obrigatorio(campo, valor)?,
            Campo::Ncm => self.ncm = obrigatorio(campo, valor)?,
            Campo::UnidadeMedida => self.unidade_medida = obrigatorio(campo, valor)?,
            Campo::Categoria => self.categoria = opcional(campo, valor)?,
            Campo::Subcategoria => self.subcategoria = opcional(campo, valor)?,
            Campo::Gtin => self.gtin = opcional(campo, valor)?,
            Campo::Cest => self.cest = opcional(campo, valor)?,
            Campo::PrecoCompra => self.preco_compra = obrigatorio(campo, valor)?,
            Campo::PrecoVenda => self.preco_venda = obrigatorio(campo, valor)?,
            Campo::Icms(c) => match c {
                CampoIcms::Aliquota => self.icms.aliquota = obrigatorio(campo, valor)?,
                CampoIcms::OrigemEstado => self.icms.origem_estado = obrigatorio(campo, valor)?,
                CampoIcms::DestinoEstado => self.icms.destino_estado = obrigatorio(campo, valor)?,
                CampoIcms::RegimeTributario => {
                    self.icms.regime_tributario = obrigatorio(campo, valor)?
                }
                CampoIcms::ReducaoBaseCalculo => {
                    self.icms.reducao_base_calculo = opcional(campo, valor)?
                }
                CampoIcms::SubstituicaoTributaria => {
                    self.icms.substituicao_tributaria = booleano(campo, valor)?
                }
            },
            Campo::Ipi(c) => {
                let novo = opcional(campo, valor)?;
                let ipi = self.ipi.get_or_insert_with(Ipi::default);
                match c {
                    CampoIpi::CodigoTipi => ipi.codigo_tipi = novo,
                    CampoIpi::Aliquota => ipi.aliquota = novo,
                }
            }
            Campo::PisCofins(c) => match c {
                CampoPisCofins::RegimeApuracao => {
                    self.pis_cofins.regime_apuracao = obrigatorio(campo, valor)?
                }
                CampoPisCofins::PisAliquota => {
                    self.pis_cofins.pis_aliquota = obrigatorio(campo, valor)?
                }
                CampoPisCofins::CofinsAliquota => {
                    self.pis_cofins.cofins_aliquota = obrigatorio(campo, valor)?
                }
                CampoPisCofins::PodeGerarCredito => {
                    self.pis_cofins.pode_gerar_credito = booleano(campo, valor)?
                }
            },
            Campo::Iss(c) => {
                let novo = opcional(campo, valor)?;
                let iss = self.iss.get_or_insert_with(Iss::default);
                match c {
                    CampoIss::Aliquota => iss.aliquota = novo,
                    CampoIss::Municipio => iss.municipio = novo,
                }
            }
            Campo::Fornecedor(c) => {
                let novo = obrigatorio(campo, valor)?;
                match c {
                    CampoFornecedor::Nome => self.fornecedor.nome = novo,
                    CampoFornecedor::Cnpj => self.fornecedor.cnpj = novo,
                    CampoFornecedor::Estado => self.fornecedor.estado = novo,
                }
            }
            Campo::NotaFiscal(i, c) => {
                let novo = obrigatorio(campo, valor)?;
                let tamanho = self.notas_fiscais.len();
                let nota = self
                    .notas_fiscais
                    .get_mut(i)
                    .ok_or_else(|| fora_do_intervalo(Lista::NotasFiscais, i, tamanho))?;
                match c {
                    CampoNotaFiscal::Numero => nota.numero = novo,
                    CampoNotaFiscal::DataEmissao => nota.data_emissao = novo,
                    CampoNotaFiscal::ValorTotal => nota.valor_total = novo,
                }
            }
            Campo::BeneficioFiscal(i, c) => {
                let novo = obrigatorio(campo, valor)?;
                let tamanho = self.beneficios_fiscais.len();
                let beneficio = self
                    .beneficios_fiscais
                    .get_mut(i)
                    .ok_or_else(|| fora_do_intervalo(Lista::BeneficiosFiscais, i, tamanho))?;
                match c {
                    CampoBeneficio::Tipo => beneficio.tipo = novo,
                    CampoBeneficio::Descricao => beneficio.descricao = novo,
                    CampoBeneficio::EstadoAplicavel => beneficio.estado_aplicavel = novo,
                }
            }
            Campo::HistoricoClassificacao(i, c) => {
                let novo = obrigatorio(campo, valor)?;
                let tamanho = self.historico_classificacao.len();
                let historico = self
                    .historico_classificacao
                    .get_mut(i)
                    .ok_or_else(|| fora_do_intervalo(Lista::HistoricoClassificacao, i, tamanho))?;
                match c {
                    CampoHistorico::NcmAnterior => historico.ncm_anterior = novo,
                    CampoHistorico::DataAlteracao => historico.data_alteracao = novo,
                    CampoHistorico::Motivo => historico.motivo = novo,
                }
            }
        }

        Ok(())
    }
}

pub(crate) fn fora_do_intervalo(lista: Lista, indice: usize, tamanho: usize) -> FormularioError {
    FormularioError::IndiceForaDoIntervalo {
        lista,
        indice,
        tamanho,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotaFiscal;

    #[test]
    fn aceita_as_tres_grafias_de_caminho() {
        let esperado = Campo::BeneficioFiscal(1, CampoBeneficio::EstadoAplicavel);

        for caminho in [
            "beneficiosFiscais.1.estadoAplicavel",
            "beneficiosFiscais-1-estadoAplicavel",
            "beneficiosFiscais[1].estadoAplicavel",
        ] {
            assert_eq!(caminho.parse::<Campo>(), Ok(esperado), "caminho: {caminho}");
        }

        assert_eq!("precoVenda".parse::<Campo>(), Ok(Campo::PrecoVenda));
        assert_eq!(
            "fornecedor.cnpj".parse::<Campo>(),
            Ok(Campo::Fornecedor(CampoFornecedor::Cnpj))
        );
    }

    #[test]
    fn rejeita_caminhos_desconhecidos() {
        for caminho in [
            "",
            "icms",
            "icms.aliquotas",
            "fornecedor.nome.extra",
            "notasFiscais.x.numero",
            "notasFiscais.0",
            "id",
            "icms..aliquota!",
        ] {
            assert!(caminho.parse::<Campo>().is_err(), "caminho: {caminho}");
        }
    }

    #[test]
    fn segmentos_por_profundidade() {
        assert_eq!(Campo::Ncm.segmentos(), vec!["ncm"]);
        assert_eq!(
            Campo::PisCofins(CampoPisCofins::PisAliquota).caminho("-"),
            "pisCofins-pisAliquota"
        );
        assert_eq!(
            Campo::HistoricoClassificacao(3, CampoHistorico::Motivo).to_string(),
            "historicoClassificacao.3.motivo"
        );
    }

    #[test]
    fn escrita_aninhada_preserva_irmaos() {
        let mut produto = ProdutoFiscal::novo("1");
        let antes = produto.clone();

        produto
            .escrever(&Campo::Icms(CampoIcms::OrigemEstado), "RJ".into())
            .unwrap();

        assert_eq!(produto.icms.origem_estado, "RJ");
        assert_eq!(produto.icms.aliquota, antes.icms.aliquota);
        assert_eq!(produto.icms.destino_estado, antes.icms.destino_estado);
        assert_eq!(produto.icms.regime_tributario, antes.icms.regime_tributario);
        assert_eq!(produto.pis_cofins, antes.pis_cofins);
        assert_eq!(produto.fornecedor, antes.fornecedor);
    }

    #[test]
    fn escrita_em_objeto_opcional_ausente_cria_o_objeto() {
        let mut produto = ProdutoFiscal::novo("1");

        produto.escrever(&Campo::Ipi(CampoIpi::Aliquota), "5".into()).unwrap();

        let ipi = produto.ipi.as_ref().unwrap();
        assert_eq!(ipi.aliquota.as_deref(), Some("5"));
        assert_eq!(ipi.codigo_tipi, None);
        assert_eq!(
            produto.ler(&Campo::Ipi(CampoIpi::Aliquota)),
            Some(ValorCampo::Texto("5"))
        );
    }

    #[test]
    fn erro_de_escrita_nao_altera_o_produto() {
        let mut produto = ProdutoFiscal::novo("1");
        let antes = produto.clone();

        let erro = produto.escrever(&Campo::Iss(CampoIss::Municipio), Valor::Booleano(true));
        assert!(matches!(erro, Err(FormularioError::ValorIncompativel { .. })));

        let erro = produto.escrever(&Campo::Descricao, Valor::Nenhum);
        assert!(matches!(erro, Err(FormularioError::CampoObrigatorio { .. })));

        let erro = produto.escrever(&Campo::NotaFiscal(0, CampoNotaFiscal::Numero), "1".into());
        assert!(matches!(
            erro,
            Err(FormularioError::IndiceForaDoIntervalo { indice: 0, tamanho: 0, .. })
        ));

        assert_eq!(produto, antes);
    }

    #[test]
    fn escrita_em_elemento_de_lista() {
        let mut produto = ProdutoFiscal::novo("1");
        produto.notas_fiscais.push(NotaFiscal::default());
        produto.notas_fiscais.push(NotaFiscal::default());

        produto
            .escrever(&Campo::NotaFiscal(1, CampoNotaFiscal::ValorTotal), "99.90".into())
            .unwrap();

        assert_eq!(produto.notas_fiscais[0], NotaFiscal::default());
        assert_eq!(produto.notas_fiscais[1].valor_total, "99.90");
    }

    #[test]
    fn interpreta_booleano_pelo_tipo_do_campo() {
        let st = Campo::Icms(CampoIcms::SubstituicaoTributaria);

        assert_eq!(Valor::interpretar(&st, "sim"), Ok(Valor::Booleano(true)));
        assert_eq!(Valor::interpretar(&st, "0"), Ok(Valor::Booleano(false)));
        assert_eq!(Valor::interpretar(&st, ""), Ok(Valor::Nenhum));
        assert!(Valor::interpretar(&st, "talvez").is_err());
        assert_eq!(
            Valor::interpretar(&Campo::Ncm, "true"),
            Ok(Valor::Texto("true".to_string()))
        );
    }
}
