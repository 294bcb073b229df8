//! Esquema declarativo do `ProdutoFiscal`.
//!
//! Cada folha com restrição aparece numa tabela estática que associa o campo à
//! sua `Restricao`. Folhas opcionais não aparecem nas tabelas. Objetos opcionais
//! ausentes são ignorados; listas contribuem com uma passagem por elemento.

use serde::Serialize;

use crate::{
    Campo, CampoBeneficio, CampoFornecedor, CampoHistorico, CampoIcms, CampoIpi, CampoIss,
    CampoNotaFiscal, CampoPisCofins, ESTADOS, ProdutoFiscal, RegimeApuracao, RegimeTributario,
    TipoBeneficio,
};

/// Restrição de uma folha de texto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restricao {
    /// Texto não vazio depois do `trim`.
    Obrigatorio(&'static str),
    /// Texto obrigatório e pertencente a um conjunto fechado.
    Enumeracao {
        valores: &'static [&'static str],
        obrigatorio: &'static str,
        invalido: &'static str,
    },
}

impl Restricao {
    /// Verifica o texto (ausente = vazio) e devolve a mensagem de violação, se houver.
    /// Um campo produz no máximo uma violação por passagem.
    pub fn verificar(&self, texto: Option<&str>) -> Option<String> {
        let texto = texto.map(str::trim).unwrap_or_default();

        match *self {
            Restricao::Obrigatorio(mensagem) => texto.is_empty().then(|| mensagem.to_string()),
            Restricao::Enumeracao {
                valores,
                obrigatorio,
                invalido,
            } => {
                if texto.is_empty() {
                    Some(obrigatorio.to_string())
                } else if !valores.contains(&texto) {
                    Some(format!("{invalido}: {texto}"))
                } else {
                    None
                }
            }
        }
    }
}

const UFS: &[&str] = &ESTADOS;

const fn estado(obrigatorio: &'static str, invalido: &'static str) -> Restricao {
    Restricao::Enumeracao {
        valores: UFS,
        obrigatorio,
        invalido,
    }
}

/// Folhas do produto e dos seus objetos obrigatórios (icms, pisCofins, fornecedor).
pub const REGRAS_PRODUTO: &[(Campo, Restricao)] = &[
    (
        Campo::Descricao,
        Restricao::Obrigatorio("Descrição do produto é obrigatória"),
    ),
    (Campo::Ncm, Restricao::Obrigatorio("Código NCM é obrigatório")),
    (
        Campo::UnidadeMedida,
        Restricao::Obrigatorio("Unidade de medida é obrigatória"),
    ),
    (
        Campo::Icms(CampoIcms::Aliquota),
        Restricao::Obrigatorio("Alíquota ICMS é obrigatória"),
    ),
    (
        Campo::Icms(CampoIcms::OrigemEstado),
        estado("Estado de origem é obrigatório", "Estado de origem inválido"),
    ),
    (
        Campo::Icms(CampoIcms::DestinoEstado),
        estado("Estado de destino é obrigatório", "Estado de destino inválido"),
    ),
    (
        Campo::Icms(CampoIcms::RegimeTributario),
        Restricao::Enumeracao {
            valores: RegimeTributario::VALORES,
            obrigatorio: "Regime tributário é obrigatório",
            invalido: "Regime tributário inválido",
        },
    ),
    (
        Campo::PisCofins(CampoPisCofins::RegimeApuracao),
        Restricao::Enumeracao {
            valores: RegimeApuracao::VALORES,
            obrigatorio: "Regime de apuração é obrigatório",
            invalido: "Regime de apuração inválido",
        },
    ),
    (
        Campo::PisCofins(CampoPisCofins::PisAliquota),
        Restricao::Obrigatorio("Alíquota PIS é obrigatória"),
    ),
    (
        Campo::PisCofins(CampoPisCofins::CofinsAliquota),
        Restricao::Obrigatorio("Alíquota COFINS é obrigatória"),
    ),
    (
        Campo::PrecoCompra,
        Restricao::Obrigatorio("Preço de compra é obrigatório"),
    ),
    (
        Campo::PrecoVenda,
        Restricao::Obrigatorio("Preço de venda é obrigatório"),
    ),
    (
        Campo::Fornecedor(CampoFornecedor::Nome),
        Restricao::Obrigatorio("Nome do fornecedor é obrigatório"),
    ),
    (
        Campo::Fornecedor(CampoFornecedor::Cnpj),
        Restricao::Obrigatorio("CNPJ do fornecedor é obrigatório"),
    ),
    (
        Campo::Fornecedor(CampoFornecedor::Estado),
        estado("Estado do fornecedor é obrigatório", "Estado do fornecedor inválido"),
    ),
];

// Objetos opcionais: todas as folhas são opcionais.
pub const REGRAS_IPI: &[(CampoIpi, Restricao)] = &[];
pub const REGRAS_ISS: &[(CampoIss, Restricao)] = &[];

// Elementos de lista: folhas de texto livre, vazio aceito. Só o tipo do
// benefício tem conjunto fechado.
pub const REGRAS_NOTA_FISCAL: &[(CampoNotaFiscal, Restricao)] = &[];
pub const REGRAS_HISTORICO: &[(CampoHistorico, Restricao)] = &[];

pub const REGRAS_BENEFICIO: &[(CampoBeneficio, Restricao)] = &[(
    CampoBeneficio::Tipo,
    Restricao::Enumeracao {
        valores: TipoBeneficio::VALORES,
        obrigatorio: "Tipo de benefício fiscal é obrigatório",
        invalido: "Tipo de benefício fiscal inválido",
    },
)];

/// Violação de uma restrição do esquema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violacao {
    pub campo: Campo,
    pub mensagem: String,
}

/// Aplica o esquema a um produto.
///
/// Não tem efeitos colaterais e nunca entra em pânico: campos ausentes ou
/// malformados apenas geram violações. A ordem do resultado segue as tabelas,
/// e as listas vêm por último, elemento a elemento.
///
/// ```
/// use formulario_produtos_fiscais::{validar_produto, Campo, ProdutoFiscal};
///
/// let violacoes = validar_produto(&ProdutoFiscal::novo("1"));
/// let campos: Vec<String> = violacoes.iter().map(|v| v.campo.to_string()).collect();
///
/// assert_eq!(campos, ["descricao", "ncm", "fornecedor.nome", "fornecedor.cnpj"]);
/// ```
pub fn validar_produto(produto: &ProdutoFiscal) -> Vec<Violacao> {
    let mut violacoes = Vec::new();

    aplicar(produto, REGRAS_PRODUTO.iter().copied(), &mut violacoes);

    if produto.ipi.is_some() {
        let regras = REGRAS_IPI.iter().map(|&(c, r)| (Campo::Ipi(c), r));
        aplicar(produto, regras, &mut violacoes);
    }

    if produto.iss.is_some() {
        let regras = REGRAS_ISS.iter().map(|&(c, r)| (Campo::Iss(c), r));
        aplicar(produto, regras, &mut violacoes);
    }

    for i in 0..produto.notas_fiscais.len() {
        let regras = REGRAS_NOTA_FISCAL
            .iter()
            .map(|&(c, r)| (Campo::NotaFiscal(i, c), r));
        aplicar(produto, regras, &mut violacoes);
    }

    for i in 0..produto.beneficios_fiscais.len() {
        let regras = REGRAS_BENEFICIO
            .iter()
            .map(|&(c, r)| (Campo::BeneficioFiscal(i, c), r));
        aplicar(produto, regras, &mut violacoes);
    }

    for i in 0..produto.historico_classificacao.len() {
        let regras = REGRAS_HISTORICO
            .iter()
            .map(|&(c, r)| (Campo::HistoricoClassificacao(i, c), r));
        aplicar(produto, regras, &mut violacoes);
    }

    violacoes
}

fn aplicar(
    produto: &ProdutoFiscal,
    regras: impl Iterator<Item = (Campo, Restricao)>,
    violacoes: &mut Vec<Violacao>,
) {
    violacoes.extend(regras.filter_map(|(campo, restricao)| {
        let texto = produto.ler(&campo).and_then(|valor| valor.texto());
        restricao
            .verificar(texto)
            .map(|mensagem| Violacao { campo, mensagem })
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BeneficioFiscal, HistoricoClassificacao, Ipi, Iss, NotaFiscal};

    fn produto_valido() -> ProdutoFiscal {
        let mut produto = ProdutoFiscal::novo("1");
        produto.descricao = "Parafuso sextavado".to_string();
        produto.ncm = "7318.15.00".to_string();
        produto.fornecedor.nome = "Metalúrgica Paulista".to_string();
        produto.fornecedor.cnpj = "12.345.678/0001-90".to_string();
        produto
    }

    #[test]
    fn produto_preenchido_nao_tem_violacoes() {
        assert!(validar_produto(&produto_valido()).is_empty());
    }

    #[test]
    fn espacos_nao_preenchem_campo_obrigatorio() {
        let mut produto = produto_valido();
        produto.descricao = "   ".to_string();

        let violacoes = validar_produto(&produto);
        assert_eq!(
            violacoes,
            vec![Violacao {
                campo: Campo::Descricao,
                mensagem: "Descrição do produto é obrigatória".to_string(),
            }]
        );
    }

    #[test]
    fn estado_fora_da_lista_gera_uma_unica_violacao() {
        let mut produto = produto_valido();
        produto.icms.origem_estado = "XX".to_string();

        let violacoes = validar_produto(&produto);
        assert_eq!(violacoes.len(), 1);
        assert_eq!(violacoes[0].campo, Campo::Icms(CampoIcms::OrigemEstado));
        assert_eq!(violacoes[0].mensagem, "Estado de origem inválido: XX");

        produto.icms.origem_estado.clear();
        let violacoes = validar_produto(&produto);
        assert_eq!(violacoes.len(), 1);
        assert_eq!(violacoes[0].mensagem, "Estado de origem é obrigatório");
    }

    #[test]
    fn regime_fora_do_conjunto_e_violacao() {
        let mut produto = produto_valido();
        produto.icms.regime_tributario = "Lucro Imaginário".to_string();
        produto.pis_cofins.regime_apuracao = "Não Cumulativo".to_string();

        let violacoes = validar_produto(&produto);
        assert_eq!(violacoes.len(), 1);
        assert_eq!(violacoes[0].campo, Campo::Icms(CampoIcms::RegimeTributario));
    }

    #[test]
    fn objetos_opcionais_parciais_nao_sao_sinalizados() {
        let mut produto = produto_valido();
        produto.ipi = Some(Ipi {
            codigo_tipi: None,
            aliquota: Some("5".to_string()),
        });
        produto.iss = Some(Iss::default());

        assert!(validar_produto(&produto).is_empty());
    }

    #[test]
    fn listas_validam_cada_elemento_com_seu_indice() {
        let mut produto = produto_valido();
        produto.beneficios_fiscais = vec![
            BeneficioFiscal {
                tipo: "Diferimento".to_string(),
                descricao: "Diferimento parcial".to_string(),
                estado_aplicavel: "ZZ".to_string(),
            },
            BeneficioFiscal::default(),
            BeneficioFiscal {
                tipo: "Anistia".to_string(),
                ..Default::default()
            },
        ];

        let violacoes = validar_produto(&produto);
        let campos: Vec<Campo> = violacoes.iter().map(|v| v.campo).collect();

        assert_eq!(
            campos,
            vec![
                Campo::BeneficioFiscal(1, CampoBeneficio::Tipo),
                Campo::BeneficioFiscal(2, CampoBeneficio::Tipo),
            ]
        );
        assert_eq!(violacoes[0].mensagem, "Tipo de benefício fiscal é obrigatório");
        assert_eq!(violacoes[1].mensagem, "Tipo de benefício fiscal inválido: Anistia");
    }

    #[test]
    fn elementos_em_branco_sao_aceitos() {
        let mut produto = produto_valido();
        produto.notas_fiscais = vec![NotaFiscal::default()];
        produto.historico_classificacao = vec![HistoricoClassificacao::default()];
        produto.beneficios_fiscais = vec![BeneficioFiscal {
            tipo: "Isenção".to_string(),
            descricao: String::new(),
            estado_aplicavel: "Todos".to_string(),
        }];

        assert!(validar_produto(&produto).is_empty());
    }

    #[test]
    fn validacao_e_idempotente() {
        let produto = ProdutoFiscal::novo("7");
        assert_eq!(validar_produto(&produto), validar_produto(&produto));
    }
}
