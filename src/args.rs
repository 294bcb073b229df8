use clap::Parser;
use std::{str::FromStr, time::Duration};

use crate::{Campo, FormularioError, FormularioResult, MotorFormulario, RE_ATRIBUICAO, Valor};

/// Senha aceita pelo formulário público de demonstração.
pub const SENHA_DEMONSTRACAO: &str = "123456";

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Clear screen
    #[arg(short, long, default_value_t = false)]
    clear: bool,

    /// Id do cliente selecionado no painel (fluxo autenticado)
    #[arg(long, default_value = "1", conflicts_with = "token")]
    cliente: String,

    /// Token do link público enviado ao fornecedor
    #[arg(short, long)]
    token: Option<String>,

    /// Senha de acesso do formulário público
    #[arg(short, long, requires = "token")]
    senha: Option<String>,

    /// Quantidade de produtos a adicionar
    #[arg(short = 'n', long, default_value_t = 1)]
    produtos: usize,

    /// Atribuição de campo (repetível).
    ///
    /// Exemplos:
    ///
    /// - `-S '0:descricao=Parafuso sextavado'`
    ///
    /// - `-S 0:icms.origemEstado=RJ`
    ///
    /// - `-S 1:icms.substituicaoTributaria=sim`
    #[arg(short = 'S', long = "set", value_name = "INDICE:CAMINHO=VALOR")]
    atribuicoes: Vec<String>,

    /// Enviar o formulário ao final
    #[arg(short, long, default_value_t = false)]
    enviar: bool,

    /// Latência simulada do envio (milissegundos)
    #[arg(long, default_value_t = 1500)]
    latencia_ms: u64,

    /// Imprimir o relatório também em JSON
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entrada {
    Painel { cliente: String },
    Publico { token: String, senha: String },
}

/// `<índice>:<caminho>=<valor>` já interpretado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atribuicao {
    pub indice: usize,
    pub campo: Campo,
    pub valor: String,
}

impl FromStr for Atribuicao {
    type Err = FormularioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = RE_ATRIBUICAO.captures(s).ok_or_else(|| {
            FormularioError::Config(format!(
                "atribuição inválida <{s}>: esperado INDICE:CAMINHO=VALOR"
            ))
        })?;

        let indice = captures[1]
            .parse::<usize>()
            .map_err(|e| FormularioError::Config(format!("índice inválido em <{s}>: {e}")))?;
        let campo: Campo = captures[2].parse()?;

        Ok(Atribuicao {
            indice,
            campo,
            valor: captures[3].to_string(),
        })
    }
}

#[derive(Debug)]
pub struct Config {
    pub clear: bool,
    pub verbose: bool,
    pub json: bool,
    pub enviar: bool,
    pub entrada: Entrada,
    pub produtos: usize,
    pub atribuicoes: Vec<Atribuicao>,
    pub latencia: Duration,
}

pub fn get_config() -> FormularioResult<Config> {
    let args = Arguments::parse();

    let entrada = match args.token {
        Some(token) => {
            let senha = args.senha.ok_or_else(|| {
                FormularioError::Config("informe --senha para abrir o formulário público".into())
            })?;
            Entrada::Publico { token, senha }
        }
        None => Entrada::Painel {
            cliente: args.cliente,
        },
    };

    // Conversão funcional: o primeiro erro interrompe a coleta
    let atribuicoes = args
        .atribuicoes
        .iter()
        .map(|bruto| bruto.parse::<Atribuicao>())
        .collect::<FormularioResult<Vec<_>>>()?;

    Ok(Config {
        clear: args.clear,
        verbose: args.verbose,
        json: args.json,
        enviar: args.enviar,
        entrada,
        produtos: args.produtos,
        atribuicoes,
        latencia: Duration::from_millis(args.latencia_ms),
    })
}

/// Abre o formulário pela entrada configurada (painel ou link público).
pub fn abrir_formulario(entrada: &Entrada) -> FormularioResult<MotorFormulario> {
    match entrada {
        Entrada::Painel { cliente } => MotorFormulario::autenticado(cliente),
        Entrada::Publico { token, senha } => {
            let mut motor = MotorFormulario::publico(token, SENHA_DEMONSTRACAO)?;
            motor.autenticar(senha)?;
            Ok(motor)
        }
    }
}

/// Aplica as atribuições na ordem dada, endereçando o produto pela posição.
pub fn aplicar_atribuicoes(
    motor: &mut MotorFormulario,
    atribuicoes: &[Atribuicao],
) -> FormularioResult<()> {
    for atribuicao in atribuicoes {
        let id = motor
            .produtos()
            .get(atribuicao.indice)
            .map(|produto| produto.id.clone())
            .ok_or_else(|| {
                FormularioError::Config(format!(
                    "produto de índice {} inexistente ({} produto(s) no formulário)",
                    atribuicao.indice,
                    motor.produtos().len()
                ))
            })?;

        let valor = Valor::interpretar(&atribuicao.campo, &atribuicao.valor)?;
        motor.atualizar_campo(&id, &atribuicao.campo, valor)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CampoIcms, CampoNotaFiscal};

    #[test]
    fn interpreta_atribuicao() {
        let atribuicao: Atribuicao = "1:icms.origemEstado=RJ".parse().unwrap();
        assert_eq!(
            atribuicao,
            Atribuicao {
                indice: 1,
                campo: Campo::Icms(CampoIcms::OrigemEstado),
                valor: "RJ".to_string(),
            }
        );

        let atribuicao: Atribuicao = " 0 : notasFiscais[2].numero = 001".parse().unwrap();
        assert_eq!(atribuicao.campo, Campo::NotaFiscal(2, CampoNotaFiscal::Numero));
        assert_eq!(atribuicao.valor, " 001");

        let atribuicao: Atribuicao = "0:descricao=".parse().unwrap();
        assert_eq!(atribuicao.valor, "");
    }

    #[test]
    fn rejeita_atribuicao_malformada() {
        assert!(matches!(
            "descricao=x".parse::<Atribuicao>(),
            Err(FormularioError::Config(_))
        ));
        assert!(matches!(
            "0:icms.nada=x".parse::<Atribuicao>(),
            Err(FormularioError::CaminhoInvalido { .. })
        ));
    }

    #[test]
    fn entrada_publica_usa_senha_de_demonstracao() {
        let entrada = Entrada::Publico {
            token: "abc".to_string(),
            senha: "errada".to_string(),
        };
        assert_eq!(
            abrir_formulario(&entrada).err(),
            Some(FormularioError::SenhaIncorreta)
        );

        let entrada = Entrada::Publico {
            token: "abc".to_string(),
            senha: SENHA_DEMONSTRACAO.to_string(),
        };
        assert!(abrir_formulario(&entrada).unwrap().liberado());
    }

    #[test]
    fn atribuicoes_por_posicao() {
        let mut motor = abrir_formulario(&Entrada::Painel {
            cliente: "1".to_string(),
        })
        .unwrap();
        motor.adicionar_produto().unwrap();

        let atribuicoes: [Atribuicao; 2] = [
            "0:descricao=Mouse".parse().unwrap(),
            "0:icms.substituicaoTributaria=não".parse().unwrap(),
        ];
        aplicar_atribuicoes(&mut motor, &atribuicoes).unwrap();

        let produto = &motor.produtos()[0];
        assert_eq!(produto.descricao, "Mouse");
        assert_eq!(produto.icms.substituicao_tributaria, Some(false));

        let fora: Atribuicao = "3:ncm=1".parse().unwrap();
        assert!(matches!(
            aplicar_atribuicoes(&mut motor, &[fora]),
            Err(FormularioError::Config(_))
        ));
    }
}
