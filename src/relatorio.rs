use serde::Serialize;
use std::{process::Command, sync::Arc};

use crate::{
    Aba, Cliente, EstadoEnvio, FormularioResult, MotorFormulario, ProdutoFiscal, ResultadoEnvio,
    ResultadoValidacao, ValidadeAbas, get_nome_do_estado,
};

/// Limpar a tela.
pub fn clear_screen(clear_screen: bool) -> FormularioResult<()> {
    if clear_screen {
        if cfg!(target_os = "windows") {
            // No Windows, 'cls' é um comando interno do 'cmd'.
            Command::new("cmd").args(["/c", "cls"]).status()?;
        } else {
            Command::new("clear").status()?;
        }
    }

    Ok(())
}

/// Exibe a descrição e a versão do programa.
pub fn imprimir_versao_do_programa() {
    let descr = [
        "Este programa simula o formulário de produtos fiscais enviado para análise de NCM.",
        "Cada produto reúne identificação, dados fiscais (ICMS, IPI, PIS/COFINS, ISS) e dados comerciais.",
        "A cada alteração o formulário é validado por completo e os erros são agrupados por aba.",
        "O envio só é aceito quando há ao menos um produto e nenhum campo obrigatório pendente.",
    ];

    for line in &descr {
        println!(" {}", line);
    }

    println!("\n versão: {}\n", env!("CARGO_PKG_VERSION"));
}

/// Formata inteiros com separador de milhares ('.').
pub fn fmt_milhares(n: usize) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    s.chars().enumerate().for_each(|(i, c)| {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push('.');
        }
        result.push(c);
    });

    result
}

/// Fotografia serializável do formulário, para a saída `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relatorio<'a> {
    pub cliente: &'a Cliente,
    pub estado_envio: EstadoEnvio,
    pub expandido: Option<&'a str>,
    pub produtos: &'a [Arc<ProdutoFiscal>],
    pub validacao: &'a ResultadoValidacao,
    pub abas_por_produto: Vec<ValidadeAbas>,
    pub abas_global: ValidadeAbas,
}

impl<'a> Relatorio<'a> {
    pub fn new(motor: &'a MotorFormulario) -> Self {
        Relatorio {
            cliente: motor.cliente(),
            estado_envio: motor.estado_envio(),
            expandido: motor.expandido(),
            produtos: motor.produtos(),
            validacao: motor.resultado(),
            abas_por_produto: (0..motor.produtos().len())
                .map(|indice| motor.validade_abas(indice))
                .collect(),
            abas_global: motor.validade_abas_global(),
        }
    }
}

fn marca(valida: bool) -> &'static str {
    if valida { "ok" } else { "!!" }
}

/// Imprime, por produto, as abas sinalizadas e a primeira mensagem de cada campo.
pub fn imprimir_relatorio(motor: &MotorFormulario) {
    let cliente = motor.cliente();
    let resultado = motor.resultado();

    println!(" --- Formulário de Produtos: {} <{}> ---", cliente.nome, cliente.email);

    if motor.produtos().is_empty() {
        println!(" Nenhum produto adicionado. Adicione pelo menos um produto para continuar.\n");
    }

    let max_len = Aba::TODAS
        .iter()
        .map(|aba| aba.titulo().chars().count())
        .max()
        .unwrap_or_default();

    for (indice, produto) in motor.produtos().iter().enumerate() {
        let expandido = if motor.expandido() == Some(produto.id.as_str()) {
            " [expandido]"
        } else {
            ""
        };
        let descricao = match produto.descricao.trim() {
            "" => "(sem descrição)",
            d => d,
        };

        println!("\n Produto {} (id {}){}: {}", indice + 1, produto.id, expandido, descricao);
        if !produto.ncm.is_empty() {
            println!("  NCM: {}", produto.ncm);
        }
        println!(
            "  ICMS: {} -> {} ({} -> {})",
            produto.icms.origem_estado,
            produto.icms.destino_estado,
            get_nome_do_estado(&produto.icms.origem_estado),
            get_nome_do_estado(&produto.icms.destino_estado),
        );

        let abas = motor.validade_abas(indice);
        for aba in Aba::TODAS {
            println!("  [{}] {:<max_len$}", marca(abas.aba_valida(aba)), aba.titulo());
        }

        for (chave, mensagens) in resultado.erros_do_produto(indice) {
            if let Some(primeira) = mensagens.first() {
                println!("   - {}: {}", chave.campo, primeira);
            }
        }
    }

    let produtos_com_erro = resultado.produtos_com_erro().len();
    println!(
        "\n Violações: {} em {} de {} produto(s).",
        fmt_milhares(resultado.total_violacoes()),
        fmt_milhares(produtos_com_erro),
        fmt_milhares(motor.produtos().len()),
    );

    if resultado.valido {
        println!(" Formulário válido: envio liberado.\n");
    } else {
        println!(" Formulário inválido: preencha todos os campos obrigatórios.\n");
    }
}

pub fn imprimir_envio(resultado: &ResultadoEnvio) {
    println!(" {}.", resultado.mensagem);
    println!(
        " Produtos enviados: {} | Protocolo: {}\n",
        fmt_milhares(resultado.produtos_enviados),
        resultado.protocolo
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milhares_com_ponto() {
        assert_eq!(fmt_milhares(0), "0");
        assert_eq!(fmt_milhares(999), "999");
        assert_eq!(fmt_milhares(1000), "1.000");
        assert_eq!(fmt_milhares(1234567), "1.234.567");
    }

    #[test]
    fn relatorio_serializa_abas_por_produto() {
        let mut motor = MotorFormulario::autenticado("5").unwrap();
        motor.adicionar_produto().unwrap();
        motor.adicionar_produto().unwrap();

        let json = serde_json::to_value(Relatorio::new(&motor)).unwrap();

        assert_eq!(json["cliente"]["nome"], "Carlos Ferreira");
        assert_eq!(json["estadoEnvio"], "Ocioso");
        assert_eq!(json["abasPorProduto"].as_array().unwrap().len(), 2);
        assert_eq!(json["abasPorProduto"][0]["identificacao"], false);
        assert_eq!(json["abasPorProduto"][0]["dadosFiscais"], true);
        assert_eq!(json["abasGlobal"]["dadosComerciais"], false);
        assert!(json.get("estado_envio").is_none());
        assert_eq!(json["produtos"][1]["unidadeMedida"], "UN");
        assert_eq!(json["validacao"]["valido"], false);
    }
}
