use serde::Serialize;
use std::{sync::Arc, thread, time::Duration};
use tracing::info;

use crate::{Cliente, ProdutoFiscal};

/// Colaborador que recebe os produtos de um formulário válido.
pub trait ServicoEnvio {
    fn enviar(&self, cliente: &Cliente, produtos: &[Arc<ProdutoFiscal>]) -> ResultadoEnvio;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultadoEnvio {
    /// Resumo blake3 dos ids enviados, na ordem do formulário.
    pub protocolo: String,
    pub produtos_enviados: usize,
    pub mensagem: String,
}

/// Simula a latência de rede com uma espera fixa e sempre conclui com sucesso.
#[derive(Debug, Clone, Copy)]
pub struct EnvioSimulado {
    pub latencia: Duration,
}

impl Default for EnvioSimulado {
    fn default() -> Self {
        EnvioSimulado {
            latencia: Duration::from_millis(1500),
        }
    }
}

impl EnvioSimulado {
    pub fn new(latencia: Duration) -> Self {
        EnvioSimulado { latencia }
    }
}

impl ServicoEnvio for EnvioSimulado {
    fn enviar(&self, cliente: &Cliente, produtos: &[Arc<ProdutoFiscal>]) -> ResultadoEnvio {
        thread::sleep(self.latencia);

        let mut hasher = blake3::Hasher::new();
        hasher.update(cliente.id.as_bytes());
        for produto in produtos {
            hasher.update(b"|");
            hasher.update(produto.id.as_bytes());
        }
        let protocolo = hasher.finalize().to_hex().as_str()[..16].to_string();

        info!(
            cliente = %cliente.nome,
            produtos = produtos.len(),
            %protocolo,
            "formulário enviado"
        );

        ResultadoEnvio {
            protocolo,
            produtos_enviados: produtos.len(),
            mensagem: "Os produtos foram enviados com sucesso".to_string(),
        }
    }
}
