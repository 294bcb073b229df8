use std::io;
use thiserror::Error;

use crate::Lista;

/// Tipo de retorno conveniente para todo o projeto
pub type FormularioResult<T> = Result<T, FormularioError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormularioError {
    #[error("O formulário está bloqueado: informe a senha de acesso enviada por e-mail.")]
    AcessoBloqueado,

    #[error("Caminho de campo inválido: <{caminho}>")]
    CaminhoInvalido { caminho: String },

    #[error("Chave de erro inválida: <{chave}>. Esperado: produto-<índice>-<caminho>")]
    ChaveErroInvalida { chave: String },

    #[error("Cliente não encontrado: id <{id}>")]
    ClienteNaoEncontrado { id: String },

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Campo obrigatório não pode ser removido: <{campo}>")]
    CampoObrigatorio { campo: String },

    #[error(
        "Formulário inválido!\n\
        Por favor, preencha todos os campos obrigatórios.\n\
        Violações encontradas: {violacoes}"
    )]
    FormularioInvalido { violacoes: usize },

    #[error("O formulário já foi enviado e não aceita mais alterações.")]
    FormularioJaEnviado,

    #[error("Nenhum produto adicionado. Adicione pelo menos um produto para continuar.")]
    FormularioVazio,

    #[error(
        "Índice fora do intervalo na lista <{lista}>!\n\
        Índice: {indice}\n\
        Tamanho atual: {tamanho}"
    )]
    IndiceForaDoIntervalo {
        lista: Lista,
        indice: usize,
        tamanho: usize,
    },

    #[error("Erro de I/O: {0}")]
    Io(String),

    #[error("Item incompatível com a lista <{lista}>")]
    ItemIncompativel { lista: Lista },

    #[error("Erro na serialização JSON: {0}")]
    Json(String),

    #[error("Senha incorreta. Por favor, tente novamente.")]
    SenhaIncorreta,

    #[error("Token de acesso ao formulário ausente ou inválido.")]
    TokenInvalido,

    #[error("Tipo de valor incompatível com o campo <{campo}>: esperado {esperado}")]
    ValorIncompativel {
        campo: String,
        esperado: crate::TipoCampo,
    },
}

// io::Error e serde_json::Error não implementam Clone/PartialEq: guardamos a mensagem.
impl From<io::Error> for FormularioError {
    fn from(e: io::Error) -> Self {
        FormularioError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for FormularioError {
    fn from(e: serde_json::Error) -> Self {
        FormularioError::Json(e.to_string())
    }
}
