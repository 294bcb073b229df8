use regex::Regex;
use std::sync::LazyLock;

/// Caminho de campo em qualquer das três grafias aceitas, seguindo o padrão (?x)
/// x: modo verbose (ignora espaços e permite comentários)
pub static RE_CAMINHO_CAMPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^ # Início da string
        [A-Za-z]+ # Primeiro segmento: sempre um nome
        (?:
            [.\-] (?: [A-Za-z]+ | \d+ ) | # Ex: icms.aliquota, notasFiscais-0-numero
            \[ \d+ \]                     # Ex: notasFiscais[0].numero
        )*
        $ # Fim da string
        ",
    )
    .unwrap()
});

// Separadores entre segmentos: '.', '-', '[' e ']'
pub static RE_SEPARADOR_CAMINHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\-\[\]]+").unwrap());

// Chave do mapa de erros: produto-<índice>-<segmentos unidos por '-'>
pub static RE_CHAVE_ERRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^produto-(\d+)-(.+)$").unwrap());

// Atribuição da linha de comando: <índice>:<caminho>=<valor>
pub static RE_ATRIBUICAO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*:\s*([^=\s]+)\s*=(.*)$").unwrap());
