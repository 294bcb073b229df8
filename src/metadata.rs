use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// --- Tabelas de Referência ---

/// Unidades Federativas aceitas em `icms.origemEstado`, `icms.destinoEstado`
/// e `fornecedor.estado`.
pub const ESTADOS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Nome por extenso da Unidade Federativa.
/// Armazenado no binário, sem alocação.
pub fn get_nome_do_estado(codigo: &str) -> &'static str {
    match codigo {
        "AC" => "Acre",
        "AL" => "Alagoas",
        "AP" => "Amapá",
        "AM" => "Amazonas",
        "BA" => "Bahia",
        "CE" => "Ceará",
        "DF" => "Distrito Federal",
        "ES" => "Espírito Santo",
        "GO" => "Goiás",
        "MA" => "Maranhão",
        "MT" => "Mato Grosso",
        "MS" => "Mato Grosso do Sul",
        "MG" => "Minas Gerais",
        "PA" => "Pará",
        "PB" => "Paraíba",
        "PR" => "Paraná",
        "PE" => "Pernambuco",
        "PI" => "Piauí",
        "RJ" => "Rio de Janeiro",
        "RN" => "Rio Grande do Norte",
        "RS" => "Rio Grande do Sul",
        "RO" => "Rondônia",
        "RR" => "Roraima",
        "SC" => "Santa Catarina",
        "SP" => "São Paulo",
        "SE" => "Sergipe",
        "TO" => "Tocantins",
        _ => "Estado Desconhecido",
    }
}

/// Gera um enum de texto fechado com conversões de/para `&str`.
macro_rules! conjunto_fechado {
    (
        $(#[$meta:meta])*
        $nome:ident { $($variante:ident => $texto:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $nome {
            $(
                #[serde(rename = $texto)]
                $variante,
            )+
        }

        impl $nome {
            pub const VALORES: &'static [&'static str] = &[$($texto),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variante => $texto,)+
                }
            }
        }

        impl FromStr for $nome {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($texto => Ok(Self::$variante),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $nome {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

conjunto_fechado! {
    /// Regime tributário do contribuinte para fins de ICMS.
    RegimeTributario {
        SimplesNacional => "Simples Nacional",
        LucroPresumido => "Lucro Presumido",
        LucroReal => "Lucro Real",
    }
}

conjunto_fechado! {
    /// Regime de apuração de PIS/COFINS.
    RegimeApuracao {
        Cumulativo => "Cumulativo",
        NaoCumulativo => "Não Cumulativo",
    }
}

conjunto_fechado! {
    TipoBeneficio {
        Isencao => "Isenção",
        ReducaoDeBase => "Redução de Base",
        Diferimento => "Diferimento",
        CreditoPresumido => "Crédito Presumido",
    }
}

// --- Clientes de demonstração ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: String,
    pub nome: String,
    pub email: String,
}

const CLIENTES: [(&str, &str, &str); 5] = [
    ("1", "Empresa ABC Ltda", "contato@empresaabc.com"),
    ("2", "João Empreendimentos", "joao@empreendimentos.com"),
    ("3", "Maria Silva", "maria.silva@email.com"),
    ("4", "Tech Solutions SA", "contato@techsolutions.com"),
    ("5", "Carlos Ferreira", "carlos.ferreira@email.com"),
];

/// Cliente associado a todo token de formulário público.
pub const ID_CLIENTE_DO_TOKEN: &str = "1";

/// Procura o cliente na tabela de demonstração.
pub fn buscar_cliente(id: &str) -> Option<Cliente> {
    CLIENTES
        .iter()
        .find(|(cid, _, _)| *cid == id)
        .map(|&(id, nome, email)| Cliente {
            id: id.to_string(),
            nome: nome.to_string(),
            email: email.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estados_tem_27_codigos_distintos() {
        let mut codigos = ESTADOS.to_vec();
        codigos.sort_unstable();
        codigos.dedup();
        assert_eq!(codigos.len(), 27);
        assert!(codigos.iter().all(|uf| get_nome_do_estado(uf) != "Estado Desconhecido"));
    }

    #[test]
    fn conjuntos_fechados_convertem_texto() {
        assert_eq!(
            "Não Cumulativo".parse::<RegimeApuracao>(),
            Ok(RegimeApuracao::NaoCumulativo)
        );
        assert_eq!(RegimeTributario::LucroReal.to_string(), "Lucro Real");
        assert!("Lucro".parse::<RegimeTributario>().is_err());
        assert_eq!(TipoBeneficio::VALORES.len(), 4);
    }

    #[test]
    fn busca_cliente_por_id() {
        let cliente = buscar_cliente("4").expect("cliente 4 existe");
        assert_eq!(cliente.nome, "Tech Solutions SA");
        assert!(buscar_cliente("99").is_none());
    }
}
