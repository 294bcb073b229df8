mod abas;
mod args;
mod armazem;
mod campo;
mod envio;
mod error;
mod esquema;
mod formulario;
mod metadata;
mod produto;
mod regex;
mod relatorio;
mod validador;

pub use self::{
    abas::*, args::*, armazem::*, campo::*, envio::*, error::*, esquema::*, formulario::*,
    metadata::*, produto::*, regex::*, relatorio::*, validador::*,
};
