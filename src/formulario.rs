use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    ArmazemProdutos, Campo, Cliente, Expansao, FormularioError, FormularioResult,
    ID_CLIENTE_DO_TOKEN, ItemLista, Lista, ProdutoFiscal, ResultadoEnvio, ResultadoValidacao,
    ServicoEnvio, ValidadeAbas, Valor, buscar_cliente, validade_abas, validade_abas_global,
    validar,
};

/// Porta de entrada do formulário.
#[derive(Debug, Clone)]
pub enum Acesso {
    /// Operador logado no painel: edição liberada desde o início.
    Autenticado,
    /// Fornecedor com link tokenizado: edição liberada após a senha.
    Publico {
        token: String,
        senha: blake3::Hash,
        liberado: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoEnvio {
    Ocioso,
    Enviando,
    Concluido,
}

/// Controlador do formulário de produtos fiscais.
///
/// Toda mutação reexecuta, antes de retornar, a validação e a agregação por aba;
/// a interface só lê o resultado já calculado.
///
/// ```
/// use formulario_produtos_fiscais::{Campo, CampoFornecedor, MotorFormulario};
///
/// let mut motor = MotorFormulario::autenticado("1").unwrap();
/// let id = motor.adicionar_produto().unwrap();
/// assert!(!motor.formulario_valido());
///
/// motor.atualizar_campo(&id, &Campo::Descricao, "Teclado USB").unwrap();
/// motor.atualizar_campo(&id, &Campo::Ncm, "8471.60.52").unwrap();
/// let nome = Campo::Fornecedor(CampoFornecedor::Nome);
/// let cnpj = Campo::Fornecedor(CampoFornecedor::Cnpj);
/// motor.atualizar_campo(&id, &nome, "Periféricos SA").unwrap();
/// motor.atualizar_campo(&id, &cnpj, "11.222.333/0001-44").unwrap();
/// assert!(motor.formulario_valido());
/// ```
#[derive(Debug, Clone)]
pub struct MotorFormulario {
    cliente: Cliente,
    acesso: Acesso,
    armazem: ArmazemProdutos,
    expansao: Expansao,
    resultado: ResultadoValidacao,
    estado: EstadoEnvio,
}

impl MotorFormulario {
    fn new(cliente: Cliente, acesso: Acesso) -> Self {
        MotorFormulario {
            cliente,
            acesso,
            armazem: ArmazemProdutos::new(),
            expansao: Expansao::default(),
            resultado: validar(std::iter::empty()),
            estado: EstadoEnvio::Ocioso,
        }
    }

    /// Fluxo do painel: o cliente vem da seleção feita pelo operador.
    pub fn autenticado(id_cliente: &str) -> FormularioResult<Self> {
        let cliente = buscar_cliente(id_cliente).ok_or_else(|| {
            FormularioError::ClienteNaoEncontrado {
                id: id_cliente.to_string(),
            }
        })?;

        info!(cliente = %cliente.nome, "formulário aberto pelo painel");
        Ok(Self::new(cliente, Acesso::Autenticado))
    }

    /// Fluxo público: o fornecedor abre o link com `token` e precisa da senha
    /// enviada por e-mail. Apenas o resumo blake3 da senha é guardado.
    pub fn publico(token: &str, senha: &str) -> FormularioResult<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(FormularioError::TokenInvalido);
        }

        let cliente = buscar_cliente(ID_CLIENTE_DO_TOKEN).ok_or_else(|| {
            FormularioError::ClienteNaoEncontrado {
                id: ID_CLIENTE_DO_TOKEN.to_string(),
            }
        })?;

        info!(%token, cliente = %cliente.nome, "formulário público aberto");
        let acesso = Acesso::Publico {
            token: token.to_string(),
            senha: blake3::hash(senha.as_bytes()),
            liberado: false,
        };
        Ok(Self::new(cliente, acesso))
    }

    /// Libera o formulário público. No fluxo autenticado não tem efeito.
    pub fn autenticar(&mut self, senha: &str) -> FormularioResult<()> {
        match &mut self.acesso {
            Acesso::Autenticado => Ok(()),
            Acesso::Publico {
                token,
                senha: esperada,
                liberado,
            } => {
                // Hash implementa comparação em tempo constante
                if blake3::hash(senha.as_bytes()) == *esperada {
                    *liberado = true;
                    info!(%token, "formulário público liberado");
                    Ok(())
                } else {
                    warn!(%token, "senha incorreta");
                    Err(FormularioError::SenhaIncorreta)
                }
            }
        }
    }

    pub fn liberado(&self) -> bool {
        match self.acesso {
            Acesso::Autenticado => true,
            Acesso::Publico { liberado, .. } => liberado,
        }
    }

    pub fn acesso(&self) -> &Acesso {
        &self.acesso
    }

    pub fn cliente(&self) -> &Cliente {
        &self.cliente
    }

    pub fn estado_envio(&self) -> EstadoEnvio {
        self.estado
    }

    pub fn armazem(&self) -> &ArmazemProdutos {
        &self.armazem
    }

    pub fn produtos(&self) -> &[Arc<ProdutoFiscal>] {
        self.armazem.produtos()
    }

    fn verificar_edicao(&self) -> FormularioResult<()> {
        if !self.liberado() {
            return Err(FormularioError::AcessoBloqueado);
        }
        if self.estado != EstadoEnvio::Ocioso {
            return Err(FormularioError::FormularioJaEnviado);
        }
        Ok(())
    }

    fn revalidar(&mut self) {
        self.resultado = validar(self.armazem.produtos().iter().map(Arc::as_ref));
    }

    /// Acrescenta um produto, expande-o (recolhendo o anterior) e devolve o `id`.
    pub fn adicionar_produto(&mut self) -> FormularioResult<String> {
        self.verificar_edicao()?;
        let id = self.armazem.adicionar();
        self.expansao.expandir(&id);
        self.revalidar();
        Ok(id)
    }

    pub fn remover_produto(&mut self, id: &str) -> FormularioResult<bool> {
        self.verificar_edicao()?;
        let removido = self.armazem.remover(id);
        self.expansao.ao_remover(id);
        if removido {
            self.revalidar();
        }
        Ok(removido)
    }

    pub fn atualizar_campo(
        &mut self,
        id: &str,
        campo: &Campo,
        valor: impl Into<Valor>,
    ) -> FormularioResult<bool> {
        self.verificar_edicao()?;
        let alterado = self.armazem.atualizar_campo(id, campo, valor.into())?;
        if alterado {
            self.revalidar();
        }
        Ok(alterado)
    }

    /// Variante textual de `atualizar_campo`: o caminho é interpretado e o valor
    /// convertido conforme o tipo do campo.
    pub fn atualizar_caminho(
        &mut self,
        id: &str,
        caminho: &str,
        bruto: &str,
    ) -> FormularioResult<bool> {
        let campo: Campo = caminho.parse()?;
        let valor = Valor::interpretar(&campo, bruto)?;
        self.atualizar_campo(id, &campo, valor)
    }

    pub fn adicionar_item_lista(
        &mut self,
        id: &str,
        lista: Lista,
    ) -> FormularioResult<Option<usize>> {
        self.verificar_edicao()?;
        let indice = self.armazem.adicionar_item(id, lista);
        if indice.is_some() {
            self.revalidar();
        }
        Ok(indice)
    }

    /// `Some` substitui (ou anexa, se `indice` for o tamanho da lista); `None` remove.
    pub fn atualizar_lista(
        &mut self,
        id: &str,
        lista: Lista,
        indice: usize,
        item: Option<ItemLista>,
    ) -> FormularioResult<bool> {
        self.verificar_edicao()?;
        let alterado = self.armazem.atualizar_item(id, lista, indice, item)?;
        if alterado {
            self.revalidar();
        }
        Ok(alterado)
    }

    pub fn remover_item_lista(
        &mut self,
        id: &str,
        lista: Lista,
        indice: usize,
    ) -> FormularioResult<bool> {
        self.atualizar_lista(id, lista, indice, None)
    }

    pub fn resultado(&self) -> &ResultadoValidacao {
        &self.resultado
    }

    pub fn erros_de(&self, indice_produto: usize, campo: &Campo) -> Option<&[String]> {
        self.resultado.erros_de(indice_produto, campo)
    }

    pub fn formulario_valido(&self) -> bool {
        self.resultado.valido
    }

    pub fn validade_abas(&self, indice_produto: usize) -> ValidadeAbas {
        validade_abas(&self.resultado.erros, indice_produto)
    }

    pub fn validade_abas_global(&self) -> ValidadeAbas {
        validade_abas_global(&self.resultado.erros)
    }

    /// Alterna a expansão de um produto existente; ids desconhecidos são ignorados.
    pub fn alternar_expansao(&mut self, id: &str) -> bool {
        if self.armazem.posicao(id).is_none() {
            return false;
        }
        self.expansao.alternar(id);
        debug!(%id, expandido = ?self.expansao.expandido(), "expansão alternada");
        true
    }

    pub fn expandido(&self) -> Option<&str> {
        self.expansao.expandido()
    }

    /// Envia o formulário pelo colaborador.
    ///
    /// Um formulário vazio ou com violações é recusado antes de qualquer espera.
    /// Depois do envio o formulário fica no estado terminal `Concluido`.
    pub fn enviar(&mut self, servico: &dyn ServicoEnvio) -> FormularioResult<ResultadoEnvio> {
        self.verificar_edicao()?;
        self.revalidar();

        if self.armazem.is_empty() {
            warn!("envio recusado: nenhum produto");
            return Err(FormularioError::FormularioVazio);
        }

        if !self.resultado.valido {
            let violacoes = self.resultado.total_violacoes();
            warn!(violacoes, "envio recusado: formulário inválido");
            return Err(FormularioError::FormularioInvalido { violacoes });
        }

        self.estado = EstadoEnvio::Enviando;
        let instantaneo = self.armazem.instantaneo();
        let resultado = servico.enviar(&self.cliente, &instantaneo);
        self.estado = EstadoEnvio::Concluido;

        Ok(resultado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CampoFornecedor, CampoIcms, EnvioSimulado};
    use std::{cell::Cell, time::Duration};

    struct EnvioContado {
        chamadas: Cell<usize>,
    }

    impl ServicoEnvio for EnvioContado {
        fn enviar(&self, _: &Cliente, produtos: &[Arc<ProdutoFiscal>]) -> ResultadoEnvio {
            self.chamadas.set(self.chamadas.get() + 1);
            ResultadoEnvio {
                protocolo: "teste".to_string(),
                produtos_enviados: produtos.len(),
                mensagem: String::new(),
            }
        }
    }

    fn preencher(motor: &mut MotorFormulario, id: &str) {
        motor.atualizar_campo(id, &Campo::Descricao, "Caneta").unwrap();
        motor.atualizar_campo(id, &Campo::Ncm, "9608.10.00").unwrap();
        motor
            .atualizar_campo(id, &Campo::Fornecedor(CampoFornecedor::Nome), "Papelaria Central")
            .unwrap();
        motor
            .atualizar_campo(id, &Campo::Fornecedor(CampoFornecedor::Cnpj), "00.111.222/0001-33")
            .unwrap();
    }

    #[test]
    fn cliente_desconhecido_no_painel() {
        assert!(matches!(
            MotorFormulario::autenticado("99"),
            Err(FormularioError::ClienteNaoEncontrado { .. })
        ));
    }

    #[test]
    fn formulario_publico_exige_senha() {
        assert_eq!(
            MotorFormulario::publico("  ", "123456").err(),
            Some(FormularioError::TokenInvalido)
        );

        let mut motor = MotorFormulario::publico("tok-abc", "123456").unwrap();
        assert_eq!(motor.cliente().nome, "Empresa ABC Ltda");
        assert_eq!(motor.adicionar_produto(), Err(FormularioError::AcessoBloqueado));

        assert_eq!(motor.autenticar("000000"), Err(FormularioError::SenhaIncorreta));
        assert!(!motor.liberado());

        motor.autenticar("123456").unwrap();
        assert!(motor.liberado());
        assert!(motor.adicionar_produto().is_ok());
    }

    #[test]
    fn novo_produto_expande_e_recolhe_o_anterior() {
        let mut motor = MotorFormulario::autenticado("2").unwrap();
        let a = motor.adicionar_produto().unwrap();
        assert_eq!(motor.expandido(), Some(a.as_str()));

        let b = motor.adicionar_produto().unwrap();
        assert_eq!(motor.expandido(), Some(b.as_str()));

        assert!(motor.alternar_expansao(&a));
        assert_eq!(motor.expandido(), Some(a.as_str()));

        assert!(!motor.alternar_expansao("inexistente"));
        assert_eq!(motor.expandido(), Some(a.as_str()));

        motor.remover_produto(&a).unwrap();
        assert_eq!(motor.expandido(), None);
    }

    #[test]
    fn envio_invalido_e_recusado_sem_chamar_o_servico() {
        let servico = EnvioContado {
            chamadas: Cell::new(0),
        };
        let mut motor = MotorFormulario::autenticado("3").unwrap();

        assert_eq!(motor.enviar(&servico), Err(FormularioError::FormularioVazio));

        motor.adicionar_produto().unwrap();
        assert_eq!(
            motor.enviar(&servico),
            Err(FormularioError::FormularioInvalido { violacoes: 4 })
        );
        assert_eq!(servico.chamadas.get(), 0);
        assert_eq!(motor.estado_envio(), EstadoEnvio::Ocioso);
    }

    #[test]
    fn envio_valido_e_terminal() {
        let mut motor = MotorFormulario::autenticado("1").unwrap();
        let id = motor.adicionar_produto().unwrap();
        preencher(&mut motor, &id);
        assert!(motor.formulario_valido());

        let resultado = motor
            .enviar(&EnvioSimulado::new(Duration::from_millis(1)))
            .unwrap();
        assert_eq!(resultado.produtos_enviados, 1);
        assert_eq!(resultado.protocolo.len(), 16);
        assert_eq!(motor.estado_envio(), EstadoEnvio::Concluido);

        assert_eq!(
            motor.atualizar_campo(&id, &Campo::Descricao, "Outra"),
            Err(FormularioError::FormularioJaEnviado)
        );
        assert_eq!(
            motor.enviar(&EnvioSimulado::new(Duration::ZERO)),
            Err(FormularioError::FormularioJaEnviado)
        );
    }

    #[test]
    fn caminho_textual_e_valor_booleano() {
        let mut motor = MotorFormulario::autenticado("1").unwrap();
        let id = motor.adicionar_produto().unwrap();

        assert_eq!(motor.atualizar_caminho(&id, "icms.substituicaoTributaria", "sim"), Ok(true));
        assert_eq!(motor.atualizar_caminho(&id, "icms-origemEstado", "XX"), Ok(true));

        let produto = motor.armazem().obter(&id).unwrap();
        assert_eq!(produto.icms.substituicao_tributaria, Some(true));
        assert_eq!(
            motor.erros_de(0, &Campo::Icms(CampoIcms::OrigemEstado)),
            Some(&["Estado de origem inválido: XX".to_string()][..])
        );
        assert!(!motor.validade_abas(0).dados_fiscais);

        assert!(matches!(
            motor.atualizar_caminho(&id, "icms.naoExiste", "1"),
            Err(FormularioError::CaminhoInvalido { .. })
        ));
    }
}
