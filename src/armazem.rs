use rand::Rng;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

use crate::{
    Campo, FormularioError, FormularioResult, ItemLista, Lista, ProdutoFiscal, Valor,
    campo::fora_do_intervalo,
};

/// Coleção ordenada de produtos fiscais, indexada pelo `id`.
///
/// A ordem de inserção é a ordem de exibição. Cada atualização é copy-on-write
/// (`Arc::make_mut`): um instantâneo obtido antes da atualização não é alterado.
#[derive(Debug, Clone, Default)]
pub struct ArmazemProdutos {
    produtos: Vec<Arc<ProdutoFiscal>>,
}

impl ArmazemProdutos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.produtos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.produtos.is_empty()
    }

    pub fn produtos(&self) -> &[Arc<ProdutoFiscal>] {
        &self.produtos
    }

    /// Cópia rasa da coleção: apenas os ponteiros são clonados.
    pub fn instantaneo(&self) -> Vec<Arc<ProdutoFiscal>> {
        self.produtos.clone()
    }

    pub fn posicao(&self, id: &str) -> Option<usize> {
        self.produtos.iter().position(|produto| produto.id == id)
    }

    pub fn obter(&self, id: &str) -> Option<&ProdutoFiscal> {
        self.produtos
            .iter()
            .find(|produto| produto.id == id)
            .map(Arc::as_ref)
    }

    fn slot_mut(&mut self, id: &str) -> Option<&mut Arc<ProdutoFiscal>> {
        self.produtos.iter_mut().find(|produto| produto.id == id)
    }

    /// Acrescenta um produto com os valores padrão e devolve o novo `id`.
    pub fn adicionar(&mut self) -> String {
        let id = self.novo_id();
        self.produtos.push(Arc::new(ProdutoFiscal::novo(id.clone())));
        debug!(%id, total = self.produtos.len(), "produto adicionado");
        id
    }

    /// Timestamp em milissegundos seguido de um sufixo aleatório (sorteado de novo
    /// em caso de colisão).
    fn novo_id(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let mut rng = rand::rng();
        loop {
            let id = format!("{millis}{:04}", rng.random_range(0..10_000));
            if self.posicao(&id).is_none() {
                return id;
            }
        }
    }

    /// Remove o produto. Id inexistente não é erro: devolve `false`.
    pub fn remover(&mut self, id: &str) -> bool {
        let antes = self.produtos.len();
        self.produtos.retain(|produto| produto.id != id);
        let removido = self.produtos.len() != antes;
        debug!(%id, removido, "remover produto");
        removido
    }

    /// Substitui somente a folha endereçada por `campo`.
    ///
    /// Devolve `Ok(false)` se o `id` não existir.
    pub fn atualizar_campo(
        &mut self,
        id: &str,
        campo: &Campo,
        valor: Valor,
    ) -> FormularioResult<bool> {
        let Some(slot) = self.slot_mut(id) else {
            return Ok(false);
        };

        Arc::make_mut(slot).escrever(campo, valor)?;
        debug!(%id, %campo, "campo atualizado");
        Ok(true)
    }

    /// Acrescenta um elemento em branco à lista e devolve a sua posição.
    pub fn adicionar_item(&mut self, id: &str, lista: Lista) -> Option<usize> {
        let slot = self.slot_mut(id)?;
        let indice = slot.tamanho_da_lista(lista);
        let produto = Arc::make_mut(slot);

        match lista.item_em_branco() {
            ItemLista::NotaFiscal(nota) => produto.notas_fiscais.push(nota),
            ItemLista::BeneficioFiscal(beneficio) => produto.beneficios_fiscais.push(beneficio),
            ItemLista::HistoricoClassificacao(historico) => {
                produto.historico_classificacao.push(historico)
            }
        }

        debug!(%id, %lista, indice, "item adicionado");
        Some(indice)
    }

    /// Substitui o elemento na posição `indice` (ou anexa, se `indice` for o tamanho
    /// da lista). Com `None`, remove o elemento na posição.
    pub fn atualizar_item(
        &mut self,
        id: &str,
        lista: Lista,
        indice: usize,
        item: Option<ItemLista>,
    ) -> FormularioResult<bool> {
        let Some(item) = item else {
            return self.remover_item(id, lista, indice);
        };

        if item.lista() != lista {
            return Err(FormularioError::ItemIncompativel { lista });
        }

        let Some(slot) = self.slot_mut(id) else {
            return Ok(false);
        };

        let tamanho = slot.tamanho_da_lista(lista);
        if indice > tamanho {
            return Err(fora_do_intervalo(lista, indice, tamanho));
        }

        let produto = Arc::make_mut(slot);
        match item {
            ItemLista::NotaFiscal(nota) => {
                substituir_ou_anexar(&mut produto.notas_fiscais, indice, nota)
            }
            ItemLista::BeneficioFiscal(beneficio) => {
                substituir_ou_anexar(&mut produto.beneficios_fiscais, indice, beneficio)
            }
            ItemLista::HistoricoClassificacao(historico) => {
                substituir_ou_anexar(&mut produto.historico_classificacao, indice, historico)
            }
        }

        debug!(%id, %lista, indice, "item atualizado");
        Ok(true)
    }

    /// Remove o elemento na posição; os seguintes avançam uma posição.
    pub fn remover_item(
        &mut self,
        id: &str,
        lista: Lista,
        indice: usize,
    ) -> FormularioResult<bool> {
        let Some(slot) = self.slot_mut(id) else {
            return Ok(false);
        };

        let tamanho = slot.tamanho_da_lista(lista);
        if indice >= tamanho {
            return Err(fora_do_intervalo(lista, indice, tamanho));
        }

        let produto = Arc::make_mut(slot);
        match lista {
            Lista::NotasFiscais => {
                produto.notas_fiscais.remove(indice);
            }
            Lista::BeneficiosFiscais => {
                produto.beneficios_fiscais.remove(indice);
            }
            Lista::HistoricoClassificacao => {
                produto.historico_classificacao.remove(indice);
            }
        }

        debug!(%id, %lista, indice, "item removido");
        Ok(true)
    }
}

fn substituir_ou_anexar<T>(itens: &mut Vec<T>, indice: usize, item: T) {
    match itens.get_mut(indice) {
        Some(atual) => *atual = item,
        None => itens.push(item),
    }
}
