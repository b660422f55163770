// src/services/inventory_service.rs

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::inventory::{Product, ProductFormData},
};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

// Situação do armazenamento após uma mutação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    // A mutação valeu em memória, mas o slot falhou. Recuperável.
    MemoryOnly { reason: String },
}

// Resultado de uma mutação bem-sucedida + aviso de persistência, se houver.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub persistence: Persistence,
}

impl<T> Outcome<T> {
    pub fn is_saved(&self) -> bool {
        self.persistence == Persistence::Saved
    }
}

/// A fonte única da verdade: a coleção ordenada de produtos.
///
/// Toda mutação bem-sucedida grava a coleção inteira imediatamente (sem lote,
/// sem debounce). Se o slot falhar, o serviço entra em modo só-memória e
/// tenta de novo na próxima mutação.
pub struct InventoryService {
    products: Vec<Product>,
    repo: ProductRepository,
    memory_only: bool,
}

impl InventoryService {
    // --- INITIALIZE ---
    // Nunca falha: sem dados, dados corrompidos ou slot ilegível viram coleção vazia.
    pub fn initialize(repo: ProductRepository) -> Self {
        let products = match repo.load() {
            Ok(Some(products)) => {
                let products = repair_snapshot(products);
                tracing::info!("✅ {} produtos carregados de '{}'", products.len(), repo.key());
                products
            }
            Ok(None) => {
                tracing::info!("Nenhum produto salvo em '{}', começando vazio", repo.key());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Erro ao ler produtos de '{}', começando vazio: {}", repo.key(), e);
                Vec::new()
            }
        };

        Self {
            products,
            repo,
            memory_only: false,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    // --- ADD ---
    pub fn add(&mut self, form: ProductFormData) -> Result<Outcome<Product>, AppError> {
        form.validate()?;

        let product = Product::new(form, Utc::now());
        // Mais novo primeiro
        self.products.insert(0, product.clone());
        tracing::info!(id = %product.id, code = %product.code, "produto adicionado");

        Ok(self.persisted(product))
    }

    // --- UPDATE ---
    pub fn update(&mut self, id: Uuid, form: ProductFormData) -> Result<Outcome<Product>, AppError> {
        form.validate()?;

        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            tracing::warn!(%id, "atualização ignorada: produto não existe");
            return Err(AppError::ProductNotFound(id));
        };

        product.apply(form, Utc::now());
        let updated = product.clone();
        tracing::info!(%id, "produto atualizado");

        Ok(self.persisted(updated))
    }

    // --- REMOVE ---
    // Idempotente: remover o que já não existe não é erro e não grava nada.
    pub fn remove(&mut self, id: Uuid) -> Outcome<Option<Product>> {
        let Some(index) = self.products.iter().position(|p| p.id == id) else {
            tracing::debug!(%id, "remoção ignorada: produto não existe");
            return Outcome {
                value: None,
                persistence: self.current_persistence(),
            };
        };

        let removed = self.products.remove(index);
        tracing::info!(%id, "produto removido");

        self.persisted(Some(removed))
    }

    // --- SEARCH ---
    // Termo vazio devolve tudo, na ordem da coleção.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        if term.is_empty() {
            return self.products.iter().collect();
        }
        let needle = term.to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    // ---
    // Persistência
    // ---
    fn persisted<T>(&mut self, value: T) -> Outcome<T> {
        let persistence = match self.repo.save(&self.products) {
            Ok(()) => {
                if self.memory_only {
                    tracing::info!("✅ Persistência restabelecida em '{}'", self.repo.key());
                    self.memory_only = false;
                }
                Persistence::Saved
            }
            Err(e) => {
                tracing::error!("🔥 Falha ao salvar produtos, seguindo só em memória: {}", e);
                self.memory_only = true;
                Persistence::MemoryOnly { reason: e.to_string() }
            }
        };
        Outcome { value, persistence }
    }

    fn current_persistence(&self) -> Persistence {
        if self.memory_only {
            Persistence::MemoryOnly {
                reason: "última gravação falhou".to_string(),
            }
        } else {
            Persistence::Saved
        }
    }
}

// Snapshot vindo de fora pode violar as invariantes (editado à mão, duas
// abas gravando ao mesmo tempo). Ids repetidos: fica o primeiro.
// Timestamps invertidos: updated_at sobe até created_at.
fn repair_snapshot(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(products.len());
    let mut repaired = Vec::with_capacity(products.len());

    for mut product in products {
        if !seen.insert(product.id) {
            tracing::warn!(id = %product.id, "produto com id repetido descartado do snapshot");
            continue;
        }
        if product.updated_at < product.created_at {
            tracing::warn!(id = %product.id, "updatedAt anterior a createdAt, ajustado");
            product.updated_at = product.created_at;
        }
        repaired.push(product);
    }
    repaired
}
