// src/models/inventory.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Departamentos padrão ---
// O vocabulário é configuração, não dado derivado (ver AppConfig).
pub const DEFAULT_DEPARTMENTS: [&str; 9] = [
    "Mercearia",
    "Hortifruti",
    "Açougue",
    "Padaria",
    "Laticínios",
    "Bebidas",
    "Higiene",
    "Limpeza",
    "Outros",
];

// ---
// Validação Customizada
// ---
// `length(min = 1)` não basta: "   " também é considerado vazio.
fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

// --- 1. Produto ---
// A ordem da coleção é a de inserção, mais novo primeiro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    // Número JSON exato: o f64 arredondaria preços com muitas casas
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Monta um produto novo a partir do formulário. Os dois timestamps recebem `now`.
    pub fn new(form: ProductFormData, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: form.code,
            name: form.name,
            price: form.price,
            department: form.department,
            notes: form.notes,
            stock: form.stock,
            min_stock: form.min_stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Substitui todos os campos editáveis. `id` e `created_at` nunca mudam.
    pub fn apply(&mut self, form: ProductFormData, now: DateTime<Utc>) {
        self.code = form.code;
        self.name = form.name;
        self.price = form.price;
        self.department = form.department;
        self.notes = form.notes;
        self.stock = form.stock;
        self.min_stock = form.min_stock;
        // Relógio voltando para trás não pode quebrar created_at <= updated_at
        self.updated_at = now.max(self.updated_at);
    }

    /// Estoque baixo exige os dois campos e `stock < min_stock` (estrito).
    pub fn is_low_stock(&self) -> bool {
        matches!((self.stock, self.min_stock), (Some(stock), Some(min)) if stock < min)
    }

    /// Busca sem diferenciar maiúsculas em nome, código e departamento.
    /// `needle` já deve vir em minúsculas.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.code.to_lowercase().contains(needle)
            || self.department.to_lowercase().contains(needle)
    }

    /// "R$ 4,99", como no cartão do produto.
    pub fn display_price(&self) -> String {
        format!("R$ {:.2}", self.price).replace('.', ",")
    }
}

// --- 2. Dados do Formulário ---
// Tudo do Product menos id e timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductFormData {
    #[validate(custom(function = "validate_not_blank", message = "O código do produto é obrigatório"))]
    pub code: String,

    #[validate(custom(function = "validate_not_blank", message = "O nome do produto é obrigatório"))]
    pub name: String,

    // Preço, notas e estoques são permissivos de propósito (sem checagem de faixa).
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,

    pub department: String,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub stock: Option<u32>,

    #[serde(default)]
    pub min_stock: Option<u32>,
}

impl ProductFormData {
    /// Formulário pré-preenchido com o produto atual (diálogo de edição).
    pub fn from_product(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
            department: product.department.clone(),
            notes: product.notes.clone(),
            stock: product.stock,
            min_stock: product.min_stock,
        }
    }
}
