// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::inventory::Product;

// 1. Distribuição por departamento (o gráfico de pizza)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentShare {
    pub department: String,
    pub count: usize,
    pub percentage: Decimal, // 0..=100, sem casas decimais
}

// 2. Estoque total (só produtos com estoque informado entram na conta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAggregate {
    pub total_units: u64,
    pub products_with_stock: usize,
}

// 3. Departamento com maior estoque médio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAverage {
    pub department: String,
    pub average: Decimal,
    pub products: usize,
}

// 4. Painel de inventário completo
// Só existe quando ao menos um produto tem estoque informado.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAnalysis<'a> {
    pub stock: StockAggregate,
    pub low_stock: Vec<&'a Product>,
    pub highest_stock: Vec<&'a Product>,
    pub lowest_stock: Vec<&'a Product>,
    pub highest_average_department: Option<DepartmentAverage>,
}

// 5. Resumo (os números do rodapé da coluna de estatísticas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub departments: usize,
    pub last_updated: Option<DateTime<Utc>>,
}
