// src/config.rs

use crate::{
    db::{FileSlot, ProductRepository, product_repo::DEFAULT_STORAGE_KEY},
    models::inventory::DEFAULT_DEPARTMENTS,
    services::InventoryService,
};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub departments: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl AppConfig {
    // Lê o .env (se existir) e as variáveis MARKETMEMO_*.
    // Nada aqui é obrigatório: tudo tem padrão.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    // Separado do `env` de verdade para os testes não mexerem no processo.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("MARKETMEMO_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("MARKETMEMO_STORAGE_KEY").filter(|v| !v.trim().is_empty()) {
            config.storage_key = key.trim().to_string();
        }
        if let Some(list) = lookup("MARKETMEMO_DEPARTMENTS") {
            let departments: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
            if departments.is_empty() {
                tracing::warn!("MARKETMEMO_DEPARTMENTS vazio, usando departamentos padrão");
            } else {
                config.departments = departments;
            }
        }
        config
    }

    pub fn is_known_department(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }
}

// O estado que o binário carrega durante a sessão
pub struct AppState {
    pub config: AppConfig,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        // --- Monta o gráfico de dependências ---
        let slot = FileSlot::new(&config.data_dir);
        let repo = ProductRepository::new(slot, config.storage_key.clone());
        let inventory_service = InventoryService::initialize(repo);

        tracing::info!(
            "✅ Inventário pronto em {} ({} produtos)",
            config.data_dir.display(),
            inventory_service.products().len()
        );

        Self {
            config,
            inventory_service,
        }
    }
}
