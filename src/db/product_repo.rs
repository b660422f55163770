// src/db/product_repo.rs

use crate::{
    common::error::AppError,
    db::slot::KeyValueSlot,
    models::inventory::Product,
};

pub const DEFAULT_STORAGE_KEY: &str = "products";

// O snapshot inteiro (array JSON) vive numa única chave.
pub struct ProductRepository {
    slot: Box<dyn KeyValueSlot>,
    key: String,
}

impl ProductRepository {
    pub fn new(slot: impl KeyValueSlot + 'static, key: impl Into<String>) -> Self {
        Self {
            slot: Box::new(slot),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `Ok(None)` se nada foi salvo ainda. Dados corrompidos viram
    /// `AppError::SerializationError`; quem decide o fallback é o serviço.
    pub fn load(&self) -> Result<Option<Vec<Product>>, AppError> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        let products = serde_json::from_str::<Vec<Product>>(&raw)?;
        tracing::debug!(key = %self.key, count = products.len(), "snapshot carregado");
        Ok(Some(products))
    }

    /// Substitui o snapshot salvo pela coleção inteira.
    pub fn save(&self, products: &[Product]) -> Result<(), AppError> {
        let raw = serde_json::to_string(products)?;
        self.slot.write(&self.key, &raw)?;
        tracing::debug!(key = %self.key, count = products.len(), "snapshot salvo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::slot::{KeyValueSlot, MemorySlot};
    use crate::models::inventory::ProductFormData;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(name: &str, stock: Option<u32>) -> Product {
        Product::new(
            ProductFormData {
                code: format!("{name}-01"),
                name: name.into(),
                price: Decimal::new(1250, 2),
                department: "Açougue".into(),
                notes: Some("corte especial".into()),
                stock,
                min_stock: Some(2),
            },
            Utc::now(),
        )
    }

    #[test]
    fn empty_slot_loads_none() {
        let repo = ProductRepository::new(MemorySlot::new(), DEFAULT_STORAGE_KEY);
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn saved_snapshot_loads_back_field_for_field() {
        let repo = ProductRepository::new(MemorySlot::new(), DEFAULT_STORAGE_KEY);
        let products = vec![product("Picanha", Some(7)), product("Alcatra", None)];

        repo.save(&products).unwrap();
        let loaded = repo.load().unwrap().expect("snapshot");

        assert_eq!(loaded, products);
    }

    #[test]
    fn long_decimal_price_survives_save_and_load() {
        let repo = ProductRepository::new(MemorySlot::new(), DEFAULT_STORAGE_KEY);
        let mut item = product("Maminha", Some(1));
        item.price = "19.99999999999999999".parse().unwrap();

        repo.save(std::slice::from_ref(&item)).unwrap();
        let loaded = repo.load().unwrap().expect("snapshot");

        assert_eq!(loaded, vec![item]);
        assert_eq!(loaded[0].price.to_string(), "19.99999999999999999");
    }

    #[test]
    fn price_is_stored_as_a_json_number() {
        let slot = std::sync::Arc::new(MemorySlot::new());
        let repo = ProductRepository::new(slot.clone(), DEFAULT_STORAGE_KEY);
        repo.save(&[product("Cupim", None)]).unwrap();

        let raw = slot.read(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"price\":12.5"), "{raw}");
    }

    #[test]
    fn corrupt_snapshot_is_a_serialization_error() {
        let repo = ProductRepository::new(
            MemorySlot::with_entry(DEFAULT_STORAGE_KEY, "{not json"),
            DEFAULT_STORAGE_KEY,
        );
        assert!(matches!(repo.load(), Err(AppError::SerializationError(_))));
    }

    #[test]
    fn snapshot_without_optional_fields_still_loads() {
        let raw = r#"[{
            "id": "4f1c1a52-6a47-4f6e-8c1e-3a1d2b7a9e10",
            "code": "001",
            "name": "Arroz",
            "price": 22.9,
            "department": "Mercearia",
            "createdAt": "2024-03-01T12:00:00.000Z",
            "updatedAt": "2024-03-02T08:30:00.000Z"
        }]"#;
        let repo = ProductRepository::new(
            MemorySlot::with_entry(DEFAULT_STORAGE_KEY, raw),
            DEFAULT_STORAGE_KEY,
        );

        let loaded = repo.load().unwrap().expect("snapshot");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].price, Decimal::new(229, 1));
        assert_eq!(loaded[0].stock, None);
        assert!(loaded[0].created_at <= loaded[0].updated_at);
    }
}
