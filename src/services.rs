pub mod inventory_service;
pub use inventory_service::{InventoryService, Outcome, Persistence};
pub mod dashboard_service;
