pub mod inventory;
pub mod dashboard;
