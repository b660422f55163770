pub mod inventory;
pub mod scanner;
