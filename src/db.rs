pub mod slot;
pub use slot::{FileSlot, KeyValueSlot, MemorySlot};
pub mod product_repo;
pub use product_repo::ProductRepository;
