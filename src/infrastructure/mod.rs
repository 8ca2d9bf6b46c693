pub mod dish_lookup;
pub mod memory;
pub mod models;
pub mod order_repo;

pub use dish_lookup::DieselDishLookup;
pub use memory::{InMemoryDishCatalog, InMemoryOrderRepository};
pub use order_repo::DieselOrderRepository;
