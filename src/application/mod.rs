use std::sync::Arc;

use crate::domain::ports::{DishLookup, OrderRepository};

pub mod order_service;

pub use order_service::{OrderService, ReplaceOrder};

/// The service as wired into the HTTP layer, independent of the storage
/// backend behind it.
pub type SharedOrderService = OrderService<Arc<dyn OrderRepository>, Arc<dyn DishLookup>>;
