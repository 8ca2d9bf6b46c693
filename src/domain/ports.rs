use std::sync::Arc;

use super::errors::DomainError;
use super::order::{
    Dish, ListResult, NewOrder, Order, OrderFilter, OrderReplacement, OrderStatus, Pagination,
};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order and its items atomically.
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;
    /// Orders ordered by ascending id, plus the unpaged match count.
    fn list(&self, filter: OrderFilter, page: Pagination) -> Result<ListResult, DomainError>;
    fn count(&self, filter: OrderFilter) -> Result<i64, DomainError>;
    /// Set `status` if the stored version still equals `expected_version`.
    ///
    /// Returns `None` when the order is gone or was written in between.
    fn update_status(
        &self,
        id: i32,
        expected_version: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError>;
    /// Drop all items of the order and write the replacement atomically.
    ///
    /// Returns `None` when the order does not exist.
    fn replace(&self, id: i32, replacement: OrderReplacement)
        -> Result<Option<Order>, DomainError>;
}

/// Read access to the dish catalog.
pub trait DishLookup: Send + Sync + 'static {
    /// Missing ids are simply absent from the result.
    fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Dish>, DomainError>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        (**self).create(order)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self, filter: OrderFilter, page: Pagination) -> Result<ListResult, DomainError> {
        (**self).list(filter, page)
    }

    fn count(&self, filter: OrderFilter) -> Result<i64, DomainError> {
        (**self).count(filter)
    }

    fn update_status(
        &self,
        id: i32,
        expected_version: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError> {
        (**self).update_status(id, expected_version, status)
    }

    fn replace(
        &self,
        id: i32,
        replacement: OrderReplacement,
    ) -> Result<Option<Order>, DomainError> {
        (**self).replace(id, replacement)
    }
}

impl<T: DishLookup + ?Sized> DishLookup for Arc<T> {
    fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Dish>, DomainError> {
        (**self).find_by_ids(ids)
    }
}
