//! Mutex-backed adapters with the same contract as the diesel ones.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use crate::domain::errors::DomainError;
use crate::domain::order::{
    Dish, Item, ListResult, NewItem, NewOrder, Order, OrderFilter, OrderReplacement, OrderStatus,
    Pagination,
};
use crate::domain::ports::{DishLookup, OrderRepository};

#[derive(Default)]
struct State {
    orders: BTreeMap<i32, Order>,
    next_order_id: i32,
    next_item_id: i32,
}

impl State {
    fn build_items(&mut self, order_id: i32, items: Vec<NewItem>) -> Vec<Item> {
        items
            .into_iter()
            .map(|i| {
                self.next_item_id += 1;
                Item {
                    id: self.next_item_id,
                    order_id,
                    dish_id: i.dish_id,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                }
            })
            .collect()
    }
}

/// Orders live in a `BTreeMap`, so iteration is already by ascending id.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.orders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

/// `updated_at` must move forward even when two writes share a clock tick.
fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

fn is_visible(filter: &OrderFilter, order: &Order) -> bool {
    filter.user_id.map_or(true, |uid| order.user_id == uid)
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut state = self.lock()?;
        state.next_order_id += 1;
        let id = state.next_order_id;
        let now = Utc::now();
        let items = state.build_items(id, order.items);

        let created = Order {
            id,
            created_at: now,
            updated_at: now,
            status: order.status,
            user_id: order.user_id,
            total: order.total,
            version: 1,
            items,
        };
        state.orders.insert(id, created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError> {
        Ok(self.lock()?.orders.get(&id).cloned())
    }

    fn list(&self, filter: OrderFilter, page: Pagination) -> Result<ListResult, DomainError> {
        let state = self.lock()?;
        let matching: Vec<&Order> = state
            .orders
            .values()
            .filter(|o| is_visible(&filter, o))
            .collect();

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        Ok(ListResult {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    fn count(&self, filter: OrderFilter) -> Result<i64, DomainError> {
        let state = self.lock()?;
        Ok(state.orders.values().filter(|o| is_visible(&filter, o)).count() as i64)
    }

    fn update_status(
        &self,
        id: i32,
        expected_version: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError> {
        let mut state = self.lock()?;
        let Some(order) = state.orders.get_mut(&id) else {
            return Ok(None);
        };
        if order.version != expected_version {
            return Ok(None);
        }
        order.status = status;
        order.updated_at = touch(order.updated_at);
        order.version += 1;
        Ok(Some(order.clone()))
    }

    fn replace(
        &self,
        id: i32,
        replacement: OrderReplacement,
    ) -> Result<Option<Order>, DomainError> {
        let mut state = self.lock()?;
        if !state.orders.contains_key(&id) {
            return Ok(None);
        }
        let items = state.build_items(id, replacement.items);
        let Some(order) = state.orders.get_mut(&id) else {
            return Ok(None);
        };
        order.status = replacement.status;
        order.user_id = replacement.user_id;
        order.total = replacement.total;
        order.items = items;
        order.updated_at = touch(order.updated_at);
        order.version += 1;
        Ok(Some(order.clone()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDishCatalog {
    dishes: Arc<HashMap<i32, Dish>>,
}

impl InMemoryDishCatalog {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self {
            dishes: Arc::new(dishes.into_iter().map(|d| (d.id, d)).collect()),
        }
    }
}

impl DishLookup for InMemoryDishCatalog {
    fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Dish>, DomainError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.dishes.get(id).cloned())
            .collect())
    }
}
