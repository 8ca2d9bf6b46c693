use std::collections::HashMap;

use crate::domain::errors::DomainError;
use crate::domain::money::Money;
use crate::domain::order::{
    calc_total, Dish, ListResult, NewItem, NewOrder, Order, OrderFilter, OrderLineRequest,
    OrderReplacement, OrderStatus, Pagination, Requester, Transition,
};
use crate::domain::policy::{authorize, Action};
use crate::domain::ports::{DishLookup, OrderRepository};

pub struct OrderService<R, D> {
    repo: R,
    dishes: D,
}

/// Raw admin input for a full replace, checked only once the requester is
/// known to be an admin. `total` is stored as given.
#[derive(Debug, Clone)]
pub struct ReplaceOrder {
    pub status: i16,
    pub user_id: i32,
    pub total: f64,
    pub lines: Vec<OrderLineRequest>,
}

impl<R: OrderRepository, D: DishLookup> OrderService<R, D> {
    pub fn new(repo: R, dishes: D) -> Self {
        Self { repo, dishes }
    }

    pub fn create_order(
        &self,
        requester: &Requester,
        lines: &[OrderLineRequest],
    ) -> Result<Order, DomainError> {
        let items = self.build_items(lines)?;
        let total = calc_total(&items)?;

        let order = self.repo.create(NewOrder {
            user_id: requester.id,
            status: OrderStatus::Created,
            total,
            items,
        })?;
        log::info!(
            "order {} created by user {} with total {}",
            order.id,
            order.user_id,
            order.total
        );
        Ok(order)
    }

    pub fn get_order(&self, requester: &Requester, id: i32) -> Result<Order, DomainError> {
        let order = self.find_existing(id)?;
        authorize(requester, Action::View, Some(order.user_id))?;
        Ok(order)
    }

    /// Non-admins always see their own orders; `user_id` only narrows an
    /// admin listing.
    pub fn list_orders(
        &self,
        requester: &Requester,
        user_id: Option<i32>,
        page: Pagination,
    ) -> Result<ListResult, DomainError> {
        self.repo.list(Self::visible_to(requester, user_id), page)
    }

    /// Move the order to `Canceled` unless it already reached a terminal state.
    pub fn cancel_order(&self, requester: &Requester, id: i32) -> Result<Transition, DomainError> {
        let order = self.find_existing(id)?;
        authorize(requester, Action::Cancel, Some(order.user_id))?;

        if !order.status.can_transition_to(OrderStatus::Canceled) {
            return Ok(Transition::Unchanged(order));
        }
        self.write_status(order, OrderStatus::Canceled)
    }

    /// Admin override: any status may follow any other.
    ///
    /// `status` is the wire ordinal; it is validated after the admin check.
    pub fn set_status(
        &self,
        requester: &Requester,
        id: i32,
        status: impl Into<i16>,
    ) -> Result<Transition, DomainError> {
        authorize(requester, Action::ChangeStatus, None)?;
        let status = OrderStatus::try_from(status.into())?;
        let order = self.find_existing(id)?;

        if order.status == status {
            return Ok(Transition::Unchanged(order));
        }
        self.write_status(order, status)
    }

    pub fn replace_order(
        &self,
        requester: &Requester,
        id: i32,
        replace: ReplaceOrder,
    ) -> Result<Order, DomainError> {
        authorize(requester, Action::Replace, None)?;
        let status = OrderStatus::try_from(replace.status)?;
        let total = Money::from_major_units(replace.total)?;
        let items = self.build_items(&replace.lines)?;

        let recomputed = calc_total(&items)?;
        if recomputed != total {
            log::warn!(
                "order {} replaced with total {} but its items cost {}",
                id,
                total,
                recomputed
            );
        }

        let order = self
            .repo
            .replace(
                id,
                OrderReplacement {
                    status,
                    user_id: replace.user_id,
                    total,
                    items,
                },
            )?
            .ok_or(DomainError::OrderNotFound(id))?;
        log::info!("order {} replaced by admin {}", id, requester.id);
        Ok(order)
    }

    /// Validate the requested lines and capture each dish's current price.
    ///
    /// All distinct dish ids are resolved in one lookup; the first id the
    /// catalog does not know fails the whole build.
    pub fn build_items(&self, lines: &[OrderLineRequest]) -> Result<Vec<NewItem>, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::validation("items must not be empty"));
        }
        if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
            return Err(DomainError::validation(format!(
                "quantity for dish {} must be greater than 0",
                line.dish_id
            )));
        }

        let mut ids: Vec<i32> = lines.iter().map(|l| l.dish_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let dishes: HashMap<i32, Dish> = self
            .dishes
            .find_by_ids(&ids)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        lines
            .iter()
            .map(|line| -> Result<NewItem, DomainError> {
                let dish = dishes
                    .get(&line.dish_id)
                    .ok_or(DomainError::DishNotFound(line.dish_id))?;
                Ok(NewItem {
                    dish_id: dish.id,
                    quantity: line.quantity,
                    unit_price: dish.price.clone(),
                })
            })
            .collect()
    }

    fn visible_to(requester: &Requester, user_id: Option<i32>) -> OrderFilter {
        if requester.is_admin {
            OrderFilter { user_id }
        } else {
            OrderFilter {
                user_id: Some(requester.id),
            }
        }
    }

    fn find_existing(&self, id: i32) -> Result<Order, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::OrderNotFound(id))
    }

    fn write_status(&self, order: Order, status: OrderStatus) -> Result<Transition, DomainError> {
        let updated = self
            .repo
            .update_status(order.id, order.version, status)?
            .ok_or(DomainError::Conflict(order.id))?;
        log::info!(
            "order {} status {:?} -> {:?}",
            updated.id,
            order.status,
            updated.status
        );
        Ok(Transition::Applied(updated))
    }
}
