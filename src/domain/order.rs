use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::money::{item_cost, Money};

/// Lifecycle of an order. Stored and serialized by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Created = 0,
    InProgress = 1,
    Done = 2,
    Canceled = 3,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Canceled)
    }

    /// Whether the regular workflow permits moving from `self` to `next`.
    ///
    /// Admins bypass this through `OrderService::set_status`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, InProgress) | (InProgress, Done) | (Created | InProgress, Canceled)
        )
    }
}

impl TryFrom<i16> for OrderStatus {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::Created),
            1 => Ok(OrderStatus::InProgress),
            2 => Ok(OrderStatus::Done),
            3 => Ok(OrderStatus::Canceled),
            other => Err(DomainError::validation(format!(
                "status must be between 0 and 3, got {}",
                other
            ))),
        }
    }
}

impl From<OrderStatus> for i16 {
    fn from(status: OrderStatus) -> i16 {
        status as i16
    }
}

/// Authenticated caller, attached to the request by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: i32,
    pub is_admin: bool,
}

/// One requested `(dish, quantity)` pair, before the dish is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub dish_id: i32,
    pub quantity: i32,
}

/// A dish as seen through the catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: i32,
    pub title: String,
    pub price: BigDecimal,
}

/// An item ready to be persisted, with the dish price captured.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub dish_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl NewItem {
    pub fn cost(&self) -> Result<Money, DomainError> {
        item_cost(&self.unit_price, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i32,
    pub order_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl Item {
    pub fn cost(&self) -> Result<Money, DomainError> {
        item_cost(&self.unit_price, self.quantity)
    }
}

/// Sum of the rounded per-item costs.
pub fn calc_total(items: &[NewItem]) -> Result<Money, DomainError> {
    items.iter().try_fold(Money::ZERO, |total, item| {
        total
            .checked_add(item.cost()?)
            .ok_or_else(|| DomainError::validation("total is out of range"))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i32,
    pub status: OrderStatus,
    pub total: Money,
    pub items: Vec<NewItem>,
}

/// Values written by a full admin replace.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReplacement {
    pub status: OrderStatus,
    pub user_id: i32,
    pub total: Money,
    pub items: Vec<NewItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub user_id: i32,
    pub total: Money,
    /// Incremented on every write; status updates are conditional on it.
    pub version: i32,
    pub items: Vec<Item>,
}

/// Outcome of a status mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Applied(Order),
    Unchanged(Order),
}

impl Transition {
    pub fn order(&self) -> &Order {
        match self {
            Transition::Applied(o) | Transition::Unchanged(o) => o,
        }
    }

    pub fn into_order(self) -> Order {
        match self {
            Transition::Applied(o) | Transition::Unchanged(o) => o,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Saturates instead of wrapping; a saturated offset is past any data.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Restricts a listing to one user's orders when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    /// Matching orders regardless of the page window.
    pub total: i64,
}
