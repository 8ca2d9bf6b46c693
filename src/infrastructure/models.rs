use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::errors::DomainError;
use crate::domain::money::Money;
use crate::domain::order::{Dish, Item, Order, OrderStatus};
use crate::schema::{dishes, order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: i16,
    pub user_id: i32,
    pub total: BigDecimal,
    pub version: i32,
}

impl OrderRow {
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: OrderStatus::try_from(self.status)
                .map_err(|e| DomainError::Internal(format!("order {}: {}", self.id, e)))?,
            user_id: self.user_id,
            total: Money::ceil_from_decimal(&self.total)
                .map_err(|e| DomainError::Internal(format!("order {}: {}", self.id, e)))?,
            version: self.version,
            items: items.into_iter().map(Item::from).collect(),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub status: i16,
    pub user_id: i32,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl From<OrderItemRow> for Item {
    fn from(row: OrderItemRow) -> Self {
        Item {
            id: row.id,
            order_id: row.order_id,
            dish_id: row.dish_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub dish_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DishRow {
    pub id: i32,
    pub title: String,
    pub price: BigDecimal,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            title: row.title,
            price: row.price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = dishes)]
pub struct NewDishRow {
    pub title: String,
    pub price: BigDecimal,
}
