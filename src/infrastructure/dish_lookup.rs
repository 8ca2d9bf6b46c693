use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::Dish;
use crate::domain::ports::DishLookup;
use crate::schema::dishes;

use super::models::DishRow;

/// Read-only view of the catalog's `dishes` table.
pub struct DieselDishLookup {
    pool: DbPool,
}

impl DieselDishLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DishLookup for DieselDishLookup {
    fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Dish>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<DishRow> = dishes::table
            .filter(dishes::id.eq_any(ids.to_vec()))
            .select(DishRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Dish::from).collect())
    }
}
