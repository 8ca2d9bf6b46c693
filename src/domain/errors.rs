use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Dish with id {0} doesn't exist")]
    DishNotFound(i32),
    #[error("Order with id {0} doesn't exist")]
    OrderNotFound(i32),
    #[error("Forbidden")]
    Forbidden,
    #[error("Order with id {0} was modified concurrently")]
    Conflict(i32),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}
