//! Who may do what to an order.

use super::errors::DomainError;
use super::order::Requester;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Cancel,
    ChangeStatus,
    Replace,
    ListAll,
}

pub fn is_allowed(requester: &Requester, action: Action, owner_id: Option<i32>) -> bool {
    if requester.is_admin {
        return true;
    }
    match action {
        Action::View | Action::Cancel => owner_id == Some(requester.id),
        Action::ChangeStatus | Action::Replace | Action::ListAll => false,
    }
}

/// `owner_id` is `None` for actions checked before an order is loaded.
pub fn authorize(
    requester: &Requester,
    action: Action,
    owner_id: Option<i32>,
) -> Result<(), DomainError> {
    if is_allowed(requester, action, owner_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
