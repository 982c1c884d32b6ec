//! Ownership-scoped resolution of contacts and addresses.
//!
//! Every link of the chain user -> contact -> address must hold. Any broken
//! link yields the same `ResolveError::NotFound`, whether the row is missing
//! or belongs to somebody else.

use thiserror::Error;

use crate::database::models::{Address, Contact};
use crate::database::{DatabaseError, Store};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Parse a path segment as a record id. Anything that is not a positive
/// integer cannot name a row, so it resolves like a missing one.
pub fn parse_id(raw: &str) -> Result<i64, ResolveError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ResolveError::NotFound)
}

pub async fn resolve_contact(store: &dyn Store, user_id: i64, contact_id: i64) -> Result<Contact, ResolveError> {
    match store.find_contact(contact_id).await? {
        Some(contact) if contact.user_id == user_id => Ok(contact),
        _ => {
            tracing::debug!("Contact {} not resolvable for user {}", contact_id, user_id);
            Err(ResolveError::NotFound)
        }
    }
}

/// Resolve an address through its contact; the contact comes back too
pub async fn resolve_address(
    store: &dyn Store,
    user_id: i64,
    contact_id: i64,
    address_id: i64,
) -> Result<(Contact, Address), ResolveError> {
    let contact = resolve_contact(store, user_id, contact_id).await?;

    match store.find_address(address_id).await? {
        Some(address) if address.contact_id == contact.id => Ok((contact, address)),
        _ => {
            tracing::debug!(
                "Address {} not resolvable under contact {} for user {}",
                address_id,
                contact_id,
                user_id
            );
            Err(ResolveError::NotFound)
        }
    }
}
