use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, AddressData, Contact, ContactData, NewUser, User};
use crate::filter::Predicate;

/// Persistence primitives the API is built on. Implementations do no
/// ownership checking of their own; callers go through `services::ownership`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    /// Session lookup: the user whose token equals `token` exactly
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    /// Persist `name` and `password` of an existing user
    async fn update_user(&self, user: &User) -> Result<User, DatabaseError>;
    /// Overwrite (or clear, with `None`) the user's session token
    async fn set_user_token(&self, user_id: i64, token: Option<&str>) -> Result<(), DatabaseError>;

    // Contacts
    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError>;
    async fn insert_contact(&self, user_id: i64, data: ContactData) -> Result<Contact, DatabaseError>;
    async fn update_contact(&self, id: i64, data: ContactData) -> Result<Contact, DatabaseError>;
    /// Deletes the contact and all of its addresses
    async fn delete_contact(&self, id: i64) -> Result<bool, DatabaseError>;
    async fn count_contacts(&self, predicates: &[Predicate]) -> Result<u64, DatabaseError>;
    /// Matching contacts ordered by id
    async fn select_contacts(
        &self,
        predicates: &[Predicate],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, DatabaseError>;

    // Addresses
    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError>;
    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError>;
    async fn insert_address(&self, contact_id: i64, data: AddressData) -> Result<Address, DatabaseError>;
    async fn update_address(&self, id: i64, data: AddressData) -> Result<Address, DatabaseError>;
    async fn delete_address(&self, id: i64) -> Result<bool, DatabaseError>;
}
