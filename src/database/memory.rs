use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Address, AddressData, Contact, ContactData, NewUser, User};
use crate::database::store::Store;
use crate::filter::Predicate;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    contacts: BTreeMap<i64, Contact>,
    addresses: BTreeMap<i64, Address>,
    next_user_id: i64,
    next_contact_id: i64,
    next_address_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// `Store` kept entirely in process memory. Ids start at 1 per table and
/// rows iterate in id order, matching the PostgreSQL store's ordering.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching<'a>(tables: &'a Tables, predicates: &'a [Predicate]) -> impl Iterator<Item = &'a Contact> + 'a {
        tables
            .contacts
            .values()
            .filter(move |contact| predicates.iter().all(|p| p.matches(contact)))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict("username already registered".to_string()));
        }
        let now = Utc::now();
        let id = next_id(&mut tables.next_user_id);
        let row = User {
            id,
            username: user.username,
            password: user.password,
            name: user.name,
            token: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn update_user(&self, user: &User) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))?;
        row.name = user.name.clone();
        row.password = user.password.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_user_token(&self, user_id: i64, token: Option<&str>) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(token) = token {
            if tables
                .users
                .values()
                .any(|u| u.id != user_id && u.token.as_deref() == Some(token))
            {
                return Err(DatabaseError::Conflict("token already in use".to_string()));
            }
        }
        let row = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        row.token = token.map(str::to_string);
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.contacts.get(&id).cloned())
    }

    async fn insert_contact(&self, user_id: i64, data: ContactData) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::QueryError(format!("user {} does not exist", user_id)));
        }
        let now = Utc::now();
        let id = next_id(&mut tables.next_contact_id);
        let row = Contact {
            id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.insert(id, row.clone());
        Ok(row)
    }

    async fn update_contact(&self, id: i64, data: ContactData) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .contacts
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("contact {}", id)))?;
        row.first_name = data.first_name;
        row.last_name = data.last_name;
        row.email = data.email;
        row.phone = data.phone;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_contact(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let removed = tables.contacts.remove(&id).is_some();
        if removed {
            tables.addresses.retain(|_, address| address.contact_id != id);
        }
        Ok(removed)
    }

    async fn count_contacts(&self, predicates: &[Predicate]) -> Result<u64, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(Self::matching(&tables, predicates).count() as u64)
    }

    async fn select_contacts(
        &self,
        predicates: &[Predicate],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, DatabaseError> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(Self::matching(&tables, predicates)
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.get(&id).cloned())
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .values()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect())
    }

    async fn insert_address(&self, contact_id: i64, data: AddressData) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.contacts.contains_key(&contact_id) {
            return Err(DatabaseError::QueryError(format!("contact {} does not exist", contact_id)));
        }
        let now = Utc::now();
        let id = next_id(&mut tables.next_address_id);
        let row = Address {
            id,
            street: data.street,
            city: data.city,
            province: data.province,
            country: data.country,
            postal_code: data.postal_code,
            contact_id,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.insert(id, row.clone());
        Ok(row)
    }

    async fn update_address(&self, id: i64, data: AddressData) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .addresses
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("address {}", id)))?;
        row.street = data.street;
        row.city = data.city;
        row.province = data.province;
        row.country = data.country;
        row.postal_code = data.postal_code;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_address(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.addresses.remove(&id).is_some())
    }
}
