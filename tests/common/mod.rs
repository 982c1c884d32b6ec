#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use contact_api::auth::password::hash_password;
use contact_api::database::models::{Address, AddressData, Contact, ContactData, NewUser, User};
use contact_api::database::{InMemoryStore, Store};
use contact_api::{app, AppState};

pub const PASSWORD: &str = "12345678";
pub const CREATOR_TOKEN: &str = "TEKNIK";
pub const BOWO_TOKEN: &str = "BOWO";

// Argon2 is deliberately slow; hash the shared fixture password once per test binary
static PASSWORD_HASH: OnceLock<String> = OnceLock::new();

fn password_hash() -> String {
    PASSWORD_HASH
        .get_or_init(|| hash_password(PASSWORD).expect("failed to hash fixture password"))
        .clone()
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    router: Router,
}

pub struct Seeded {
    pub creator: User,
    pub bowo: User,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let router = app(AppState::new(store.clone()));
        Self { store, router }
    }

    /// `creator09` (token TEKNIK) and `bowo09` (token BOWO)
    pub async fn seed_users(&self) -> Result<Seeded> {
        let creator = self.seed_user("creator09", "Leonardo", CREATOR_TOKEN).await?;
        let bowo = self.seed_user("bowo09", "Bowo", BOWO_TOKEN).await?;
        Ok(Seeded { creator, bowo })
    }

    async fn seed_user(&self, username: &str, name: &str, token: &str) -> Result<User> {
        let mut user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                password: password_hash(),
                name: name.to_string(),
            })
            .await?;
        self.store.set_user_token(user.id, Some(token)).await?;
        user.token = Some(token.to_string());
        Ok(user)
    }

    /// Leonardo1..20 / Nifinluri1..20, leonardoN@gmail.com, 089999N
    pub async fn seed_search_contacts(&self, user_id: i64) -> Result<Vec<Contact>> {
        let mut contacts = Vec::new();
        for i in 1..=20 {
            let contact = self
                .store
                .insert_contact(
                    user_id,
                    ContactData {
                        first_name: format!("Leonardo{}", i),
                        last_name: Some(format!("Nifinluri{}", i)),
                        email: Some(format!("leonardo{}@gmail.com", i)),
                        phone: Some(format!("089999{}", i)),
                    },
                )
                .await?;
            contacts.push(contact);
        }
        Ok(contacts)
    }

    /// Two addresses for every contact
    pub async fn seed_addresses(&self, contacts: &[Contact]) -> Result<Vec<Address>> {
        let mut addresses = Vec::new();
        for offset in [0, 11] {
            for (key, contact) in contacts.iter().enumerate() {
                let idx = key + offset;
                let address = self
                    .store
                    .insert_address(
                        contact.id,
                        AddressData {
                            street: Some(format!("Badak{}", idx)),
                            city: Some(format!("Manado{}", idx)),
                            province: Some("Sulawesi Utara".to_string()),
                            country: "Indonesia".to_string(),
                            postal_code: Some(format!("9023{}", idx)),
                        },
                    )
                    .await?;
                addresses.push(address);
            }
        }
        Ok(addresses)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {} {}", method, uri))?
        };
        Ok((status, payload))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request("PATCH", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request("DELETE", uri, token, None).await
    }
}

pub fn unauthorized_body() -> Value {
    serde_json::json!({ "errors": { "message": ["unauthorized"] } })
}

pub fn not_found_body() -> Value {
    serde_json::json!({ "errors": { "message": ["not found"] } })
}
