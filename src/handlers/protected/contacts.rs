// handlers/protected/contacts.rs - /api/contacts[/{id}]

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use validator::Validate;

use crate::api::{blank_to_none, not_blank, LastValueQuery, ValidatedJson};
use crate::app::AppState;
use crate::config;
use crate::database::models::{Contact, ContactData};
use crate::filter::SearchParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ownership, search_contacts};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(
        required(message = "The first name field is required."),
        custom(function = "not_blank", message = "The first name field is required."),
        length(max = 100, message = "The first name field must not be greater than 100 characters.")
    )]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "The last name field must not be greater than 100 characters."))]
    pub last_name: Option<String>,

    #[validate(length(max = 200, message = "The email field must not be greater than 200 characters."))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "The phone field must not be greater than 20 characters."))]
    pub phone: Option<String>,
}

/// Partial update: only fields present in the body change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(
        custom(function = "not_blank", message = "The first name field is required."),
        length(max = 100, message = "The first name field must not be greater than 100 characters.")
    )]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "The last name field must not be greater than 100 characters."))]
    pub last_name: Option<String>,

    #[validate(length(max = 200, message = "The email field must not be greater than 200 characters."))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "The phone field must not be greater than 20 characters."))]
    pub phone: Option<String>,
}

impl UpdateContactRequest {
    fn apply(self, mut data: ContactData) -> ContactData {
        if let Some(first_name) = self.first_name {
            data.first_name = first_name;
        }
        if self.last_name.is_some() {
            data.last_name = blank_to_none(self.last_name);
        }
        if self.email.is_some() {
            data.email = blank_to_none(self.email);
        }
        if self.phone.is_some() {
            data.phone = blank_to_none(self.phone);
        }
        data
    }
}

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateContactRequest>,
) -> ApiResult<Contact> {
    let data = ContactData {
        first_name: body.first_name.unwrap_or_default(),
        last_name: blank_to_none(body.last_name),
        email: blank_to_none(body.email),
        phone: blank_to_none(body.phone),
    };
    let contact = state.store.insert_contact(user.id, data).await?;
    Ok(ApiResponse::created(contact))
}

/// GET /api/contacts/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    let contact_id = ownership::parse_id(&id)?;
    let contact = ownership::resolve_contact(state.store.as_ref(), user.id, contact_id).await?;
    Ok(ApiResponse::success(contact))
}

/// PATCH /api/contacts/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateContactRequest>,
) -> ApiResult<Contact> {
    let contact_id = ownership::parse_id(&id)?;
    let contact = ownership::resolve_contact(state.store.as_ref(), user.id, contact_id).await?;

    let updated = state.store.update_contact(contact.id, body.apply(contact.data())).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/contacts/{id} - removes the contact and its addresses
pub async fn delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let contact_id = ownership::parse_id(&id)?;
    let contact = ownership::resolve_contact(state.store.as_ref(), user.id, contact_id).await?;

    state.store.delete_contact(contact.id).await?;
    if config::config().security.enable_audit_logging {
        tracing::info!("User {} deleted contact {}", user.id, contact.id);
    }
    Ok(ApiResponse::success(true))
}

/// GET /api/contacts?name=&email=&phone=&page=&size=
pub async fn search(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    LastValueQuery(params): LastValueQuery<SearchParams>,
) -> ApiResult<Vec<Contact>> {
    let (filter, page) = params.into_parts(&config::config().search);
    let result = search_contacts(state.store.as_ref(), user.id, &filter, page).await?;
    Ok(ApiResponse::paged(result))
}
