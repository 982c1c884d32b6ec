// handlers/protected/addresses.rs - /api/contacts/{contactId}/addresses[/{addressId}]

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use validator::Validate;

use crate::api::{blank_to_none, not_blank, ValidatedJson};
use crate::app::AppState;
use crate::config;
use crate::database::models::{Address, AddressData};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ownership;

/// Body of both create and full replace
#[derive(Debug, Deserialize, Validate)]
pub struct AddressRequest {
    #[validate(length(max = 200, message = "The street field must not be greater than 200 characters."))]
    pub street: Option<String>,

    #[validate(length(max = 100, message = "The city field must not be greater than 100 characters."))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "The province field must not be greater than 100 characters."))]
    pub province: Option<String>,

    #[validate(
        required(message = "The country field is required."),
        custom(function = "not_blank", message = "The country field is required."),
        length(max = 100, message = "The country field must not be greater than 100 characters.")
    )]
    pub country: Option<String>,

    #[validate(length(max = 10, message = "The postal code field must not be greater than 10 characters."))]
    pub postal_code: Option<String>,
}

impl From<AddressRequest> for AddressData {
    fn from(body: AddressRequest) -> Self {
        AddressData {
            street: blank_to_none(body.street),
            city: blank_to_none(body.city),
            province: blank_to_none(body.province),
            country: body.country.unwrap_or_default(),
            postal_code: blank_to_none(body.postal_code),
        }
    }
}

/// GET /api/contacts/{contactId}/addresses
pub async fn list(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> ApiResult<Vec<Address>> {
    let contact_id = ownership::parse_id(&contact_id)?;
    let contact = ownership::resolve_contact(state.store.as_ref(), user.id, contact_id).await?;

    let addresses = state.store.list_addresses(contact.id).await?;
    Ok(ApiResponse::success(addresses))
}

/// POST /api/contacts/{contactId}/addresses
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(contact_id): Path<String>,
    ValidatedJson(body): ValidatedJson<AddressRequest>,
) -> ApiResult<Address> {
    let contact_id = ownership::parse_id(&contact_id)?;
    let contact = ownership::resolve_contact(state.store.as_ref(), user.id, contact_id).await?;

    let address = state.store.insert_address(contact.id, body.into()).await?;
    Ok(ApiResponse::created(address))
}

/// GET /api/contacts/{contactId}/addresses/{addressId}
pub async fn get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<Address> {
    let (contact_id, address_id) = (ownership::parse_id(&contact_id)?, ownership::parse_id(&address_id)?);
    let (_, address) = ownership::resolve_address(state.store.as_ref(), user.id, contact_id, address_id).await?;
    Ok(ApiResponse::success(address))
}

/// PUT /api/contacts/{contactId}/addresses/{addressId} - replaces every field
pub async fn update(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
    ValidatedJson(body): ValidatedJson<AddressRequest>,
) -> ApiResult<Address> {
    let (contact_id, address_id) = (ownership::parse_id(&contact_id)?, ownership::parse_id(&address_id)?);
    let (_, address) = ownership::resolve_address(state.store.as_ref(), user.id, contact_id, address_id).await?;

    let updated = state.store.update_address(address.id, body.into()).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/contacts/{contactId}/addresses/{addressId}
pub async fn delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<bool> {
    let (contact_id, address_id) = (ownership::parse_id(&contact_id)?, ownership::parse_id(&address_id)?);
    let (contact, address) =
        ownership::resolve_address(state.store.as_ref(), user.id, contact_id, address_id).await?;

    state.store.delete_address(address.id).await?;
    if config::config().security.enable_audit_logging {
        tracing::info!("User {} deleted address {} of contact {}", user.id, address.id, contact.id);
    }
    Ok(ApiResponse::success(true))
}
