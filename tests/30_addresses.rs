mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use contact_api::database::Store;

use common::{not_found_body, unauthorized_body, TestApp, BOWO_TOKEN, CREATOR_TOKEN};

fn jalan_badak() -> serde_json::Value {
    json!({
        "street": "Jalan Badak",
        "city": "Manado",
        "province": "Sulawesi Utara",
        "country": "Indonesia",
        "postal_code": "95111"
    })
}

#[tokio::test]
async fn create_address_under_own_contact() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let contact = &contacts[0];

    let (status, body) = app
        .post(&format!("/api/contacts/{}/addresses", contact.id), Some(CREATOR_TOKEN), jalan_badak())
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["street"], "Jalan Badak");
    assert_eq!(body["data"]["country"], "Indonesia");
    assert_eq!(body["data"]["postal_code"], "95111");
    assert_eq!(body["data"]["contact_id"], contact.id);
    Ok(())
}

#[tokio::test]
async fn create_address_with_only_country() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;

    let (status, body) = app
        .post(
            &format!("/api/contacts/{}/addresses", contacts[0].id),
            Some(CREATOR_TOKEN),
            json!({ "country": "Indonesia" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["street"].is_null());
    assert!(body["data"]["city"].is_null());
    assert!(body["data"]["province"].is_null());
    assert!(body["data"]["postal_code"].is_null());
    Ok(())
}

#[tokio::test]
async fn create_address_validates_fields() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let uri = format!("/api/contacts/{}/addresses", contacts[0].id);

    let (status, body) = app
        .post(&uri, Some(CREATOR_TOKEN), json!({ "city": "Manado", "postal_code": "12345678901" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["country"], json!(["The country field is required."]));
    assert!(body["errors"]["postal_code"].is_array());

    let (status, body) = app.post(&uri, Some(CREATOR_TOKEN), json!({ "country": "  " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["country"].is_array());
    Ok(())
}

#[tokio::test]
async fn create_address_requires_token() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;

    let (status, body) = app
        .post(&format!("/api/contacts/{}/addresses", contacts[0].id), None, jalan_badak())
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized_body());
    Ok(())
}

#[tokio::test]
async fn create_address_under_foreign_contact_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;

    let (status, body) = app
        .post(&format!("/api/contacts/{}/addresses", contacts[0].id), Some(BOWO_TOKEN), jalan_badak())
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());
    assert!(app.store.list_addresses(contacts[0].id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn list_addresses_of_contact() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    app.seed_addresses(&contacts).await?;

    let uri = format!("/api/contacts/{}/addresses", contacts[2].id);
    let (status, body) = app.get(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["contact_id"] == contacts[2].id));
    assert!(body.get("meta").is_none());

    let (status, body) = app.get(&uri, Some(BOWO_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());
    Ok(())
}

#[tokio::test]
async fn get_address_checks_the_whole_chain() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let addresses = app.seed_addresses(&contacts).await?;
    let address = &addresses[0];
    assert_eq!(address.contact_id, contacts[0].id);

    let (status, body) = app
        .get(
            &format!("/api/contacts/{}/addresses/{}", contacts[0].id, address.id),
            Some(CREATOR_TOKEN),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], address.id);
    assert_eq!(body["data"]["street"], "Badak0");

    // Right owner, wrong parent contact
    let (status, body) = app
        .get(
            &format!("/api/contacts/{}/addresses/{}", contacts[1].id, address.id),
            Some(CREATOR_TOKEN),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());

    // Wrong owner
    let (status, _) = app
        .get(
            &format!("/api/contacts/{}/addresses/{}", contacts[0].id, address.id),
            Some(BOWO_TOKEN),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(&format!("/api/contacts/{}/addresses/xyz", contacts[0].id), Some(CREATOR_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_address_replaces_every_field() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let addresses = app.seed_addresses(&contacts).await?;
    let address = &addresses[0];
    let uri = format!("/api/contacts/{}/addresses/{}", contacts[0].id, address.id);

    let (status, body) = app
        .put(&uri, Some(CREATOR_TOKEN), json!({ "city": "Bitung", "country": "Indonesia" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Bitung");
    assert!(body["data"]["street"].is_null());
    assert!(body["data"]["province"].is_null());
    assert!(body["data"]["postal_code"].is_null());

    let (status, body) = app.put(&uri, Some(CREATOR_TOKEN), json!({ "city": "Bitung" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["country"].is_array());
    Ok(())
}

#[tokio::test]
async fn update_foreign_address_is_not_found_and_unchanged() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let addresses = app.seed_addresses(&contacts).await?;
    let address = &addresses[0];

    let (status, body) = app
        .put(
            &format!("/api/contacts/{}/addresses/{}", contacts[0].id, address.id),
            Some(BOWO_TOKEN),
            jalan_badak(),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());

    let stored = app.store.find_address(address.id).await?.and_then(|a| a.street);
    assert_eq!(stored.as_deref(), Some("Badak0"));
    Ok(())
}

#[tokio::test]
async fn delete_address() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let addresses = app.seed_addresses(&contacts).await?;
    let address = &addresses[0];
    let uri = format!("/api/contacts/{}/addresses/{}", contacts[0].id, address.id);

    let (status, _) = app.delete(&uri, Some(BOWO_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.store.find_address(address.id).await?.is_some());

    let (status, body) = app.delete(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": true }));
    assert!(app.store.find_address(address.id).await?.is_none());
    assert_eq!(app.store.list_addresses(contacts[0].id).await?.len(), 1);

    let (status, body) = app.delete(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());
    Ok(())
}
