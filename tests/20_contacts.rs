mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use contact_api::database::Store;

use common::{not_found_body, unauthorized_body, TestApp, BOWO_TOKEN, CREATOR_TOKEN};

fn leonardo() -> serde_json::Value {
    json!({
        "first_name": "Leonardo",
        "last_name": "Nifinluri",
        "email": "leonardo@gmail.com",
        "phone": "0899999"
    })
}

#[tokio::test]
async fn create_contact_belongs_to_caller() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;

    let (status, body) = app.post("/api/contacts", Some(CREATOR_TOKEN), leonardo()).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["first_name"], "Leonardo");
    assert_eq!(body["data"]["last_name"], "Nifinluri");
    assert_eq!(body["data"]["email"], "leonardo@gmail.com");
    assert_eq!(body["data"]["phone"], "0899999");
    assert_eq!(body["data"]["user_id"], users.creator.id);
    Ok(())
}

#[tokio::test]
async fn create_contact_with_only_first_name() -> Result<()> {
    let app = TestApp::new();
    app.seed_users().await?;

    let (status, body) = app
        .post("/api/contacts", Some(CREATOR_TOKEN), json!({ "first_name": "Leonardo", "email": "" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["last_name"].is_null());
    assert!(body["data"]["email"].is_null());
    assert!(body["data"]["phone"].is_null());
    Ok(())
}

#[tokio::test]
async fn create_contact_validates_fields() -> Result<()> {
    let app = TestApp::new();
    app.seed_users().await?;

    let (status, body) = app
        .post(
            "/api/contacts",
            Some(CREATOR_TOKEN),
            json!({ "first_name": "", "phone": "0".repeat(21), "email": "x".repeat(201) }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["first_name"], json!(["The first name field is required."]));
    assert!(body["errors"]["phone"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"].get("last_name").is_none());
    Ok(())
}

#[tokio::test]
async fn authentication_is_checked_before_validation() -> Result<()> {
    let app = TestApp::new();
    app.seed_users().await?;

    let (status, body) = app.post("/api/contacts", None, json!({ "first_name": "" })).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized_body());

    let (status, body) = app.post("/api/contacts", Some("salah"), leonardo()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized_body());
    Ok(())
}

#[tokio::test]
async fn get_contact_of_owner() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let contact = &contacts[0];

    let (status, body) = app.get(&format!("/api/contacts/{}", contact.id), Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], contact.id);
    assert_eq!(body["data"]["first_name"], "Leonardo1");
    Ok(())
}

#[tokio::test]
async fn foreign_and_missing_contacts_look_identical() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let foreign = format!("/api/contacts/{}", contacts[0].id);
    let missing = format!("/api/contacts/{}", contacts[19].id + 1000);

    let (foreign_status, foreign_body) = app.get(&foreign, Some(BOWO_TOKEN)).await?;
    let (missing_status, missing_body) = app.get(&missing, Some(BOWO_TOKEN)).await?;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body, not_found_body());
    assert_eq!(foreign_body, missing_body);

    let (status, body) = app.get("/api/contacts/abc", Some(BOWO_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());
    Ok(())
}

#[tokio::test]
async fn update_contact_changes_only_given_fields() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let uri = format!("/api/contacts/{}", contacts[0].id);

    let (status, body) = app
        .patch(&uri, Some(CREATOR_TOKEN), json!({ "first_name": "Budi", "phone": "08123" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Budi");
    assert_eq!(body["data"]["phone"], "08123");
    assert_eq!(body["data"]["last_name"], "Nifinluri1");
    assert_eq!(body["data"]["email"], "leonardo1@gmail.com");

    let stored = app.store.find_contact(contacts[0].id).await?.map(|c| c.first_name);
    assert_eq!(stored.as_deref(), Some("Budi"));
    Ok(())
}

#[tokio::test]
async fn update_foreign_contact_is_not_found_and_unchanged() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let uri = format!("/api/contacts/{}", contacts[0].id);

    let (status, body) = app.patch(&uri, Some(BOWO_TOKEN), json!({ "first_name": "Budi" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());

    let stored = app.store.find_contact(contacts[0].id).await?.map(|c| c.first_name);
    assert_eq!(stored.as_deref(), Some("Leonardo1"));
    Ok(())
}

#[tokio::test]
async fn validation_is_checked_before_ownership() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let uri = format!("/api/contacts/{}", contacts[0].id);

    let (status, body) = app.patch(&uri, Some(BOWO_TOKEN), json!({ "first_name": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["first_name"].is_array());
    Ok(())
}

#[tokio::test]
async fn delete_contact_removes_it_and_its_addresses() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;
    let addresses = app.seed_addresses(&contacts).await?;
    let contact = &contacts[0];
    let uri = format!("/api/contacts/{}", contact.id);

    assert_eq!(app.store.list_addresses(contact.id).await?.len(), 2);

    let (status, body) = app.delete(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": true }));

    let (status, _) = app.get(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.store.list_addresses(contact.id).await?.is_empty());
    let (status, body) = app
        .get(&format!("{}/addresses/{}", uri, addresses[0].id), Some(CREATOR_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());

    // Siblings keep their addresses
    assert_eq!(app.store.list_addresses(contacts[1].id).await?.len(), 2);

    let (status, _) = app.delete(&uri, Some(CREATOR_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_foreign_contact_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let users = app.seed_users().await?;
    let contacts = app.seed_search_contacts(users.creator.id).await?;

    let (status, body) = app
        .delete(&format!("/api/contacts/{}", contacts[0].id), Some(BOWO_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found_body());
    assert!(app.store.find_contact(contacts[0].id).await?.is_some());
    Ok(())
}
