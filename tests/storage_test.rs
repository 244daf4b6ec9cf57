//! Tests for StorageLister against a mocked Cloud Storage JSON API.

mod common;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use common::{authenticator, mock_token, path, TOKEN};
use drive_archive::models::UNKNOWN_DIMENSIONS;
use drive_archive::{Error, StorageConfig, StorageLister, StorageObjectSummary, STORAGE_READ_SCOPE};

fn lister(server: &ServerGuard) -> StorageLister {
    let config = StorageConfig {
        api_base: format!("{}/storage/v1", server.url()),
    };
    StorageLister::new(authenticator(server, STORAGE_READ_SCOPE), config).unwrap()
}

#[tokio::test]
async fn lists_dimensions_of_each_object() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let list = server
        .mock("GET", path("/storage/v1/b/photos/o"))
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_body(json!({"items": [{"name": "a.png", "metadata": {"dimensions": "800x600"}}]}).to_string())
        .create_async()
        .await;

    let objects = lister(&server).list_objects("photos").await.unwrap();

    assert_eq!(
        objects,
        vec![StorageObjectSummary {
            name: "a.png".to_string(),
            dimensions: "800x600".to_string(),
        }]
    );
    list.assert_async().await;
}

#[tokio::test]
async fn missing_attribute_reports_sentinel_across_pages() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _first = server
        .mock("GET", path("/storage/v1/b/photos/o"))
        .match_query(Matcher::Regex(r"^fields=[^&]*$".into()))
        .with_status(200)
        .with_body(
            json!({
                "items": [
                    {"name": "a.png", "metadata": {"dimensions": "800x600"}},
                    {"name": "raw.bin"}
                ],
                "nextPageToken": "next"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _second = server
        .mock("GET", path("/storage/v1/b/photos/o"))
        .match_query(Matcher::UrlEncoded("pageToken".into(), "next".into()))
        .with_status(200)
        .with_body(json!({"items": [{"name": "c.png", "metadata": {"owner": "jezza"}}]}).to_string())
        .create_async()
        .await;

    let objects = lister(&server).list_objects("photos").await.unwrap();

    let dims: Vec<(&str, &str)> = objects
        .iter()
        .map(|o| (o.name.as_str(), o.dimensions.as_str()))
        .collect();
    assert_eq!(
        dims,
        vec![
            ("a.png", "800x600"),
            ("raw.bin", UNKNOWN_DIMENSIONS),
            ("c.png", UNKNOWN_DIMENSIONS),
        ]
    );
}

#[tokio::test]
async fn empty_bucket() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _list = server
        .mock("GET", path("/storage/v1/b/empty/o"))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    assert!(lister(&server).list_objects("empty").await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_bucket() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _list = server
        .mock("GET", path("/storage/v1/b/nope/o"))
        .with_status(404)
        .with_body(json!({"error": {"code": 404, "message": "The specified bucket does not exist."}}).to_string())
        .create_async()
        .await;

    let err = lister(&server).list_objects("nope").await.unwrap_err();
    assert!(matches!(err, Error::BucketNotFound(ref b) if b == "nope"));
}

#[tokio::test]
async fn forbidden_bucket() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server).await;
    let _list = server
        .mock("GET", path("/storage/v1/b/secret/o"))
        .with_status(403)
        .with_body(
            json!({"error": {"code": 403, "message": "caller does not have storage.objects.list access"}})
                .to_string(),
        )
        .create_async()
        .await;

    let err = lister(&server).list_objects("secret").await.unwrap_err();
    assert!(matches!(err, Error::AccessDenied(ref msg) if msg.contains("storage.objects.list")));
}
