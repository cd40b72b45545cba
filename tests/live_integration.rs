use std::time::{Duration, SystemTime, UNIX_EPOCH};

use algolia_http::{AlgoliaClient, AlgoliaError, Record, RequestOptions};
use serde_json::json;

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock must be after epoch")
        .as_millis()
}

#[tokio::test]
async fn live_write_wait_search_and_cleanup() {
    let client = match AlgoliaClient::from_env() {
        Ok(client) => client,
        Err(_) => {
            eprintln!("skipping live test: ALGOLIA_APPLICATION_ID / ALGOLIA_API_KEY not set");
            return;
        }
    };
    let index = format!("algolia_http_live_{}", unique_suffix());
    let interval = Duration::from_millis(200);

    let record = Record::from_json(json!({"objectID": "kit-1", "title": "Kit", "brand": "acme"}))
        .expect("valid record");
    let saved = client
        .wait_with_interval(client.save_object(&index, &record, ()).await, interval)
        .await
        .expect("save must publish");
    assert_eq!(saved["indexName"], index.as_str());

    let object = client
        .get_object(
            &index,
            "kit-1",
            RequestOptions::default().attributes_to_retrieve(["title"]),
        )
        .await
        .expect("object must be readable after wait");
    assert_eq!(object["title"], "Kit");

    let search = client
        .search(&index, "kit", json!({"hitsPerPage": 1}), ())
        .await
        .expect("search must succeed");
    assert_eq!(search["nbHits"], 1);

    let missing = client.get_object(&index, "does-not-exist", ()).await;
    assert!(matches!(missing, Err(AlgoliaError::Http { status: 404, .. })));

    client
        .wait_with_interval(client.delete_index(&index, ()).await, interval)
        .await
        .expect("cleanup must succeed");
}
