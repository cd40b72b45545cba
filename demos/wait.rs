use std::time::Duration;

use algolia_http::{AlgoliaClient, AlgoliaError, BatchOperation};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = AlgoliaClient::from_env()?;

    let operations = [
        BatchOperation::add(json!({"title": "Alice"})).in_index("demo_users"),
        BatchOperation::add(json!({"title": "Acme"})).in_index("demo_companies"),
    ];

    // Polling has no upper bound of its own.
    let written = client.batch_multiple(&operations, ()).await;
    let waited = tokio::time::timeout(Duration::from_secs(30), client.wait(written)).await;

    match waited {
        Ok(Ok(response)) => println!("published: {}", response["objectIDs"]),
        Ok(Err(AlgoliaError::Http { status, body })) => eprintln!("rejected ({status}): {body}"),
        Ok(Err(err)) if err.is_transport_failure() => eprintln!("all hosts unreachable: {err}"),
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => eprintln!("tasks still pending after 30s"),
    }

    Ok(())
}
