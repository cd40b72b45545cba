use algolia_http::{AlgoliaClient, IndexQuery, Record, RequestOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = AlgoliaClient::from_env()?;

    let record = Record::from_json(json!({
        "objectID": "kit-1",
        "title": "Kit",
        "brand": "acme",
    }))?;
    let saved = client.save_object("demo_products", &record, ()).await?;
    println!("saved: {saved}");

    let settings = json!({"searchableAttributes": ["title", "brand"]});
    client
        .set_settings(
            "demo_products",
            &settings,
            RequestOptions::default().forward_to_replicas(true),
        )
        .await?;

    let results = client
        .multiple_queries(
            &[
                IndexQuery::new("demo_products", "kit"),
                IndexQuery::new("demo_products", "acme").param("hitsPerPage", 1),
            ],
            (),
        )
        .await?;

    for result in results["results"].as_array().into_iter().flatten() {
        println!("{} hit(s)", result["nbHits"]);
    }

    Ok(())
}
