//! Basic query builder example
//!
//! This example demonstrates:
//! - Resolving a client from `.db_conf`, explicit parameters or `SURREAL_*` variables
//! - Creating records with CONTENT payloads
//! - Selecting, relating and updating records
//! - Switching namespace and database
//!
//! Requires a running SurrealDB, for example:
//! `surreal start --user root --pass root memory`
//!
//! Run with: cargo run --example basic_usage

use surreal_query::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Surreal Query - Basic Usage Example ===\n");

    // An existing .db_conf takes precedence over these; SURREAL_* variables are the last resort
    println!("1. Resolving client...");
    let config = Config::builder()
        .url("ws://localhost:8000/rpc")
        .namespace("test")
        .database("test")
        .username("root")
        .password("root")
        .build()?;
    let kind = config
        .kind()
        .ok_or_else(|| QueryError::config("no connection settings found"))?;
    println!("   ✓ Using the {} client\n", kind);

    let mut query = Query::new(&config);

    println!("2. Creating records...");
    query.create("person:tobie").content(QueryArg::map([
        ("name", QueryArg::from("Tobie")),
        ("company", QueryArg::from("SurrealDB")),
        ("skills", QueryArg::from(vec!["Rust", "Go", "JavaScript"])),
    ]));
    query.execute().await?;
    query
        .create("company:surrealdb")
        .content(QueryArg::map([("name", "SurrealDB"), ("founded", "2021-09-10")]));
    query.execute().await?;
    println!("   ✓ Created person:tobie and company:surrealdb\n");

    println!("3. Relating records...");
    query.relate_content(
        "person:tobie",
        "works_at",
        "company:surrealdb",
        QueryArg::map([("role", "founder")]),
    );
    query.execute().await?;
    println!("   ✓ {}\n", query.last_query());

    println!("4. Selecting records...");
    let people = query
        .select(vec!["name", "skills"])
        .from("person")
        .where_("company = 'SurrealDB'")
        .execute()
        .await?;
    println!("   Found: {}\n", people);

    println!("5. Updating records...");
    let updated = query
        .update("person:tobie")
        .merge(QueryArg::map([("active", true)]))
        .return_("AFTER")
        .execute()
        .await?;
    println!("   ✓ {}\n", updated);

    println!("6. Switching namespace...");
    query.use_ns("test", "scratch").await?;
    let info = query.custom("INFO FOR DB").execute().await?;
    println!("   Database info: {}\n", info);

    println!("7. Cleaning up...");
    query.use_ns("test", "test").await?;
    for table in ["works_at", "person", "company"] {
        query.delete(table).execute().await?;
    }
    println!("   ✓ Deleted example records");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
