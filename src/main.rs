//! Timeline ID Worker entry point.

use timeline_idgen::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run().await
}
