use std::sync::Arc;

use diary_merge::engine::core::store::LocalStore;
use diary_merge::engine::merger::{MergeOutcome, Merger};
use diary_merge::logging;
use diary_merge::shared::config::CONFIG;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    info!("Starting diary merge run");

    let merger = Merger::new(CONFIG.merge.clone(), Arc::new(LocalStore));
    match merger.run().await {
        MergeOutcome::Skipped => println!("A merge is already in progress."),
        MergeOutcome::NothingToMerge => println!("Nothing to merge."),
        MergeOutcome::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
