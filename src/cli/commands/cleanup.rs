//! Cache cleanup command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_cleanup(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let (retrievals, values) = store.clear_expired_cache().await?;

    println!("✓ Cache cleanup complete");
    println!("  Retrieval entries removed: {retrievals}");
    println!("  Value entries removed: {values}");

    Ok(())
}
