//! Status command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_status(config: &Config) -> anyhow::Result<()> {
    println!("Formarr v{}", env!("CARGO_PKG_VERSION"));
    println!("{:-<70}", "");
    println!("Database: {}", config.general.database_path);

    let store = Store::new(&config.general.database_path).await?;

    match store.ping().await {
        Ok(()) => println!("  Connection: ok"),
        Err(e) => {
            println!("  Connection: failed ({e})");
            return Ok(());
        }
    }

    println!("  Users: {}", store.count_users().await?);
    println!("  Forms: {}", store.count_forms().await?);
    println!("  Submissions: {}", store.count_submissions().await?);

    println!();
    if config.server.enabled {
        println!("Server: enabled on port {}", config.server.port);
    } else {
        println!("Server: disabled");
    }
    println!("Generation models: {}", config.gemini.models.join(", "));
    println!(
        "Embeddings: {}",
        if config.huggingface.is_configured() {
            "configured"
        } else {
            "disabled"
        }
    );
    println!(
        "Uploads: {}",
        if config.cloudinary.is_configured() {
            "configured"
        } else {
            "disabled"
        }
    );

    Ok(())
}
