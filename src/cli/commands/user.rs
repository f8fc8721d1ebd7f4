//! User management command handlers

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_user_add(
    config: &Config,
    email: &str,
    password: Option<&str>,
) -> anyhow::Result<()> {
    if !email.contains('@') {
        println!("Invalid email address: {email}");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_email(email).await?.is_some() {
        println!("A user with email {email} already exists.");
        return Ok(());
    }

    let password = match password {
        Some(p) => p.to_string(),
        None => {
            println!("Password for {email}:");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    if password.chars().count() < config.auth.min_password_length {
        println!(
            "Password must be at least {} characters.",
            config.auth.min_password_length
        );
        return Ok(());
    }

    let user = store.create_user(email, &password, &config.auth).await?;

    println!("✓ User created: {}", user.email);
    println!("  API key: {}", user.api_key);

    Ok(())
}

pub async fn cmd_user_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users registered.");
        println!();
        println!("Add one with: formarr user add <email>");
        return Ok(());
    }

    println!("Registered Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let forms = store.count_forms_for_user(user.id).await.unwrap_or(0);
        println!("[{}] {}", user.id, user.email);
        println!("  Created: {} | Forms: {}", user.created_at, forms);
    }

    Ok(())
}
