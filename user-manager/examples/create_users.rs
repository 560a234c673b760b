use std::env;
use user_manager::{ManagerConfig, UserCreationParams, UserManager};

/// Usage: create_users <application id> <api token> [config.yaml]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(app_id), Some(token)) = (args.next(), args.next()) else {
        eprintln!("usage: create_users <application id> <api token> [config.yaml]");
        return Ok(());
    };
    let config = ManagerConfig::load(args.next().unwrap_or_else(|| "user-manager.yaml".to_string()))?;

    let manager = UserManager::with_config(config);
    manager.init_application(&app_id, &token);

    let params = (1..=5)
        .map(|i| UserCreationParams::new(format!("demo-user-{}", i), format!("Demo {}", i), None))
        .collect();

    let start = std::time::Instant::now();
    let created = manager.create_users(params).await?;
    println!("Created {} users in {:?}", created.len(), start.elapsed());

    let matches = manager.get_users("Demo 1").await?;
    println!("Nickname search returned {} users", matches.len());

    println!("Cache stats: {:?}", manager.storage().stats());
    for user in manager.storage().get_users() {
        println!("  {} ({})", user.user_id(), user.nickname().as_deref().unwrap_or("-"));
    }

    Ok(())
}
