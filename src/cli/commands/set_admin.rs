use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};

pub async fn cmd_set_admin(config: &Config, username: &str, revoke: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    match auth.set_admin(username, !revoke).await {
        Ok(()) if revoke => println!("✓ {username} is no longer an admin"),
        Ok(()) => {
            println!("✓ {username} is now an admin");
            println!("Existing sessions keep their old rights until the user logs in again.");
        }
        Err(AuthError::UserNotFound(_)) => println!("User '{username}' not found."),
        Err(e) => return Err(anyhow::anyhow!(e)),
    }

    Ok(())
}
