use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::models::car::NewCar;
use crate::services::{CatalogService, SeaOrmCatalogService};

pub async fn cmd_import_cars(config: &Config, path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let cars: Vec<NewCar> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of cars", path.display()))?;

    if cars.is_empty() {
        println!("No cars found in {}", path.display());
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    let catalog = SeaOrmCatalogService::new(store);

    match catalog.import_cars(cars).await {
        Ok(count) => println!("✓ Imported {count} cars"),
        Err(e) => println!("Import failed: {e}"),
    }

    Ok(())
}
