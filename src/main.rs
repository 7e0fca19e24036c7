use dotenvy::dotenv;
use expense_admin::{
    config::{database, reference},
    core::{
        cascade::{SelectionState, SelectorField},
        descriptor::{Page, ResourceRoutes, resources},
        lookup::SeaOrmReferenceStore,
        reference::seed_reference_data,
    },
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    if dotenv().is_err() {
        info!("No .env file found, using process environment.");
    }

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed reference data when a config file is present
    let config_path = reference::get_config_path();
    if Path::new(&config_path).exists() {
        let config = reference::load_config(&config_path)?;
        seed_reference_data(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed reference data: {}", e))?;
    } else {
        warn!("{} not found, skipping reference data seed", config_path);
    }

    // 5. Report the registered resources
    let store = SeaOrmReferenceStore::new(db);
    for resource in resources() {
        let routes = resource.routes();
        let patterns: Vec<String> = ResourceRoutes::PAGES
            .into_iter()
            .map(|page: Page| routes.pattern(page))
            .collect();
        info!(
            "{} [{} #{}]: {}",
            resource.model_label,
            resource.navigation_group,
            resource.navigation_sort,
            patterns.join(", ")
        );

        let companies = resource
            .resolver(&store)
            .compute_options(SelectorField::Company, &SelectionState::new())
            .await?;
        info!("{} company option(s) available", companies.len());
    }

    Ok(())
}
