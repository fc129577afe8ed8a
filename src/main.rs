use nirmal_dhara_service::config::AppConfig;
use nirmal_dhara_service::db;
use nirmal_dhara_service::logging::{self, Component};
use nirmal_dhara_service::server;
use nirmal_dhara_service::store::{BaselineStore, MemoryStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let _log_guard = logging::init_logger(&config.logging)?;

    let location = config.server.location.clone();
    let store: Box<dyn BaselineStore> = match &config.database_url {
        Some(url) => match db::connect_and_verify(url) {
            Ok(store) => {
                let message = "Connected to PostgreSQL baseline store";
                logging::info(Component::Database, Some(&location), message);
                Box::new(store)
            }
            Err(e) => {
                logging::log_store_failure(&location, "connect", &e);
                return Err(e.into());
            }
        },
        None => {
            logging::warn(
                Component::Database,
                Some(&location),
                "DATABASE_URL not set; baselines are kept in memory only",
            );
            Box::new(MemoryStore::new())
        }
    };
    let store = server::shared_store(store);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config, store.clone()))?;

    // The blocking postgres client must be closed outside the async runtime.
    drop(runtime);
    drop(store);
    Ok(())
}
