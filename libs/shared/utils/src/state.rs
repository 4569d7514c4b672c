use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::Database;

/// Shared by every router. Holds no connection; handlers open one per request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Database,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let database = Database::new(config.database_path.clone());
        Self {
            config: Arc::new(config),
            database,
        }
    }
}
