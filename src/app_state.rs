use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Estado compartido entre los manejadores HTTP.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}
