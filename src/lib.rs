pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod geocoding;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod utils;

use std::sync::Arc;

use engine::FareEngine;
use entities::tariff::TariffCatalog;
use geocoding::Geocoder;
use store::SessionStore;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub engine: FareEngine,
    pub catalog: Arc<TariffCatalog>,
    pub geocoder: Arc<dyn Geocoder>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        config: &Config,
        catalog: TariffCatalog,
        geocoder: Arc<dyn Geocoder>,
    ) -> AppResult<Self> {
        let engine = FareEngine::new(config.engine)?;
        let sessions = Arc::new(SessionStore::new(config.session_ttl_minutes));

        Ok(Self {
            engine,
            catalog: Arc::new(catalog),
            geocoder,
            sessions,
        })
    }
}
