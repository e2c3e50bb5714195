use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxi_fare_backend::{
    config::Config,
    entities::tariff::TariffCatalog,
    geocoding::{GazetteerGeocoder, Geocoder},
    middleware::rate_limit::{create_api_governor, log_request},
    routes, AppState,
};

const BUNDLED_GAZETTEER: &str = include_str!("../data/gazetteer.json");

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxi_fare_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Invalid configuration");
    tracing::info!(
        road_factor = config.engine.road_factor,
        minutes_per_km = config.engine.minutes_per_km,
        "Starting server at {}",
        config.server_addr()
    );

    let catalog = match &config.tariffs_path {
        Some(path) => TariffCatalog::from_json_file(path).expect("Failed to load tariff catalog"),
        None => TariffCatalog::default(),
    };
    tracing::info!(
        tiers = catalog.tiers().len(),
        default_tier = %catalog.default_tier().id,
        "Tariff catalog loaded"
    );

    let gazetteer = match &config.gazetteer_path {
        Some(path) => GazetteerGeocoder::from_json_file(path),
        None => GazetteerGeocoder::from_json_str(BUNDLED_GAZETTEER),
    }
    .expect("Failed to load gazetteer");
    tracing::info!(places = gazetteer.len(), "Gazetteer loaded");
    let geocoder: Arc<dyn Geocoder> = Arc::new(gazetteer);

    let state = AppState::new(&config, catalog, geocoder).expect("Invalid engine settings");

    // 100 requests burst, refilled one every 600ms per IP
    let governor = create_api_governor(600, 100).expect("Invalid rate limit settings");

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(governor)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
