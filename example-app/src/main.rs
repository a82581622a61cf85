use example_app::build_router;
use example_app::state::AppState;
use trellis::prelude::*;
use trellis::ConfigValue;

#[tokio::main]
async fn main() {
    init_tracing();

    // load() succeeds even when application.yaml is absent (env vars still overlay).
    let mut config = TrellisConfig::load("dev").unwrap_or_else(|_| TrellisConfig::empty());
    if !config.contains_key(ScanConfig::ROOT_KEY) {
        config.set(
            ScanConfig::ROOT_KEY,
            ConfigValue::String(concat!(env!("CARGO_MANIFEST_DIR"), "/src/controllers").to_string()),
        );
    }

    let app = build_router(&config, AppState::new())
        .await
        .unwrap_or_else(|err| panic!("failed to build router: {err}"));

    let port: i64 = config.get_or("server.port", 3000);
    let addr = format!("0.0.0.0:{port}");
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
