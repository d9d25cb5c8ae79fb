#[tokio::main]
async fn main() {
    dropfront_observability::init();

    let sweep_secret = std::env::var("SWEEP_SECRET").unwrap_or_else(|_| {
        tracing::warn!("SWEEP_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let app = dropfront_api::app::build_app(sweep_secret);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
