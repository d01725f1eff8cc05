use anyhow::Result;
use axum::{routing::get, Extension, Json, Router};
use i18n_middleware::config::Config;
use i18n_middleware::i18n::{
    LocaleContext, LocaleResolver, LookupOptions, RequestLocale, TranslationStore,
};
use i18n_middleware::server;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_middleware=info".parse()?),
        )
        .init();

    info!("Starting i18n demo server");

    let config = Config::from_env()?;

    let store = Arc::new(TranslationStore::load(&config.i18n)?);
    info!(
        "Serving languages {:?} (default {})",
        store.languages(),
        store.default_language()
    );

    let resolver = LocaleResolver::new(Arc::clone(&store))
        .with_format_fn_name(config.i18n.format_fn_name.clone());

    let app = Router::new()
        .route("/", get(locale_info))
        .merge(server::strings_router(
            Arc::clone(&store),
            None,
            LookupOptions::default(),
        ))
        .fallback(locale_info)
        .layer(TraceLayer::new_for_http());
    let app = server::localize(app, Arc::new(resolver));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Echo the resolved locale of the request.
async fn locale_info(Extension(locale): Extension<RequestLocale>) -> Json<LocaleContext> {
    Json(locale.context)
}
