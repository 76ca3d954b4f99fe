//! Vector Model Service - real-time recommendations from item factor vectors
//!
//! Port: 8083 (default)

use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use vectormodel::{init_logging, load_model, server, ServiceConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::load()?;
    config.validate()?;
    init_logging(&config.logging)?;

    info!(
        factors_path = %config.model.factors_path,
        "Starting Vector Model Service"
    );

    let model_config = config.model.clone();
    let model = web::block(move || load_model(&model_config))
        .await
        .map_err(|e| anyhow::anyhow!("Model loading task failed: {}", e))??;

    let app_state = web::Data::new(server::AppState::new(Arc::new(model)));
    let bind_addr = (config.server.host.clone(), config.server.port);

    info!(
        "Vector Model Service listening on {}:{}",
        bind_addr.0, bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(server::configure_routes)
    })
    .workers(config.server.workers)
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
