use crate::{
    config::Config,
    inference_service::InferenceService,
    ort_service::OrtModelLoader,
    server::{HttpServer, SharedState},
    telemetry::Metrics,
};
use std::sync::Arc;
use tokio::{signal, sync::broadcast};

pub async fn start_app(config: Config) -> anyhow::Result<()> {
    let loader = OrtModelLoader::new(&config.model);
    let inference_service = Arc::new(InferenceService::new(loader));

    if config.model.load_on_startup {
        if let Err(e) = inference_service.load().await {
            tracing::warn!("Starting without a model, it will be loaded on demand: {}", e);
        }
    } else {
        tracing::info!("Model loading deferred to the first prediction request");
    }

    let state = SharedState {
        inference_service,
        reload: config.reload,
        metrics: Arc::new(Metrics::new()?),
    };
    tracing::info!(
        "Reload policy: base64={:?}, file={:?}",
        config.reload.base64,
        config.reload.file
    );

    let server = HttpServer::new(state, &config).await?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let server_handle = server.run(shutdown_tx.subscribe()).await?;

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown.");

    let _ = shutdown_tx.send(());
    server_handle.await??;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
