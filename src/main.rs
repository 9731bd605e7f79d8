use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use fuelwise_log::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use fuelwise_log::database;
use fuelwise_log::migration::import_legacy_file;
use fuelwise_log::repositories::{MemoryRecordStore, PostgresRecordStore, RecordStore};
use fuelwise_log::routes::create_app;
use fuelwise_log::state::{local_date, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("⛽ Fuelwise Log - API de repostajes");
    info!("===================================");

    // Inicializar el Record Store
    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Memory => {
            warn!("⚠️ Usando store en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryRecordStore::new())
        }
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match database::connect(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            info!("✅ PostgreSQL conectado exitosamente");
            Arc::new(PostgresRecordStore::new(pool))
        }
    };

    // Migración de exports antiguos antes de abrir la cola de escritura
    if let Some(path) = &config.legacy_import_path {
        let today = local_date(chrono::Utc::now(), config.utc_offset_minutes);
        let report = import_legacy_file(&store, path, &config.legacy_vehicle_name, today).await?;
        info!(
            converted = report.converted,
            skipped = report.skipped,
            already_applied = report.already_applied,
            "📦 Import de {} terminado",
            path.display()
        );
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::build(store, config).await?;
    let app = create_app(app_state.clone());

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   GET/POST /api/vehicles - Listar / crear vehículos");
    info!("   GET/PUT/DELETE /api/vehicles/:id - Obtener / actualizar / eliminar");
    info!("   GET  /api/vehicles/:id/summary - Resumen del vehículo");
    info!("   GET  /api/vehicles/:id/last-record - Último repostaje");
    info!("⛽ Repostajes:");
    info!("   GET/POST/DELETE /api/records - Log / añadir / borrar todo");
    info!("   PUT/DELETE /api/records/:id - Editar / eliminar");
    info!("   POST /api/records/validate - Validar sin guardar");
    info!("   GET  /api/records/stream - Log en vivo (SSE)");
    info!("   GET  /api/summary - Resumen global o por vehículo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    app_state.engine.shutdown();
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
