//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Se construye una sola vez al arrancar y se
//! inyecta; no hay handles globales.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::EnvironmentConfig;
use crate::models::EfficiencyView;
use crate::repositories::RecordStore;
use crate::services::efficiency_engine::EfficiencyEngine;
use crate::services::record_feed::RecordFeed;
use crate::services::write_queue::{WriteQueue, WriteQueueHandle};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub writes: WriteQueueHandle,
    pub feed: RecordFeed,
    pub engine: Arc<EfficiencyEngine>,
    pub config: EnvironmentConfig,
}

impl AppState {
    /// Publica la primera foto del store y arranca escritor y motor
    pub async fn build(store: Arc<dyn RecordStore>, config: EnvironmentConfig) -> AppResult<Self> {
        let feed = RecordFeed::new();
        feed.refresh(store.as_ref()).await?;

        let engine = Arc::new(EfficiencyEngine::spawn(feed.clone()));
        let (writes, _writer) = WriteQueue::spawn(store.clone(), feed.clone(), config.write_queue_capacity);

        info!(
            backend = store.backend(),
            revision = feed.revision(),
            "✅ Estado de la aplicación inicializado"
        );

        Ok(Self {
            store,
            writes,
            feed,
            engine,
            config,
        })
    }

    /// Vista derivada al día. Si la última relectura del store falló se
    /// reintenta aquí; mientras el store no responda se sirve la vista anterior.
    pub async fn current_view(&self) -> Arc<EfficiencyView> {
        if self.feed.refresh_if_stale(self.store.as_ref()).await.is_err() {
            debug!(revision = self.feed.revision(), "Sirviendo vista atrasada");
        }
        self.engine.latest().await
    }

    /// Fecha de referencia para rechazar fechas futuras, en la hora local del usuario
    pub fn today(&self) -> NaiveDate {
        local_date(Utc::now(), self.config.utc_offset_minutes)
    }
}

/// Día local para un desfase en minutos respecto a UTC
pub fn local_date(now: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    (now + Duration::minutes(i64::from(utc_offset_minutes))).date_naive()
}
