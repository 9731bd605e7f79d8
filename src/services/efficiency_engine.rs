//! Motor de eficiencia
//!
//! Escucha el feed de registros y, en cada cambio, recalcula la vista
//! completa (filas + resúmenes) y la republica. El recálculo es lineal en el
//! número de registros, así que se hace entero en vez de incremental.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{EfficiencyView, Summary};
use crate::repositories::StoreSnapshot;
use crate::services::aggregator::summarize;
use crate::services::interval_calculator::compute_intervals;
use crate::services::log_projector::join_rows;
use crate::services::record_feed::RecordFeed;

/// Calcula la vista derivada de una foto del store
pub fn compute_view(snapshot: &StoreSnapshot) -> EfficiencyView {
    let records = &snapshot.records;
    let intervals = compute_intervals(records);
    let rows = join_rows(records, &intervals, &snapshot.vehicles);

    let mut vehicle_summaries: HashMap<Uuid, Summary> = HashMap::new();
    let mut start = 0;
    // Los registros llegan agrupados por vehículo: cada tramo contiguo es un vehículo
    while start < records.len() {
        let vehicle_id = records[start].vehicle_id;
        let end = records[start..]
            .iter()
            .position(|r| r.vehicle_id != vehicle_id)
            .map_or(records.len(), |offset| start + offset);
        vehicle_summaries.insert(
            vehicle_id,
            summarize(&records[start..end], &intervals[start..end]),
        );
        start = end;
    }

    EfficiencyView {
        revision: snapshot.revision,
        vehicles: snapshot.vehicles.clone(),
        rows,
        fleet_summary: summarize(records, &intervals),
        vehicle_summaries,
    }
}

pub struct EfficiencyEngine {
    feed: RecordFeed,
    view: watch::Receiver<Arc<EfficiencyView>>,
    task: JoinHandle<()>,
}

impl EfficiencyEngine {
    /// Suscribe el motor al feed y arranca la tarea de recálculo
    pub fn spawn(feed: RecordFeed) -> Self {
        let mut snapshots = feed.subscribe();
        let initial = compute_view(&snapshots.borrow_and_update());
        let (sender, view) = watch::channel(Arc::new(initial));

        let task = tokio::spawn(async move {
            info!("⚙️ Motor de eficiencia iniciado");
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                let view = compute_view(&snapshot);
                debug!(
                    revision = view.revision,
                    rows = view.rows.len(),
                    "🔁 Vista de eficiencia recalculada"
                );
                if sender.send(Arc::new(view)).is_err() {
                    break;
                }
            }
            info!("Motor de eficiencia detenido");
        });

        Self { feed, view, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<EfficiencyView>> {
        self.view.clone()
    }

    /// Vista al día con la última revisión publicada por el feed.
    ///
    /// Si la tarea del motor ya no existe, devuelve la última vista conocida.
    pub async fn latest(&self) -> Arc<EfficiencyView> {
        let target = self.feed.revision();
        let mut view = self.view.clone();
        let result = view.wait_for(|v| v.revision >= target).await.map(|v| v.clone());
        match result {
            Ok(current) => current,
            Err(_) => self.view.borrow().clone(),
        }
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }
}
