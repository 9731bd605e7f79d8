//! Feed de registros
//!
//! Publica la última foto del store en un canal `watch`. Cada suscriptor ve
//! siempre el estado más reciente; cancelar es soltar el receptor.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::repositories::{RecordStore, StoreSnapshot};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct RecordFeed {
    sender: Arc<watch::Sender<Arc<StoreSnapshot>>>,
    revision: Arc<AtomicU64>,
    /// La última relectura falló: lo publicado no incluye la última escritura
    stale: Arc<AtomicBool>,
    /// Serializa lectura y publicación para que las revisiones sigan el orden de lectura
    refreshing: Arc<Mutex<()>>,
}

impl RecordFeed {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(StoreSnapshot::default()));
        Self {
            sender: Arc::new(sender),
            revision: Arc::new(AtomicU64::new(0)),
            stale: Arc::new(AtomicBool::new(false)),
            refreshing: Arc::new(Mutex::new(())),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Arc<StoreSnapshot> {
        self.sender.borrow().clone()
    }

    /// Revisión de la última foto publicada
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Relee el store y publica una nueva revisión.
    ///
    /// Si la lectura falla se mantiene la foto anterior y el feed queda
    /// marcado como atrasado hasta que una relectura funcione.
    pub async fn refresh(&self, store: &dyn RecordStore) -> AppResult<u64> {
        let _guard = self.refreshing.lock().await;
        let next = self.revision() + 1;
        match StoreSnapshot::load(store, next).await {
            Ok(snapshot) => {
                debug!(
                    revision = next,
                    vehicles = snapshot.vehicles.len(),
                    records = snapshot.records.len(),
                    "📡 Publicando snapshot del store"
                );
                self.revision.store(next, Ordering::Release);
                self.sender.send_replace(Arc::new(snapshot));
                self.stale.store(false, Ordering::Release);
                Ok(next)
            }
            Err(e) => {
                self.stale.store(true, Ordering::Release);
                warn!(error = %e, "⚠️ No se pudo releer el store, se mantiene el snapshot anterior");
                Err(e)
            }
        }
    }

    /// Reintenta la relectura sólo si la última falló
    pub async fn refresh_if_stale(&self, store: &dyn RecordStore) -> AppResult<Option<u64>> {
        if !self.is_stale() {
            return Ok(None);
        }
        self.refresh(store).await.map(Some)
    }
}

impl Default for RecordFeed {
    fn default() -> Self {
        Self::new()
    }
}
