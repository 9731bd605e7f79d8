//! Cola de escritura con un único escritor
//!
//! Todas las escrituras pasan por una tarea que procesa los comandos de uno
//! en uno. La validación de un repostaje y su inserción ocurren en el mismo
//! turno, así que dos candidatos concurrentes nunca se validan contra el
//! mismo "último registro".

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{FuelRecord, NewVehicle, Vehicle, VehiclePatch};
use crate::repositories::RecordStore;
use crate::services::record_feed::RecordFeed;
use crate::services::record_validator::{parse_candidate, RecordCandidate, ValidationContext};
use crate::utils::errors::{not_found_error, AppError, AppResult};

type Reply<T> = oneshot::Sender<AppResult<T>>;

/// Cada cuánto se reintenta publicar el store si la última relectura falló
pub const STALE_RETRY_INTERVAL: Duration = Duration::from_millis(500);

enum WriteCommand {
    InsertVehicle(NewVehicle, Reply<Vehicle>),
    PatchVehicle(Uuid, VehiclePatch, Reply<Vehicle>),
    DeleteVehicle(Uuid, Reply<bool>),
    InsertRecord {
        candidate: RecordCandidate,
        today: NaiveDate,
        reply: Reply<FuelRecord>,
    },
    UpdateRecord {
        id: Uuid,
        candidate: RecordCandidate,
        today: NaiveDate,
        reply: Reply<FuelRecord>,
    },
    DeleteRecord(Uuid, Reply<bool>),
    DeleteAllRecords(Reply<u64>),
}

/// Handle clonable para encolar escrituras
#[derive(Clone)]
pub struct WriteQueueHandle {
    sender: mpsc::Sender<WriteCommand>,
}

impl WriteQueueHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> WriteCommand) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| AppError::ServiceUnavailable("write queue is closed".to_string()))?;
        response
            .await
            .map_err(|_| AppError::ServiceUnavailable("write queue dropped the request".to_string()))?
    }

    pub async fn insert_vehicle(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        self.request(|reply| WriteCommand::InsertVehicle(vehicle, reply)).await
    }

    /// Aplica los cambios sobre la versión actual dentro del escritor
    pub async fn patch_vehicle(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Vehicle> {
        self.request(|reply| WriteCommand::PatchVehicle(id, patch, reply)).await
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool> {
        self.request(|reply| WriteCommand::DeleteVehicle(id, reply)).await
    }

    /// Valida e inserta; `AppError::RecordRejected` trae todos los motivos
    pub async fn insert_record(&self, candidate: RecordCandidate, today: NaiveDate) -> AppResult<FuelRecord> {
        self.request(|reply| WriteCommand::InsertRecord {
            candidate,
            today,
            reply,
        })
        .await
    }

    pub async fn update_record(
        &self,
        id: Uuid,
        candidate: RecordCandidate,
        today: NaiveDate,
    ) -> AppResult<FuelRecord> {
        self.request(|reply| WriteCommand::UpdateRecord {
            id,
            candidate,
            today,
            reply,
        })
        .await
    }

    pub async fn delete_record(&self, id: Uuid) -> AppResult<bool> {
        self.request(|reply| WriteCommand::DeleteRecord(id, reply)).await
    }

    pub async fn delete_all_records(&self) -> AppResult<u64> {
        self.request(WriteCommand::DeleteAllRecords).await
    }
}

/// Tarea escritora: dueña del handle del store para escribir
pub struct WriteQueue {
    store: Arc<dyn RecordStore>,
    feed: RecordFeed,
    receiver: mpsc::Receiver<WriteCommand>,
}

impl WriteQueue {
    /// Arranca la tarea escritora y devuelve el handle para encolar
    pub fn spawn(store: Arc<dyn RecordStore>, feed: RecordFeed, capacity: usize) -> (WriteQueueHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            store,
            feed,
            receiver,
        };
        let task = tokio::spawn(queue.run());
        (WriteQueueHandle { sender }, task)
    }

    async fn run(mut self) {
        info!(backend = self.store.backend(), "✍️ Cola de escritura iniciada");

        let mut retry = interval(STALE_RETRY_INTERVAL);
        retry.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => self.process(command).await,
                    None => break,
                },
                _ = retry.tick() => {
                    if self.feed.is_stale() && self.feed.refresh(self.store.as_ref()).await.is_ok() {
                        info!(revision = self.feed.revision(), "✅ Store recuperado, snapshot republicado");
                    }
                }
            }
        }

        info!("Cola de escritura detenida (canal cerrado)");
    }

    async fn process(&self, command: WriteCommand) {
        match command {
            WriteCommand::InsertVehicle(vehicle, reply) => {
                let result = self.store.insert_vehicle(vehicle).await;
                self.finish(result, reply).await;
            }
            WriteCommand::PatchVehicle(id, patch, reply) => {
                let result = self.patch_vehicle(id, patch).await;
                self.finish(result, reply).await;
            }
            WriteCommand::DeleteVehicle(id, reply) => {
                let result = self.store.delete_vehicle(id).await;
                self.finish(result, reply).await;
            }
            WriteCommand::InsertRecord {
                candidate,
                today,
                reply,
            } => {
                let result = self.insert_record(candidate, today).await;
                self.finish(result, reply).await;
            }
            WriteCommand::UpdateRecord {
                id,
                candidate,
                today,
                reply,
            } => {
                let result = self.update_record(id, candidate, today).await;
                self.finish(result, reply).await;
            }
            WriteCommand::DeleteRecord(id, reply) => {
                let result = self.store.delete_record(id).await;
                self.finish(result, reply).await;
            }
            WriteCommand::DeleteAllRecords(reply) => {
                let result = self.store.delete_all_records().await;
                self.finish(result, reply).await;
            }
        }
    }

    /// Republica el store tras una escritura correcta y responde
    async fn finish<T>(&self, result: AppResult<T>, reply: Reply<T>) {
        // Un fallo al releer no deshace la escritura ya confirmada: el feed
        // queda marcado como atrasado y se reintenta en el siguiente tick
        if result.is_ok() && self.feed.refresh(self.store.as_ref()).await.is_err() {
            debug!("Snapshot pendiente de republicar");
        }
        if reply.send(result).is_err() {
            debug!("El solicitante abandonó la escritura antes de la respuesta");
        }
    }

    async fn patch_vehicle(&self, id: Uuid, patch: VehiclePatch) -> AppResult<Vehicle> {
        let current = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        self.store.update_vehicle(patch.apply(current)).await
    }

    async fn insert_record(&self, candidate: RecordCandidate, today: NaiveDate) -> AppResult<FuelRecord> {
        let (vehicle_exists, last) = match candidate.vehicle_id {
            Some(vehicle_id) => (
                self.store.find_vehicle(vehicle_id).await?.is_some(),
                self.store.last_record_for_vehicle(vehicle_id).await?,
            ),
            None => (false, None),
        };

        let ctx = ValidationContext {
            vehicle_exists,
            ..ValidationContext::new(last.as_ref(), today)
        };
        let new_record = parse_candidate(&candidate, &ctx).map_err(|reasons| {
            warn!(?reasons, "🚫 Repostaje rechazado");
            AppError::RecordRejected(reasons)
        })?;

        let id = self.store.insert_record(new_record.clone()).await?;
        info!(record_id = %id, vehicle_id = %new_record.vehicle_id, odometer = new_record.odometer, "⛽ Repostaje registrado");

        self.store
            .find_record(id)
            .await?
            .ok_or_else(|| not_found_error("Fuel record", &id.to_string()))
    }

    async fn update_record(&self, id: Uuid, candidate: RecordCandidate, today: NaiveDate) -> AppResult<FuelRecord> {
        let current = self
            .store
            .find_record(id)
            .await?
            .ok_or_else(|| not_found_error("Fuel record", &id.to_string()))?;

        let (vehicle_exists, previous, next) = match candidate.vehicle_id {
            Some(vehicle_id) => {
                let exists = self.store.find_vehicle(vehicle_id).await?.is_some();
                let siblings: Vec<FuelRecord> = self
                    .store
                    .records_ascending(Some(vehicle_id))
                    .await?
                    .into_iter()
                    .filter(|r| r.id != id)
                    .collect();
                let (previous, next) = neighbours(&siblings, &current, vehicle_id);
                (exists, previous, next)
            }
            None => (false, None, None),
        };

        let ctx = ValidationContext {
            last_for_vehicle: previous.as_ref(),
            next_for_vehicle: next.as_ref(),
            vehicle_exists,
            today,
        };
        let changes = parse_candidate(&candidate, &ctx).map_err(|reasons| {
            warn!(record_id = %id, ?reasons, "🚫 Edición de repostaje rechazada");
            AppError::RecordRejected(reasons)
        })?;

        let updated = FuelRecord {
            id,
            vehicle_id: changes.vehicle_id,
            date: changes.date,
            volume: changes.volume,
            cost: changes.cost,
            odometer: changes.odometer,
            created_at: current.created_at,
        };
        let updated = self.store.update_record(updated).await?;
        info!(record_id = %id, "✏️ Repostaje actualizado");
        Ok(updated)
    }
}

/// Vecinos del registro editado dentro de la secuencia ascendente del vehículo.
///
/// Si sigue en el mismo vehículo conserva su posición original; si cambia de
/// vehículo se coloca al final de la secuencia destino.
fn neighbours(
    siblings: &[FuelRecord],
    current: &FuelRecord,
    target_vehicle: Uuid,
) -> (Option<FuelRecord>, Option<FuelRecord>) {
    if current.vehicle_id != target_vehicle {
        return (siblings.last().cloned(), None);
    }
    let previous = siblings
        .iter()
        .filter(|r| r.odometer < current.odometer)
        .last()
        .cloned();
    let next = siblings.iter().find(|r| r.odometer > current.odometer).cloned();
    (previous, next)
}
