use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::protocol::ServerEvent;
use crate::{
    models::Product,
    store::{Collection, StoreResult},
};

pub type ObserverId = Uuid;

/// Outgoing queue of one observer; drained by that observer's socket task.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Registry of connected observers and fan-out of product list updates.
pub struct Notifier {
    observers: DashMap<ObserverId, EventSender>,
    products: Arc<dyn Collection<Product>>,
    write_gate: Arc<Mutex<()>>,
}

impl Notifier {
    /// `write_gate` must be the gate catalog mutations hold while they write
    /// and broadcast.
    pub fn new(products: Arc<dyn Collection<Product>>, write_gate: Arc<Mutex<()>>) -> Self {
        Self {
            observers: DashMap::new(),
            products,
            write_gate,
        }
    }

    /// Registers an observer and pushes the current product list to it alone.
    ///
    /// Runs under the write gate, so no mutation lands between the initial
    /// read and the registration: every later broadcast is newer than the
    /// initial list and arrives after it.
    pub async fn connect(&self, tx: EventSender) -> ObserverId {
        let _gate = self.write_gate.lock().await;
        let id = Uuid::new_v4();
        self.observers.insert(id, tx);
        info!(observer = %id, observers = self.observers.len(), "observer connected");

        let initial = match self.products.find(None).await {
            Ok(list) => ServerEvent::ProductList(list),
            Err(err) => {
                warn!(observer = %id, error = %err, "initial product list failed");
                ServerEvent::Error("could not load products".to_string())
            }
        };
        self.send_to(&id, initial);
        id
    }

    pub fn disconnect(&self, id: &ObserverId) {
        if self.observers.remove(id).is_some() {
            info!(observer = %id, observers = self.observers.len(), "observer disconnected");
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Pushes `event` to a single observer. Returns `false` when it is gone.
    pub fn send_to(&self, id: &ObserverId, event: ServerEvent) -> bool {
        let delivered = self
            .observers
            .get(id)
            .is_some_and(|tx| tx.send(event).is_ok());
        if !delivered {
            self.disconnect(id);
        }
        delivered
    }

    /// Pushes `event` to every observer and returns how many received it.
    /// Observers whose queue is closed are dropped from the registry.
    pub fn broadcast(&self, event: ServerEvent) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;
        for entry in self.observers.iter() {
            if entry.value().send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }
        for id in &closed {
            self.disconnect(id);
        }
        delivered
    }

    /// Reads the current catalog and broadcasts it as `products:list`.
    pub async fn broadcast_product_list(&self) -> StoreResult<usize> {
        let list = self.products.find(None).await?;
        let delivered = self.broadcast(ServerEvent::ProductList(list));
        debug!(delivered, "product list broadcast");
        Ok(delivered)
    }
}
