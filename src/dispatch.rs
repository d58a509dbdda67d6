//! Dispatch channel
//!
//! Asynchronous, per-target message delivery between worker contexts and
//! the UI context. Each registered target owns a single-consumer mailbox;
//! producers enqueue without blocking and without ever learning how (or
//! whether) the consumer processes the message.
//!
//! Delivery guarantees: messages sent to the same target by the same
//! producer arrive in send order; nothing is guaranteed across producers.
//! A message addressed to a target whose mailbox has been dropped is
//! discarded according to the dispatcher's [`DeliveryPolicy`]; the
//! producer never observes an error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tracing::warn;

use crate::message::Message;

/// Identity of a registered delivery target.
///
/// Ids increase monotonically and are never reused, so a late message
/// addressed to a dead target can never reach a newer one by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

/// What to do with a message whose target no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Drop without a trace
    Silent,
    /// Drop, but leave a warning in the log
    #[default]
    Log,
}

struct Registry {
    targets: Mutex<HashMap<TargetId, mpsc::UnboundedSender<Message>>>,
    next_id: AtomicU64,
    policy: DeliveryPolicy,
}

impl Registry {
    fn lock_targets(&self) -> MutexGuard<'_, HashMap<TargetId, mpsc::UnboundedSender<Message>>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dropped(&self, target: TargetId, label: &'static str) {
        match self.policy {
            DeliveryPolicy::Silent => {}
            DeliveryPolicy::Log => {
                warn!(?target, kind = label, "dropping message for dead target");
            }
        }
    }
}

/// Handle to the target registry. Cheap to clone; every clone delivers
/// into the same set of mailboxes.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            registry: Arc::new(Registry {
                targets: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                policy,
            }),
        }
    }

    /// Register a new delivery target and hand back its mailbox.
    pub fn register(&self) -> Mailbox {
        let id = TargetId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.lock_targets().insert(id, tx);
        Mailbox {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Enqueue `message` for asynchronous delivery to `target`.
    ///
    /// Returns immediately. If the target's mailbox is gone the message
    /// is dropped per the dispatcher's policy.
    pub fn send(&self, target: TargetId, message: Message) {
        let sender = self.registry.lock_targets().get(&target).cloned();
        match sender {
            Some(tx) => {
                let label = message.label();
                if tx.send(message).is_err() {
                    self.registry.lock_targets().remove(&target);
                    self.registry.dropped(target, label);
                }
            }
            None => self.registry.dropped(target, message.label()),
        }
    }

    /// Deliver a clone of `message` to every live target.
    pub fn broadcast(&self, message: Message) {
        let senders: Vec<(TargetId, mpsc::UnboundedSender<Message>)> = self
            .registry
            .lock_targets()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();
        for (id, tx) in senders {
            if tx.send(message.clone()).is_err() {
                self.registry.lock_targets().remove(&id);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-consumer receiving end of one target's queue.
///
/// Dropping the mailbox deregisters the target; anything still queued or
/// sent afterwards is discarded.
pub struct Mailbox {
    id: TargetId,
    rx: mpsc::UnboundedReceiver<Message>,
    registry: Weak<Registry>,
}

impl Mailbox {
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Receive the next message. Resolves to `None` once every
    /// [`Dispatcher`] handle has been dropped.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Non-blocking receive
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Mailbox {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock_targets().remove(&self.id);
        }
    }
}
