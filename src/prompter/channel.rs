//! Ordered point-to-point mailbox between the control window, the host and the
//! overlay.
//!
//! Delivery is in send order and nothing is reordered. A state message
//! replaces the last undelivered message when that one has the same
//! [`MessageKind`](crate::prompter::messages::MessageKind), so a burst of
//! updates collapses to the newest. Anything sent in between keeps both, and
//! commands (toggles, hotkeys) are never merged.

use crate::prompter::messages::Message;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct Shared<T> {
    queue: Mutex<VecDeque<T>>,
    receiver_alive: AtomicBool,
    senders: Mutex<usize>,
}

pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError<T>(pub T);

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receiving window is gone")
    }
}

impl<T: fmt::Debug> std::error::Error for SendError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    Empty,
    Disconnected,
}

pub fn channel<T: Message>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        queue: Mutex::new(VecDeque::new()),
        receiver_alive: AtomicBool::new(true),
        senders: Mutex::new(1),
    });
    (
        Sender {
            shared: shared.clone(),
        },
        Receiver { shared },
    )
}

impl<T: Message> Sender<T> {
    pub fn send(&self, message: T) -> Result<(), SendError<T>> {
        if !self.shared.receiver_alive.load(Ordering::SeqCst) {
            return Err(SendError(message));
        }
        let Ok(mut queue) = self.shared.queue.lock() else {
            return Err(SendError(message));
        };
        let kind = message.kind();
        if kind.coalesces() {
            if let Some(last) = queue.back_mut().filter(|last| last.kind() == kind) {
                tracing::trace!(?kind, "replacing pending message");
                *last = message;
                return Ok(());
            }
        }
        queue.push_back(message);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.shared.receiver_alive.load(Ordering::SeqCst)
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        if let Ok(mut count) = self.shared.senders.lock() {
            *count += 1;
        }
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if let Ok(mut count) = self.shared.senders.lock() {
            *count = count.saturating_sub(1);
        }
    }
}

impl<T> Receiver<T> {
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let next = self
            .shared
            .queue
            .lock()
            .map_err(|_| TryRecvError::Disconnected)?
            .pop_front();
        match next {
            Some(message) => Ok(message),
            None if self.senders_gone() => Err(TryRecvError::Disconnected),
            None => Err(TryRecvError::Empty),
        }
    }

    /// Take every pending message in delivery order.
    pub fn drain(&self) -> Vec<T> {
        self.shared
            .queue
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn senders_gone(&self) -> bool {
        self.shared.senders.lock().map(|c| *c == 0).unwrap_or(true)
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.shared.receiver_alive.store(false, Ordering::SeqCst);
    }
}
