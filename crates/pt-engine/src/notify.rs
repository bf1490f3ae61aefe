//! Bounded notification queue from the MIDI thread to the control surface.
//!
//! The MIDI thread must never block, so a full queue evicts its oldest entry
//! to make room for the newest one. Evictions are counted and reported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use tracing::warn;

/// Something the control surface should redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    /// The held note changed; `None` when the note was released.
    NoteChanged { note: Option<u8> },
    /// A MIDI note restarted a pad.
    PadTriggered { pad: usize },
}

/// Report only the first eviction and then every this many.
const DROP_LOG_INTERVAL: u64 = 64;

/// Create a notification queue holding at most `capacity` entries.
pub fn notification_channel(capacity: usize) -> (NotificationSender, NotificationReceiver) {
    let (tx, rx) = bounded(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        NotificationSender {
            tx,
            evict: rx.clone(),
            dropped: dropped.clone(),
        },
        NotificationReceiver { rx, dropped },
    )
}

/// Producer half. Never blocks.
#[derive(Clone, Debug)]
pub struct NotificationSender {
    tx: Sender<Notification>,
    /// Used only to discard the oldest entry when the queue is full.
    evict: Receiver<Notification>,
    dropped: Arc<AtomicU64>,
}

impl NotificationSender {
    /// Enqueue `notification`, evicting the oldest entry if the queue is full.
    pub fn post(&self, notification: Notification) {
        let mut pending = notification;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return,
                Err(TrySendError::Full(n)) => {
                    pending = n;
                    if self.evict.try_recv().is_ok() {
                        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        if total == 1 || total % DROP_LOG_INTERVAL == 0 {
                            warn!(dropped = total, "Notification queue full, dropping oldest.");
                        }
                    }
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Total notifications evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half, drained by the control surface.
#[derive(Debug)]
pub struct NotificationReceiver {
    rx: Receiver<Notification>,
    dropped: Arc<AtomicU64>,
}

impl NotificationReceiver {
    pub fn try_recv(&self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Take everything queued right now, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = Notification> + '_ {
        self.rx.try_iter()
    }

    /// Wait up to `timeout` for the next notification.
    ///
    /// Returns `None` on timeout or once every sender is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Notification> {
        match self.rx.recv_timeout(timeout) {
            Ok(n) => Some(n),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Total notifications evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
