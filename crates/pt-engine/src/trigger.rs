//! Pending pad retrigger requests.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::EngineError;
use crate::PAD_COUNT;

/// Bitmask of pads waiting to restart, one bit per pad.
///
/// Any thread may set bits; the render thread takes the whole mask once per
/// block. Requests for the same pad within one block collapse into one.
#[derive(Debug, Default)]
pub struct TriggerRequests {
    pending: AtomicU32,
}

impl TriggerRequests {
    pub fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
        }
    }

    /// Ask for `pad` to restart from its first frame on the next block.
    pub fn request(&self, pad: usize) -> Result<(), EngineError> {
        if pad >= PAD_COUNT {
            return Err(EngineError::PadOutOfRange { pad });
        }
        self.pending.fetch_or(1 << pad, Ordering::Release);
        Ok(())
    }

    /// Take every pending request, leaving none behind.
    pub fn take(&self) -> PadSet {
        PadSet(self.pending.swap(0, Ordering::Acquire))
    }

    /// Whether any request is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Relaxed) != 0
    }
}

/// A set of pad indices, iterated in ascending order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PadSet(u32);

impl PadSet {
    pub fn contains(&self, pad: usize) -> bool {
        pad < PAD_COUNT && self.0 & (1 << pad) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl Iterator for PadSet {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let pad = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_returns_requested_pads() {
        let triggers = TriggerRequests::new();
        triggers.request(3).unwrap();
        triggers.request(15).unwrap();
        let pads: Vec<usize> = triggers.take().collect();
        assert_eq!(pads, vec![3, 15]);
    }

    #[test]
    fn take_clears_pending() {
        let triggers = TriggerRequests::new();
        triggers.request(0).unwrap();
        assert!(triggers.is_pending());
        assert_eq!(triggers.take().len(), 1);
        assert!(!triggers.is_pending());
        assert!(triggers.take().is_empty());
    }

    #[test]
    fn duplicate_requests_collapse() {
        let triggers = TriggerRequests::new();
        for _ in 0..10 {
            triggers.request(7).unwrap();
        }
        let set = triggers.take();
        assert_eq!(set.len(), 1);
        assert!(set.contains(7));
    }

    #[test]
    fn out_of_range_pad_is_rejected() {
        let triggers = TriggerRequests::new();
        assert_eq!(
            triggers.request(PAD_COUNT),
            Err(EngineError::PadOutOfRange { pad: PAD_COUNT })
        );
        assert_eq!(
            triggers.request(usize::MAX),
            Err(EngineError::PadOutOfRange { pad: usize::MAX })
        );
        assert!(!triggers.is_pending());
    }

    #[test]
    fn requests_from_many_threads_all_arrive() {
        let triggers = std::sync::Arc::new(TriggerRequests::new());
        let handles: Vec<_> = (0..PAD_COUNT)
            .map(|pad| {
                let t = triggers.clone();
                std::thread::spawn(move || t.request(pad).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(triggers.take().len(), PAD_COUNT);
    }
}
