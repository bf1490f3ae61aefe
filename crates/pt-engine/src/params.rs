//! Lock-free parameter storage shared between the control and render threads.

use std::sync::atomic::{AtomicU32, Ordering};

use pt_ir::ParamId;

/// Current parameter values, one atomic f32 (stored as bits) per [`ParamId`].
///
/// Writes come from the control thread, reads from anywhere. Loads and stores
/// are relaxed: each value is independent and only needs to become visible
/// eventually.
#[derive(Debug)]
pub struct ParameterStore {
    values: [AtomicU32; ParamId::ALL.len()],
}

/// A copy of every parameter, taken once per render block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSnapshot {
    pub detune: f32,
    pub volume: f32,
    pub attack: f32,
}

impl ParameterStore {
    /// Create a store holding every parameter's default.
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicU32::new(id.default_value().to_bits())),
        }
    }

    /// Clamp `value` into the parameter's range and store it.
    ///
    /// Returns the value actually stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let clamped = id.clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Relaxed);
        clamped
    }

    /// Most recently committed value.
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            detune: self.get(ParamId::Detune),
            volume: self.get(ParamId::Volume),
            attack: self.get(ParamId::Attack),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_defaults() {
        let store = ParameterStore::new();
        for id in ParamId::ALL {
            assert_eq!(store.get(id), id.default_value());
        }
    }

    #[test]
    fn set_then_get() {
        let store = ParameterStore::new();
        store.set(ParamId::Volume, 0.25);
        assert_eq!(store.get(ParamId::Volume), 0.25);
        assert_eq!(store.get(ParamId::Detune), 0.0);
    }

    #[test]
    fn out_of_range_is_clamped_not_rejected() {
        let store = ParameterStore::new();
        assert_eq!(store.set(ParamId::Volume, 3.0), 1.0);
        assert_eq!(store.get(ParamId::Volume), 1.0);
        assert_eq!(store.set(ParamId::Detune, -100.0), -24.0);
        assert_eq!(store.get(ParamId::Detune), -24.0);
    }

    #[test]
    fn nan_stores_default() {
        let store = ParameterStore::new();
        store.set(ParamId::Attack, 500.0);
        store.set(ParamId::Attack, f32::NAN);
        assert_eq!(store.get(ParamId::Attack), 10.0);
    }

    #[test]
    fn snapshot_reads_all() {
        let store = ParameterStore::new();
        store.set(ParamId::Detune, 7.0);
        store.set(ParamId::Attack, 250.0);
        let snap = store.snapshot();
        assert_eq!(snap.detune, 7.0);
        assert_eq!(snap.volume, 0.5);
        assert_eq!(snap.attack, 250.0);
    }

    #[test]
    fn visible_across_threads() {
        let store = std::sync::Arc::new(ParameterStore::new());
        let writer = store.clone();
        std::thread::spawn(move || {
            writer.set(ParamId::Volume, 0.8);
        })
        .join()
        .unwrap();
        assert_eq!(store.get(ParamId::Volume), 0.8);
    }
}
