//! Consumer Registry
//!
//! Each gate keeps a registry of the gates that read its output. The
//! registry holds one entry per wired slot, so a consumer that connects two
//! of its inputs to the same producer appears twice.
//!
//! Removal scans for the first matching entry and swaps the last entry into
//! its place. Entry order is therefore unspecified and may change after any
//! removal.

use smallvec::SmallVec;

use crate::error::NetworkError;

use super::gate::GateId;

/// Back-references from a producer to the gates consuming it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumers {
    entries: SmallVec<[GateId; 4]>,
}

impl Consumers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a consumer entry.
    ///
    /// Storage grows geometrically; an allocation failure leaves the
    /// registry unchanged.
    pub fn add(&mut self, consumer: GateId) -> Result<(), NetworkError> {
        self.entries
            .try_reserve(1)
            .map_err(|_| NetworkError::OutOfMemory)?;
        self.entries.push(consumer);
        Ok(())
    }

    /// Make room for one more entry without adding it.
    pub(crate) fn reserve_one(&mut self) -> Result<(), NetworkError> {
        self.entries
            .try_reserve(1)
            .map_err(|_| NetworkError::OutOfMemory)
    }

    /// Remove the first entry equal to `consumer`. No-op if absent.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, consumer: GateId) -> bool {
        match self.entries.iter().position(|&id| id == consumer) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` in current order.
    pub fn get(&self, index: usize) -> Option<GateId> {
        self.entries.get(index).copied()
    }

    /// Number of entries equal to `consumer`.
    pub fn count(&self, consumer: GateId) -> usize {
        self.entries.iter().filter(|&&id| id == consumer).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = GateId> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut consumers = Consumers::new();
        let a = GateId::new();
        let b = GateId::new();

        consumers.add(a).unwrap();
        consumers.add(b).unwrap();

        assert_eq!(consumers.len(), 2);
        assert_eq!(consumers.get(0), Some(a));
        assert_eq!(consumers.get(1), Some(b));
        assert_eq!(consumers.get(2), None);
    }

    #[test]
    fn remove_swaps_last_into_place() {
        let mut consumers = Consumers::new();
        let ids: Vec<_> = (0..3).map(|_| GateId::new()).collect();
        for &id in &ids {
            consumers.add(id).unwrap();
        }

        assert!(consumers.remove(ids[0]));
        assert_eq!(consumers.len(), 2);
        assert_eq!(consumers.get(0), Some(ids[2]));
        assert_eq!(consumers.get(1), Some(ids[1]));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut consumers = Consumers::new();
        let a = GateId::new();
        consumers.add(a).unwrap();

        assert!(!consumers.remove(GateId::new()));
        assert_eq!(consumers.len(), 1);
    }

    #[test]
    fn duplicates_are_removed_one_at_a_time() {
        let mut consumers = Consumers::new();
        let a = GateId::new();
        consumers.add(a).unwrap();
        consumers.add(a).unwrap();
        assert_eq!(consumers.count(a), 2);

        consumers.remove(a);
        assert_eq!(consumers.count(a), 1);
        consumers.remove(a);
        assert!(consumers.is_empty());
    }

    #[test]
    fn grows_past_inline_capacity() {
        let mut consumers = Consumers::new();
        let ids: Vec<_> = (0..37).map(|_| GateId::new()).collect();
        for &id in &ids {
            consumers.add(id).unwrap();
        }

        assert_eq!(consumers.len(), 37);
        assert!(ids.iter().all(|&id| consumers.count(id) == 1));
    }
}
