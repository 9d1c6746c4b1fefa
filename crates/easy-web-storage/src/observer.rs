use std::collections::BTreeMap;

/// Token returned when an observer is registered. Pass it back to unregister that observer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        ObserverHandle(id)
    }
}

/// Observers kept in registration order. Handle ids only grow, so map order is registration order.
pub(crate) struct Observers<F: ?Sized> {
    next_id: u64,
    entries: BTreeMap<u64, Box<F>>,
}

impl<F: ?Sized> Default for Observers<F> {
    fn default() -> Self {
        Observers { next_id: 1, entries: BTreeMap::new() }
    }
}

impl<F: ?Sized> Observers<F> {
    pub(crate) fn insert(&mut self, observer: Box<F>) -> ObserverHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, observer);
        ObserverHandle(id)
    }

    pub(crate) fn remove(&mut self, handle: ObserverHandle) -> bool {
        self.entries.remove(&handle.0).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &F> {
        self.entries.values().map(|observer| observer.as_ref())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
