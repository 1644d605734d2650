/// Handle returned when a listener is registered; pass it back to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut() + Send>;

/// Multicast list of no-argument callbacks, invoked synchronously in
/// registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, callback: impl FnMut() + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(callback)));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn fire(&mut self) {
        for (_, callback) in self.entries.iter_mut() {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn fires_in_registration_order_and_removes() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::new();

        let a = {
            let calls = Arc::clone(&calls);
            listeners.add(move || calls.lock().unwrap().push("a"))
        };
        {
            let calls = Arc::clone(&calls);
            listeners.add(move || calls.lock().unwrap().push("b"));
        }

        listeners.fire();
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        listeners.fire();

        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "b"]);
        assert_eq!(listeners.len(), 1);
    }
}
