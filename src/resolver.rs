use log::{debug, warn};
use std::collections::HashMap;

enum Entry<A, B> {
    /// References waiting for the instance, in link order.
    Pending(Vec<B>),
    Resolved(A),
}

/// Connects references to instances that may be declared later in a document.
///
/// `link` either returns the instance straight away or queues the reference;
/// `resolve` hands the instance to `on_resolve` once per queued reference, in
/// the order they were linked.
///
/// Each key should be resolved once. Resolving it again replaces the stored
/// instance but does not replay references that were already delivered.
pub struct Resolver<A, B, F>
where
    F: FnMut(&A, B),
{
    entries: HashMap<String, Entry<A, B>>,
    on_resolve: F,
}

impl<A, B, F> Resolver<A, B, F>
where
    F: FnMut(&A, B),
{
    pub fn new(on_resolve: F) -> Self {
        Self {
            entries: HashMap::new(),
            on_resolve,
        }
    }

    /// Returns the instance for `key` if it is resolved, otherwise queues
    /// `reference` until it is.
    pub fn link(&mut self, key: &str, reference: B) -> Option<&A> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Pending(Vec::new()));

        match entry {
            Entry::Resolved(instance) => Some(&*instance),
            Entry::Pending(queue) => {
                queue.push(reference);
                None
            }
        }
    }

    pub fn resolve(&mut self, key: &str, instance: A) {
        match self.entries.remove(key) {
            Some(Entry::Pending(queue)) => {
                debug!("resolving '{}' for {} pending reference(s)", key, queue.len());
                for reference in queue {
                    (self.on_resolve)(&instance, reference);
                }
            }
            Some(Entry::Resolved(_)) => {
                warn!("'{}' was resolved more than once; keeping the latest instance", key);
            }
            None => {}
        }
        self.entries.insert(key.to_string(), Entry::Resolved(instance));
    }

    pub fn get(&self, key: &str) -> Option<&A> {
        match self.entries.get(key) {
            Some(Entry::Resolved(instance)) => Some(instance),
            _ => None,
        }
    }

    pub fn is_resolved(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of references still waiting on `key`.
    pub fn pending(&self, key: &str) -> usize {
        match self.entries.get(key) {
            Some(Entry::Pending(queue)) => queue.len(),
            _ => 0,
        }
    }

    /// Keys that were linked but never resolved, sorted.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Pending(queue) if !queue.is_empty()))
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}
