//! HashMap-based router keyed by event kind.

use licdata_core::{EventKind, RouteResult, Router, RoutingError};
use std::collections::HashMap;

/// A router backed by `HashMap`, keyed by [`EventKind`].
pub struct KindRouter<V> {
    map: HashMap<EventKind, V>,
}

impl<V> KindRouter<V> {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a route, refusing to replace an existing one.
    pub fn insert(&mut self, kind: EventKind, value: V) -> Result<(), RoutingError> {
        if self.map.contains_key(&kind) {
            return Err(RoutingError::DuplicateRoute(kind));
        }
        self.map.insert(kind, value);
        Ok(())
    }

    /// Iterate over all routes, ordered by kind.
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, &V)> {
        let mut entries: Vec<(EventKind, &V)> = self.map.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(kind, _)| *kind);
        entries.into_iter()
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the router is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<V> Default for KindRouter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Router<EventKind, V> for KindRouter<V>
where
    V: Send + Sync + 'static,
{
    fn route(&self, key: &EventKind) -> RouteResult<'_, V> {
        match self.map.get(key) {
            Some(v) => RouteResult::Matched(v),
            None => RouteResult::NotFound,
        }
    }
}
