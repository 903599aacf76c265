use crate::handler::LogHandler;
use std::sync::Arc;

/// Ordered handler list owned by the engine worker.
///
/// Identity is the address of the shared handler, not its value. The same
/// handler may be registered more than once and then receives each record
/// once per registration.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn LogHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handler: Arc<dyn LogHandler>) {
        self.handlers.push(handler);
    }

    /// Removes every registration of `handler`, returning how many were removed.
    pub fn remove(&mut self, handler: &Arc<dyn LogHandler>) -> usize {
        let before = self.handlers.len();
        self.handlers
            .retain(|registered| !std::ptr::addr_eq(Arc::as_ptr(registered), Arc::as_ptr(handler)));
        before - self.handlers.len()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LogHandler>> {
        self.handlers.iter()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::MemoryHandler;

    #[test]
    fn test_preserves_insertion_order_and_duplicates() {
        let a: Arc<dyn LogHandler> = Arc::new(MemoryHandler::new());
        let b: Arc<dyn LogHandler> = Arc::new(MemoryHandler::new());

        let mut registry = HandlerRegistry::new();
        registry.add(a.clone());
        registry.add(b.clone());
        registry.add(a.clone());

        let order: Vec<bool> = registry
            .iter()
            .map(|h| std::ptr::addr_eq(Arc::as_ptr(h), Arc::as_ptr(&a)))
            .collect();
        assert_eq!(order, vec![true, false, true]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_is_by_identity() {
        let a: Arc<dyn LogHandler> = Arc::new(MemoryHandler::new());
        let twin: Arc<dyn LogHandler> = Arc::new(MemoryHandler::new());

        let mut registry = HandlerRegistry::new();
        registry.add(a.clone());
        registry.add(twin.clone());
        registry.add(a.clone());

        assert_eq!(registry.remove(&a), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove(&a), 0);

        registry.clear();
        assert!(registry.is_empty());
    }
}
