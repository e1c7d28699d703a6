//! Error-event channel for terrain providers.
//!
//! Listeners subscribe and receive every error raised afterwards. A listener
//! that drops its receiver is pruned on the next raise.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::warn;

/// A failure reported by a terrain provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TileProviderError {
    /// Human-readable description.
    pub message: String,
    /// Tile column, when the failure concerns one tile.
    pub x: Option<u32>,
    /// Tile row, when the failure concerns one tile.
    pub y: Option<u32>,
    /// Tile level, when the failure concerns one tile.
    pub level: Option<u32>,
}

impl TileProviderError {
    /// An error not tied to a particular tile.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            x: None,
            y: None,
            level: None,
        }
    }

    /// An error about tile (x, y) at `level`.
    pub fn for_tile(message: impl Into<String>, x: u32, y: u32, level: u32) -> Self {
        Self {
            message: message.into(),
            x: Some(x),
            y: Some(y),
            level: Some(level),
        }
    }
}

/// Broadcast channel of provider errors.
#[derive(Debug, Default)]
pub struct ErrorEvent {
    listeners: Mutex<Vec<Sender<TileProviderError>>>,
}

impl ErrorEvent {
    /// Create an event with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&self) -> Receiver<TileProviderError> {
        let (tx, rx) = unbounded();
        self.listeners.lock().push(tx);
        rx
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver an error to every listener. Returns how many received it.
    pub fn raise(&self, error: TileProviderError) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|tx| tx.send(error.clone()).is_ok());
        if listeners.is_empty() {
            warn!(message = %error.message, "terrain provider error with no listeners");
        }
        listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_listeners_receive() {
        let event = ErrorEvent::new();
        let a = event.subscribe();
        let b = event.subscribe();

        let delivered = event.raise(TileProviderError::for_tile("boom", 1, 2, 3));
        assert_eq!(delivered, 2);
        assert_eq!(a.try_recv().unwrap().level, Some(3));
        assert_eq!(b.try_recv().unwrap().message, "boom");
    }

    #[test]
    fn test_dropped_listener_pruned() {
        let event = ErrorEvent::new();
        let keep = event.subscribe();
        drop(event.subscribe());
        assert_eq!(event.listener_count(), 2);

        assert_eq!(event.raise(TileProviderError::new("first")), 1);
        assert_eq!(event.listener_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn test_raise_without_listeners() {
        let event = ErrorEvent::new();
        assert_eq!(event.raise(TileProviderError::new("nobody hears")), 0);
    }
}
