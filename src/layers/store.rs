use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use super::{BackgroundLayer, Layer};

/// Errors raised by the layer store.
#[derive(Debug, Error, PartialEq)]
pub enum LayerError {
    #[error("background layer already recorded from {0}")]
    BackgroundAlreadySet(String),
}

#[derive(Debug, Default)]
struct Layers {
    background: Option<BackgroundLayer>,
    foreground: Vec<Layer>,
}

/// Shared handle to a session's ordered layer record.
///
/// Clones share the same sequence, so a debug view can hold a handle while the
/// session keeps appending. Writers are serialized by the lock; readers only
/// ever see whole layers.
#[derive(Clone, Debug, Default)]
pub struct LayerStore {
    inner: Arc<RwLock<Layers>>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a foreground layer on top of everything recorded so far.
    pub fn append(&self, layer: impl Into<Layer>) {
        let layer = layer.into();
        let mut layers = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        layers.foreground.push(layer);
    }

    /// Records the background layer in the first slot.
    ///
    /// The background sits beneath every shape regardless of when its load
    /// completes, so it always comes first in a snapshot. A store accepts one
    /// background.
    pub fn set_background(&self, background: BackgroundLayer) -> Result<(), LayerError> {
        let mut layers = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = &layers.background {
            return Err(LayerError::BackgroundAlreadySet(existing.src.clone()));
        }
        layers.background = Some(background);
        Ok(())
    }

    /// Ordered copy of all layers: background first, then shapes in creation order.
    pub fn snapshot(&self) -> Vec<Layer> {
        let layers = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        layers
            .background
            .iter()
            .cloned()
            .map(Layer::Background)
            .chain(layers.foreground.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        let layers = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        layers.foreground.len() + usize::from(layers.background.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_background(&self) -> bool {
        let layers = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        layers.background.is_some()
    }
}
