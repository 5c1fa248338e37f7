use serde::Serialize;
use std::collections::HashMap;

/// A model the completion router understands, as offered in the model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Selector key used by the dashboard (`orchestration`, `coding`, ...).
    pub key: &'static str,
    /// Model id sent upstream.
    pub id: &'static str,
    /// Human label; also used in relay failure messages.
    pub name: &'static str,
    pub description: &'static str,
}

/// Immutable registry of model descriptors, built once at startup.
///
/// Order is preserved for listing; lookups go through the key index.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    key_to_index: HashMap<&'static str, usize>,
    descriptors: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// Builds a registry from an ordered list of descriptors. The first one is the default.
    ///
    /// # Panics
    /// Panics on an empty list or a duplicated key; both are programming errors.
    pub fn new(models: &[ModelDescriptor]) -> Self {
        assert!(!models.is_empty(), "ModelRegistry needs at least one model");

        let mut key_to_index = HashMap::with_capacity(models.len());
        for (idx, model) in models.iter().enumerate() {
            if key_to_index.insert(model.key, idx).is_some() {
                panic!("duplicate model selector key: {}", model.key);
            }
        }

        Self {
            key_to_index,
            descriptors: models.to_vec(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModelDescriptor> {
        self.key_to_index
            .get(key)
            .and_then(|&idx| self.descriptors.get(idx))
    }

    pub fn default_model(&self) -> &ModelDescriptor {
        &self.descriptors[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
