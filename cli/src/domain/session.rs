//! Per-invocation session: the currently selected instance.
//!
//! A `Session` is created once per command and passed explicitly to every
//! operation that needs "the current instance". It is never persisted.

use crate::domain::error::SelectionError;
use crate::domain::instance::{InstanceDescriptor, InstanceState};

/// The instance a command is acting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedInstance {
    pub id: String,
    pub address: Option<String>,
    pub state: InstanceState,
}

impl SelectedInstance {
    /// Public address, or an error if the instance has none.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoAddress` when the instance has no address.
    pub fn address(&self) -> Result<&str, SelectionError> {
        self.address
            .as_deref()
            .ok_or_else(|| SelectionError::NoAddress {
                id: self.id.clone(),
            })
    }
}

#[derive(Debug, Default)]
pub struct Session {
    current: Option<SelectedInstance>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the instance at `index` in `listing`.
    ///
    /// On failure the session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `NoInstances` for an empty listing, `OutOfRange` when
    /// `index >= listing.len()`.
    pub fn select(
        &mut self,
        listing: &[InstanceDescriptor],
        index: usize,
    ) -> Result<&SelectedInstance, SelectionError> {
        if listing.is_empty() {
            return Err(SelectionError::NoInstances);
        }
        let chosen = listing.get(index).ok_or(SelectionError::OutOfRange {
            index,
            count: listing.len(),
        })?;
        Ok(self.current.insert(SelectedInstance {
            id: chosen.id.clone(),
            address: chosen.address.clone(),
            state: chosen.state.clone(),
        }))
    }

    /// Record a freshly created instance.
    pub fn adopt(&mut self, instance: SelectedInstance) {
        self.current = Some(instance);
    }

    /// Update the cached address once it becomes known.
    pub fn set_address(&mut self, address: String) {
        if let Some(current) = self.current.as_mut() {
            current.address = Some(address);
        }
    }

    /// Forget the current instance (after stop or terminate).
    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&SelectedInstance> {
        self.current.as_ref()
    }

    /// The current instance, or `NothingSelected`.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NothingSelected` if no instance is selected.
    pub fn require(&self) -> Result<&SelectedInstance, SelectionError> {
        self.current.as_ref().ok_or(SelectionError::NothingSelected)
    }
}
