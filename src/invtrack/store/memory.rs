use super::backend::Backend;
use crate::error::{InvError, Result};
use crate::model::Data;
use std::cell::{Cell, RefCell};

/// In-memory storage backend for testing and throwaway stores.
///
/// Uses `Cell`/`RefCell` for interior mutability since the store is
/// single-threaded. Keeps a count of successful writes so tests can assert
/// that an operation did or did not persist.
#[derive(Debug, Default)]
pub struct MemBackend {
    data: RefCell<Option<Data>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `data`, as if a previous store saved it.
    pub fn with_data(data: Data) -> Self {
        let backend = Self::default();
        *backend.data.borrow_mut() = Some(data);
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Snapshot of what was last saved.
    pub fn stored(&self) -> Option<Data> {
        self.data.borrow().clone()
    }
}

impl Backend for MemBackend {
    fn load(&self) -> Result<Option<Data>> {
        if self.simulate_read_error.get() {
            return Err(InvError::Io(std::io::Error::other("simulated read error")));
        }
        Ok(self.data.borrow().clone())
    }

    fn save(&self, data: &Data) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(InvError::Io(std::io::Error::other("simulated write error")));
        }
        *self.data.borrow_mut() = Some(data.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
