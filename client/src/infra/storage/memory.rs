//! In-memory [`Storage`] implementation.

use std::{cell::RefCell, rc::Rc};

use tracerr::Traced;

use super::{Error, Persisted, Storage};

/// [`Storage`] keeping tokens in memory only.
///
/// Clones share the same tokens.
#[derive(Clone, Debug, Default)]
pub struct Memory(Rc<RefCell<Option<Persisted>>>);

impl Memory {
    /// Creates a new [`Memory`] [`Storage`] holding the provided `tokens`.
    #[must_use]
    pub fn with(tokens: Persisted) -> Self {
        Self(Rc::new(RefCell::new(Some(tokens))))
    }

    /// Returns the currently held tokens.
    #[must_use]
    pub fn get(&self) -> Option<Persisted> {
        self.0.borrow().clone()
    }
}

impl Storage for Memory {
    fn load(&self) -> Result<Option<Persisted>, Traced<Error>> {
        Ok(self.get())
    }

    fn save(&self, tokens: &Persisted) -> Result<(), Traced<Error>> {
        drop(self.0.replace(Some(tokens.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), Traced<Error>> {
        drop(self.0.take());
        Ok(())
    }
}
