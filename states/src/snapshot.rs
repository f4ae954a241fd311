use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::State;

/// Owned clones of every snapshot-able state, taken when a command is dispatched.
///
/// Commands run off the UI thread, so they read from this copy instead of the
/// live [`StateCtx`](crate::StateCtx).
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_boxed(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    /// Adds a value directly. Mostly useful for driving commands in tests.
    pub fn with<T: State>(mut self, value: T) -> Self {
        self.inner.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was not registered or does not implement [`State::snapshot`].
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for CommandSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSnapshot")
            .field("states", &self.inner.len())
            .finish()
    }
}
