//! Channel used by commands to write back into the store.
//!
//! Commands never hold a reference to [`StateCtx`](crate::StateCtx). They send
//! [`Update`]s through an [`Updater`] and the owner applies them on its own
//! thread in [`StateCtx::sync_updates`](crate::StateCtx::sync_updates).

use std::any::{Any, TypeId, type_name};

use flume::{Receiver, Sender};
use log::warn;

use crate::State;

type ApplyFn = Box<dyn FnOnce(&mut dyn Any) + Send>;

/// A pending write to one state.
pub enum Update {
    /// Replace the whole state value.
    Replace {
        id: TypeId,
        name: &'static str,
        value: Box<dyn Any + Send>,
    },
    /// Mutate the current value in place.
    Apply {
        id: TypeId,
        name: &'static str,
        apply: ApplyFn,
    },
}

impl Update {
    pub fn id(&self) -> TypeId {
        match self {
            Self::Replace { id, .. } | Self::Apply { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Replace { name, .. } | Self::Apply { name, .. } => name,
        }
    }
}

impl std::fmt::Debug for Update {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace { name, .. } => f.debug_tuple("Replace").field(name).finish(),
            Self::Apply { name, .. } => f.debug_tuple("Apply").field(name).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Creates a detached updater plus the receiving end. Used by tests that
    /// run a command without a full context.
    pub fn channel() -> (Self, Receiver<Update>) {
        let (send, recv) = flume::unbounded();
        (Self { send }, recv)
    }

    /// Replaces the state of type `T`.
    pub fn set<T: State>(&self, value: T) {
        self.send(Update::Replace {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            value: Box::new(value),
        });
    }

    /// Mutates the state of type `T` in place once the owner syncs.
    pub fn apply<T, F>(&self, f: F)
    where
        T: State,
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.send(Update::Apply {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            apply: Box::new(move |any: &mut dyn Any| {
                if let Some(state) = any.downcast_mut::<T>() {
                    f(state);
                }
            }),
        });
    }

    fn send(&self, update: Update) {
        let name = update.name();
        if self.send.send(update).is_err() {
            warn!("Updater: store dropped, discarding update for {name}");
        }
    }
}
