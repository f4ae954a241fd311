use std::any::Any;

/// A value owned by a [`StateCtx`](crate::StateCtx).
///
/// States are keyed by their concrete type, so a context holds at most one
/// value of each type. A state that commands need to read overrides
/// [`State::snapshot`] to hand out a clone; everything else stays private to
/// the UI thread.
pub trait State: Any + Send {
    /// Clone of this state for a [`CommandSnapshot`](crate::CommandSnapshot).
    ///
    /// Returns `None` by default, which keeps the state out of snapshots.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// Implements [`State`] for a `Clone` type so it is visible to commands.
///
/// ```ignore
/// #[derive(Debug, Clone, Default)]
/// struct Filters { search: String }
///
/// snapshot_state!(Filters);
/// ```
#[macro_export]
macro_rules! snapshot_state {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::State for $ty {
                fn snapshot(&self) -> Option<Box<dyn ::std::any::Any + Send>> {
                    Some(Box::new(self.clone()))
                }
            }
        )+
    };
}
