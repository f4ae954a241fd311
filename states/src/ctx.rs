use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use flume::Receiver;
use log::{error, info, warn};
use tokio::task::JoinSet;

use crate::{Command, CommandSnapshot, Error, State, Update, Updater};

type SnapshotFn = fn(&dyn Any) -> Option<Box<dyn Any + Send>>;

fn snapshot_of<T: State>(value: &dyn Any) -> Option<Box<dyn Any + Send>> {
    value.downcast_ref::<T>().and_then(State::snapshot)
}

struct Slot {
    name: &'static str,
    value: Box<dyn Any + Send>,
    snapshot: SnapshotFn,
}

/// Single-owner store for one page (or one table instance).
///
/// The owner reads and mutates states synchronously. Commands get a
/// [`CommandSnapshot`] and an [`Updater`]; their writes land when the owner
/// calls [`StateCtx::sync_updates`]. Two contexts never share anything, so
/// several tables can live side by side.
pub struct StateCtx {
    states: BTreeMap<TypeId, Slot>,
    commands: BTreeMap<TypeId, Box<dyn Command>>,
    updater: Updater,
    recv: Receiver<Update>,
    tasks: JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field(
                "states",
                &self.states.values().map(|s| s.name).collect::<Vec<_>>(),
            )
            .field("commands", &self.commands.len())
            .field("in_flight", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            commands: BTreeMap::new(),
            updater: Updater::new(send),
            recv,
            tasks: JoinSet::new(),
        }
    }

    /// Registers (or replaces) the state of type `T`.
    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(
            TypeId::of::<T>(),
            Slot {
                name: type_name::<T>(),
                value: Box::new(state),
                snapshot: snapshot_of::<T>,
            },
        );
    }

    pub fn record_command<C: Command>(&mut self, command: C) {
        self.commands.insert(TypeId::of::<C>(), Box::new(command));
    }

    pub fn has_state<T: State>(&self) -> bool {
        self.states.contains_key(&TypeId::of::<T>())
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    pub fn try_state_mut<T: State>(&mut self) -> Result<&mut T, Error> {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
            .ok_or_else(Error::state_not_found::<T>)
    }

    /// # Panics
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// # Panics
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.try_state_mut::<T>()
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Mutates `T` in place and returns whatever the closure returns.
    pub fn update<T: State, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(self.state_mut::<T>())
    }

    pub fn updater(&self) -> Updater {
        self.updater.clone()
    }

    pub fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, slot) in &self.states {
            if let Some(value) = (slot.snapshot)(slot.value.as_ref()) {
                snap.insert_boxed(*id, value);
            }
        }
        snap
    }

    /// Runs command `C` on the current tokio runtime.
    ///
    /// Fails without running anything when `C` is not registered or when no
    /// runtime is entered.
    pub fn try_dispatch<C: Command>(&mut self) -> Result<(), Error> {
        let name = type_name::<C>();
        let command = self
            .commands
            .get(&TypeId::of::<C>())
            .ok_or_else(Error::command_not_found::<C>)?;

        let handle = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let future = command.run(self.snapshot(), self.updater.clone());
        info!("StateCtx: dispatched {name}");
        self.tasks.spawn_on(future, &handle);
        Ok(())
    }

    pub fn dispatch<C: Command>(&mut self) {
        if let Err(e) = self.try_dispatch::<C>() {
            error!("StateCtx: dispatch failed: {e}");
        }
    }

    /// Applies every update sent so far. Returns how many were applied.
    pub fn sync_updates(&mut self) -> usize {
        let mut applied = 0;
        // Reap finished tasks so the in-flight count stays accurate.
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(e) = joined {
                error!("StateCtx: command task failed: {e}");
            }
        }

        while let Ok(update) = self.recv.try_recv() {
            let Some(slot) = self.states.get_mut(&update.id()) else {
                warn!(
                    "StateCtx: dropping update for unregistered state {}",
                    update.name()
                );
                continue;
            };
            match update {
                Update::Replace { value, .. } => slot.value = value,
                Update::Apply { apply, .. } => apply(slot.value.as_mut()),
            }
            applied += 1;
        }
        applied
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for the next command to finish, then syncs.
    ///
    /// Returns `false` when nothing was in flight.
    pub async fn join_next(&mut self) -> bool {
        let Some(joined) = self.tasks.join_next().await else {
            return false;
        };
        if let Err(e) = joined {
            error!("StateCtx: command task failed: {e}");
        }
        self.sync_updates();
        true
    }

    /// Waits for every in-flight command and applies their updates.
    pub async fn settle(&mut self) {
        while self.join_next().await {}
        self.sync_updates();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandFuture, snapshot_state};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i32,
    }

    snapshot_state!(Counter);

    #[derive(Debug, Default)]
    struct Private {
        hits: u32,
    }

    impl State for Private {}

    struct Increment;

    impl Command for Increment {
        fn run(&self, snap: CommandSnapshot, updater: Updater) -> CommandFuture {
            let current = snap.state::<Counter>().value;
            Box::pin(async move {
                updater.set(Counter { value: current + 1 });
                updater.apply::<Private, _>(|p| p.hits += 1);
            })
        }
    }

    #[test]
    fn state_roundtrip_and_update() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.update::<Counter, _>(|c| c.value = 7);
        assert_eq!(ctx.state::<Counter>().value, 7);
    }

    #[test]
    fn missing_state_is_an_error() {
        let ctx = StateCtx::new();
        assert_eq!(
            ctx.try_state::<Counter>().unwrap_err(),
            Error::state_not_found::<Counter>()
        );
    }

    #[test]
    fn snapshot_only_contains_clonable_states() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 3 });
        ctx.add_state(Private::default());

        let snap = ctx.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.state::<Counter>().value, 3);
        assert!(snap.try_state::<Private>().is_none());
    }

    #[test]
    fn dispatch_without_runtime_fails_cleanly() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.record_command(Increment);
        assert_eq!(ctx.try_dispatch::<Increment>(), Err(Error::NoRuntime));
        assert_eq!(ctx.in_flight(), 0);
    }

    #[test]
    fn updates_for_unknown_states_are_dropped() {
        let mut ctx = StateCtx::new();
        ctx.updater().set(Counter { value: 1 });
        assert_eq!(ctx.sync_updates(), 0);
    }

    #[tokio::test]
    async fn dispatch_applies_updates_on_settle() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 41 });
        ctx.add_state(Private::default());
        ctx.record_command(Increment);

        ctx.dispatch::<Increment>();
        ctx.settle().await;

        assert_eq!(ctx.state::<Counter>().value, 42);
        assert_eq!(ctx.state::<Private>().hits, 1);
        assert_eq!(ctx.in_flight(), 0);
    }

    #[tokio::test]
    async fn unregistered_command_is_reported() {
        let mut ctx = StateCtx::new();
        assert_eq!(
            ctx.try_dispatch::<Increment>(),
            Err(Error::command_not_found::<Increment>())
        );
    }
}
