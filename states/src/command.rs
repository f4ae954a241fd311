use std::future::Future;
use std::pin::Pin;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A manual-only side effect (usually network IO).
///
/// Commands are registered once with [`StateCtx::record_command`](crate::StateCtx::record_command)
/// and run only when explicitly dispatched. They read inputs from the
/// snapshot taken at dispatch time and report results through the updater.
pub trait Command: Send + Sync + 'static {
    fn run(&self, snap: CommandSnapshot, updater: Updater) -> CommandFuture;
}
