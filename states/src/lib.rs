//! Single-owner state store for the roster dashboard.
//!
//! A [`StateCtx`] owns every piece of page state. UI code reads and mutates it
//! directly; network work runs as [`Command`]s that report back through an
//! [`Updater`] channel.

mod command;
mod ctx;
mod error;
mod snapshot;
mod state;
mod updater;

pub use command::{Command, CommandFuture};
pub use ctx::StateCtx;
pub use error::Error;
pub use snapshot::CommandSnapshot;
pub use state::State;
pub use updater::{Update, Updater};
