//! Roster business integration tests, built as one binary so the shared
//! helpers in `common` are compiled once.

mod bulk_actions;
mod common;
mod roster_fetch;
