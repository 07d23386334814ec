//! Incremental page loading
//!
//! ColumnLoader owns the accumulated result buffer and pagination cursor
//! for one column and exposes read-only snapshots to the host.

mod core;
mod state;

pub use self::core::{ColumnLoader, LoadTicket};
pub use state::{LoadFailure, Phase, Snapshot};
