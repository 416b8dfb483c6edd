//! Domain logic for the tempo work/break tracking system.
//!
//! Everything in this crate is pure: no I/O, no clocks. Callers pass `now`
//! explicitly so the server, the guest reducer, and the tests all share the
//! same transition code.

pub mod error;
pub mod locale;
pub mod notes;
pub mod record;
pub mod segment;
pub mod stats;
pub mod timer;
pub mod types;
