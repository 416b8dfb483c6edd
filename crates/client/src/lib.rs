//! Client-side session runtime.
//!
//! Wraps the pure reducer in `tempo_core` with the pieces a front end
//! needs to drive a session:
//!
//! - [`SessionStore`], the persistence port, with a guest implementation
//!   ([`LocalStore`], JSON file) and an authenticated one ([`RemoteStore`],
//!   HTTP against the tempo API);
//! - [`SessionHost`], which owns the shared [`TimerState`](tempo_core::timer::TimerState)
//!   and the one-second ticker task;
//! - [`SyncCoordinator`], which periodically overwrites the local state
//!   with the server's canonical record while authenticated.

pub mod error;
pub mod host;
pub mod local;
pub mod remote;
pub mod store;
pub mod sync;

pub use error::ClientError;
pub use host::SessionHost;
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use store::SessionStore;
pub use sync::SyncCoordinator;
