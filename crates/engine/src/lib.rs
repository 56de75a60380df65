//! Vessel Engine library.
//!
//! Drives the containment core: one [`Simulation`] per session and per
//! participant, advanced by [`Simulation::step`] and kept consistent across a
//! server and its clients by the [`sync`] relay.
//!
//! ## Structure
//!
//! - `simulation/` - context object, predicates, actions and the tick driver
//! - `sync/` - server rebroadcast and client apply
//! - `adapters/` - reference entity adapter used by the runner and tests
//! - `infrastructure/` - ports, their production implementations, settings

pub mod adapters;
pub mod infrastructure;
pub mod simulation;
pub mod sync;

pub use adapters::{Actor, ActorTemplate};
pub use infrastructure::error::EngineError;
pub use infrastructure::settings::EngineConfig;
pub use simulation::{Simulation, Topology};
pub use sync::{ParticipantId, SyncClient, SyncError, SyncRelay};
