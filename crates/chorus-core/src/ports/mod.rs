//! Port traits for the orchestrator's external collaborators.
//!
//! These are the only seams through which the state machine touches the
//! outside world: the live session transport, the configuration store, and
//! call bookkeeping. Concrete adapters live in `chorus-infrastructure` and in
//! test doubles.

mod analytics;
mod persistence;
mod session;

pub use analytics::{AnalyticsPort, CallStatus};
pub use persistence::PersistencePort;
pub use session::{SessionHandle, SessionPort};
