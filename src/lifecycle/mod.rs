mod engine;
mod guard;
mod state;
mod work;

pub use engine::{LifecycleEngine, TransitionError};
pub use guard::{GuardFailure, TransitionGuard};
pub use state::{Edge, StateRegistry, TransitionName, WorkState};
pub use work::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, NewWork, Priority, WorkItem};
