mod controller;
mod engine;
mod session;

pub use controller::TimerController;
pub use engine::{Clock, SystemClock, TickObserver, TimerEngine, TimerStatus};
pub use session::{GraceEdge, SessionUpdate, TimerSession};
