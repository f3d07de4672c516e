mod plan;
mod progress;
mod service;
mod ticker;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionPlan, SessionPlanner};
pub use progress::SessionProgress;
pub use service::{Navigation, QuizSession, SelectOutcome, SessionPhase, Submission, TickOutcome};
pub use ticker::{ClockTick, TICK_PERIOD, Ticker};
pub use view::{ResultView, format_clock};
pub use workflow::QuizLoopService;
