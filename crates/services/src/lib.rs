#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    ClockTick, Navigation, QuizLoopService, QuizSession, ResultView, SelectOutcome, SessionPhase,
    SessionPlan, SessionPlanner, SessionProgress, Submission, TickOutcome, Ticker, format_clock,
};
