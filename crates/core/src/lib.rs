#![forbid(unsafe_code)]

pub mod countdown;
pub mod grading;
pub mod model;
pub mod time;

pub use countdown::{Countdown, CountdownEvent};
pub use grading::{Selections, grade};
pub use time::Clock;
