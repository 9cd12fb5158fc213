//! Embassy async tasks
//!
//! Each task runs independently and communicates through
//! [`crate::channels`].

pub mod button;
pub mod controller;
pub mod tick;

pub use button::button_task;
pub use controller::controller_task;
pub use tick::tick_task;
