//! Adaptive scheduler: job registration, interval adaptation, triggers, and
//! cancellation (`spec.md` §4.E).

pub mod interval;
pub mod scheduler;
pub mod tick;

pub use scheduler::Scheduler;
pub use tick::spawn_tick_loop;
