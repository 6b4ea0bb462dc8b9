//! HTTP request handlers.

pub mod evidence;
pub mod health;
pub mod jobs;
pub mod plots;

pub use evidence::submit_evidence;
pub use health::health_check;
pub use jobs::get_job;
pub use plots::get_plot;
