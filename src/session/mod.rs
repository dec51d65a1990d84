pub mod controller;
pub mod events;
pub mod state;
mod workers;

pub use controller::SessionController;
pub use events::{MonitorEvent, MonitorReport};
pub use state::{SessionState, SessionStatus};
