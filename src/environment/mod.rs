pub mod events;
pub mod monitor;
pub mod port;

pub use events::{EnvironmentEvent, KeyEvent};
pub use monitor::{classify, is_suspicious_key};
pub use port::{ChannelEnvironment, DetachedEnvironment, EnvironmentHandle, EnvironmentPort};
