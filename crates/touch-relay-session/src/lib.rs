//! Session orchestration for touch-relay.
//!
//! Ties the pipeline together on the producer side: loads the TOML
//! configuration, binds the token command listener, and feeds parsed
//! commands through the gesture handler into the injector.

pub mod config;
pub mod error;
pub mod session;

pub use config::{config_dir, load_config, write_default_config, Config, InjectorConfig, SessionConfig};
pub use error::SessionError;
pub use session::{Session, ShutdownHandle};
