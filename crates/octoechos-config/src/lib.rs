//! Session configuration for the octoechos keyboard.
//!
//! A session file carries the performance context that every pitch and
//! timing computation reads: the selected mode, its base frequency, the
//! octave shift, tempo, volume and timbre, plus engine envelope timings and
//! audio stream settings.
//!
//! # Features
//!
//! - **Session files**: load and save [`SessionConfig`] as TOML
//! - **Validation**: [`SessionConfig::normalize`] clamps every value into
//!   range and reports what it changed; nothing is rejected
//! - **Paths**: platform-specific default location via [`paths`]
//!
//! # Example
//!
//! ```rust
//! use octoechos_config::SessionConfig;
//!
//! let mut session = SessionConfig::from_toml("glas = 6\nbpm = 500\n").unwrap();
//! let adjustments = session.normalize();
//! assert_eq!(session.bpm, 240);
//! assert_eq!(adjustments.len(), 1);
//! assert_eq!(session.keyboard().glas().id, 6);
//! ```

mod error;
mod session;

/// Platform-specific paths for configuration files.
pub mod paths;

/// Range checks and clamping for session values.
pub mod validation;

pub use error::ConfigError;
pub use paths::{default_session_path, find_session, user_config_dir};
pub use session::{AudioSection, EngineSection, SessionConfig};
pub use validation::Adjustment;
