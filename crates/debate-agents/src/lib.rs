//! Hosting crate for multi-agent debates.
//!
//! Wires the `coordination` debate engine to hosted chat providers, local
//! tools, environment configuration, and roster files.

pub mod config;
pub mod presets;
pub mod providers;
pub mod report;
pub mod roster;
pub mod tools;

pub use config::AppConfig;
pub use providers::{build_model, ProviderKind};
pub use report::{render_outcome, run_with_deadline};
pub use roster::{ResponderSpec, Roster};
