//! Switchboard Runtime - Orchestration layer for the Switchboard interaction router.
//!
//! This crate provides:
//! - Layered configuration loading (`config`)
//! - Logging setup over `tracing-subscriber` (`logging`)
//! - The [`SwitchboardRuntime`], which registers commands on startup and
//!   drains the transport's event channel into a
//!   [`DispatchRoot`](switchboard_framework::DispatchRoot)
//!
//! ```ignore
//! use switchboard_runtime::SwitchboardRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = SwitchboardRuntime::builder()
//!         .api(api)
//!         .registrar(registrar)
//!         .build()?;
//!
//!     let mut router = runtime.router("main");
//!     router.command(Command::chat("ping", "Pong!").build(ping)?)?;
//!     runtime.add_router(router)?;
//!
//!     tokio::spawn(gateway.pump(runtime.event_sender()));
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, SwitchboardConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use runtime::{RuntimeBuilder, RuntimeStats, SwitchboardRuntime};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for application code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
