//! Logging facilities for imgradio.
//!
//! imgradio uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("imgradio=debug")
//!         .init();
//! }
//! ```
//!
//! Binding is logged at `debug`, every activation opens a `trace` span and
//! logs each native/proxy write inside it.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "imgradio_core::signal";
    /// Binding initializer target.
    pub const BINDING: &str = "imgradio::binding";
    /// Selection controller target.
    pub const CONTROLLER: &str = "imgradio::controller";
    /// In-memory document target.
    pub const DOCUMENT: &str = "imgradio::document";
    /// Configuration loading target.
    pub const CONFIG: &str = "imgradio::config";
}
