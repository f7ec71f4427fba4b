//! Core types for imgradio.
//!
//! This crate provides the building blocks shared by the `imgradio` crate:
//!
//! - **Node identifiers**: [`NodeId`], a stable handle into a host document
//! - **Errors**: [`DocumentError`], [`BindingError`], [`ActivationError`]
//! - **Signal/Slot System**: [`Signal`] for change notification
//! - **Logging**: tracing target names for filtering
//!
//! # Signal Example
//!
//! ```
//! use imgradio_core::Signal;
//!
//! let toggled = Signal::<(String, bool)>::new();
//!
//! let conn_id = toggled.connect(|(id, checked)| {
//!     println!("{id} is now {}", if *checked { "on" } else { "off" });
//! });
//!
//! toggled.emit(("star_3".to_string(), true));
//! toggled.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
mod node;
pub mod signal;

pub use error::{ActivationError, BindingError, DocumentError, DocumentResult};
pub use node::NodeId;
pub use signal::{ConnectionId, Signal};
