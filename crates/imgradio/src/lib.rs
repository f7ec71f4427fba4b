//! Image-backed radio buttons and checkboxes.
//!
//! imgradio replaces native radio buttons and checkboxes with image proxies
//! while the native inputs stay in the form as the source of truth. Each
//! control is hidden and followed by a `<span>` proxy; clicking a proxy updates
//! both the native checked state and the proxy's selected class.
//!
//! Two modes are supported:
//!
//! - **Standard**: radio buttons are exclusive within their group, checkboxes
//!   toggle independently.
//! - **Rating**: selecting the Nth item also lights every item before it, the
//!   way a row of stars works. Clicking a lit item clears the whole row.
//!
//! # Example
//!
//! ```
//! use imgradio::{Document, Element, HostDocument, ImageRadio, Mode};
//!
//! let mut doc = Document::new();
//! let form = doc.append(None, Element::form()).unwrap();
//! for color in ["red", "green", "blue"] {
//!     doc.append(Some(form), Element::radio(color, "color")).unwrap();
//! }
//!
//! let mut radio = ImageRadio::new(doc);
//! radio.bind_ids(&["red", "green", "blue"], Mode::Standard).unwrap();
//!
//! let green = radio.proxy_for("green").unwrap();
//! radio.activate(green).unwrap();
//!
//! let group = radio.group_of("green").unwrap();
//! assert_eq!(radio.checked_ids(group), ["green"]);
//! assert!(radio.document().element_by_id("green_img").is_some());
//! ```
//!
//! # Logging
//!
//! Binding and activation are instrumented with `tracing`; see
//! [`imgradio_core::logging::targets`] for the target names.

pub mod binding;
pub mod config;
pub mod controller;
pub mod document;
mod image_radio;
pub mod registry;

pub use config::{ConfigError, ConfigResult, ImgRadioConfig, Mode};
pub use controller::{SelectionPlan, Transition};
pub use document::{ControlInfo, Document, Element, HostDocument, InputKind, Scope, Tag};
pub use image_radio::{Activation, ImageRadio};
pub use registry::{Group, GroupId, GroupKey, GroupRegistry, ProxyEntry, ProxyId};

pub use imgradio_core::{ActivationError, BindingError, DocumentError, NodeId, Signal};
