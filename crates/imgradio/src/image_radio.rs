//! The [`ImageRadio`] facade.

use imgradio_core::logging::targets;
use imgradio_core::{ActivationError, BindingError, NodeId, Signal};

use crate::binding::bind_controls;
use crate::config::{ConfigResult, ImgRadioConfig, Mode};
use crate::controller::{apply_plan, plan_activation, Transition};
use crate::document::{Document, HostDocument, Scope};
use crate::registry::{GroupId, GroupRegistry, ProxyId};

/// Outcome of one proxy activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The activated proxy.
    pub proxy: ProxyId,
    /// Identifier of the proxy's control.
    pub control_id: String,
    /// Which way the control flipped.
    pub transition: Transition,
    /// The group's mode.
    pub mode: Mode,
}

impl Activation {
    /// The control's checked state after the activation.
    pub fn checked(&self) -> bool {
        self.transition == Transition::Check
    }
}

/// Image-backed radio buttons and checkboxes over a host document.
///
/// `ImageRadio` owns the document it decorates, the registry of bound groups
/// and the configuration. Hosts bind controls once, then forward clicks:
///
/// 1. [`bind`](Self::bind) hides each control and inserts its proxy
/// 2. the host routes a click on any node through [`click`](Self::click), or
///    a known proxy through [`activate`](Self::activate)
/// 3. the group is updated and [`activated`](Self::activated) /
///    [`toggled`](Self::toggled) are emitted
///
/// # Example
///
/// ```
/// use imgradio::{Document, Element, ImageRadio, Mode};
///
/// let mut doc = Document::new();
/// let form = doc.append(None, Element::form()).unwrap();
/// let stars: Vec<_> = (1..=5)
///     .map(|i| doc.append(Some(form), Element::radio(format!("s{i}"), "stars")).unwrap())
///     .collect();
///
/// let mut radio = ImageRadio::new(doc);
/// let proxies = radio.bind_with_mode(&stars, Mode::Rating).unwrap();
///
/// radio.activate(proxies[2]).unwrap();
/// let group = radio.group_of("s3").unwrap();
/// assert_eq!(radio.rating(group), 3);
/// assert_eq!(radio.checked_ids(group), ["s3"]);
/// ```
pub struct ImageRadio<D: HostDocument = Document> {
    document: D,
    registry: GroupRegistry,
    config: ImgRadioConfig,

    /// Emitted once per activation.
    pub activated: Signal<Activation>,

    /// Emitted for every control whose checked state changed.
    /// Parameter is (control identifier, checked).
    pub toggled: Signal<(String, bool)>,
}

impl<D: HostDocument> ImageRadio<D> {
    /// Wrap a document with the default configuration.
    pub fn new(document: D) -> Self {
        Self {
            document,
            registry: GroupRegistry::new(),
            config: ImgRadioConfig::default(),
            activated: Signal::new(),
            toggled: Signal::new(),
        }
    }

    /// Wrap a document with a validated configuration.
    pub fn with_config(document: D, config: ImgRadioConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(document)
        })
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Give the document back, dropping all bindings.
    pub fn into_document(self) -> D {
        self.document
    }

    pub fn config(&self) -> &ImgRadioConfig {
        &self.config
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Bind controls using the configured default mode.
    pub fn bind(&mut self, controls: &[NodeId]) -> Result<Vec<ProxyId>, BindingError> {
        let mode = self.config.mode;
        self.bind_with_mode(controls, mode)
    }

    /// Bind controls in the given mode.
    pub fn bind_with_mode(
        &mut self,
        controls: &[NodeId],
        mode: Mode,
    ) -> Result<Vec<ProxyId>, BindingError> {
        bind_controls(
            &mut self.document,
            &mut self.registry,
            &self.config,
            controls,
            mode,
        )
    }

    /// Bind the controls with the given identifiers.
    pub fn bind_ids(&mut self, ids: &[&str], mode: Mode) -> Result<Vec<ProxyId>, BindingError> {
        let nodes = ids
            .iter()
            .map(|&id| {
                self.document
                    .element_by_id(id)
                    .ok_or_else(|| BindingError::UnknownIdentifier { id: id.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.bind_with_mode(&nodes, mode)
    }

    /// Bind every element carrying `class`, in document order.
    pub fn bind_class(&mut self, class: &str, mode: Mode) -> Result<Vec<ProxyId>, BindingError> {
        let nodes = self.document.elements_with_class(Scope::Document, class);
        self.bind_with_mode(&nodes, mode)
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Handle an activation of a bound proxy.
    ///
    /// # Panics
    ///
    /// Panics if `proxy` was not issued by this instance.
    #[tracing::instrument(skip(self), target = "imgradio::controller", level = "trace")]
    pub fn activate(&mut self, proxy: ProxyId) -> Result<Activation, ActivationError> {
        let (transition, plan) = plan_activation(&self.document, &self.registry, proxy)?;
        let changed = apply_plan(&mut self.document, &self.config, &plan)?;

        let Some(entry) = self.registry.entry(proxy) else {
            panic!("proxy {proxy:?} has no registry entry");
        };
        let mode = self
            .registry
            .group(entry.group)
            .map(|g| g.mode())
            .unwrap_or_default();
        let activation = Activation {
            proxy,
            control_id: entry.control_id.clone(),
            transition,
            mode,
        };
        tracing::trace!(
            target: targets::CONTROLLER,
            control = %activation.control_id,
            ?transition,
            changed = changed.len(),
            "activation applied"
        );

        for (node, checked) in changed {
            if let Some(id) = self
                .registry
                .proxy_for_control(node)
                .and_then(|p| self.registry.entry(p))
                .map(|e| e.control_id.clone())
            {
                self.toggled.emit((id, checked));
            }
        }
        self.activated.emit(activation.clone());
        Ok(activation)
    }

    /// Route a click on any node.
    ///
    /// Returns `Ok(None)` when the node is not a proxy.
    pub fn click(&mut self, node: NodeId) -> Result<Option<Activation>, ActivationError> {
        match self.registry.proxy_for_node(node) {
            Some(proxy) => self.activate(proxy).map(Some),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The proxy bound to the control with identifier `control_id`.
    pub fn proxy_for(&self, control_id: &str) -> Option<ProxyId> {
        let node = self.document.element_by_id(control_id)?;
        self.registry.proxy_for_control(node)
    }

    /// The proxy element of a bound proxy.
    pub fn proxy_node(&self, proxy: ProxyId) -> Option<NodeId> {
        self.registry.entry(proxy).map(|e| e.proxy)
    }

    /// The group of the control with identifier `control_id`.
    pub fn group_of(&self, control_id: &str) -> Option<GroupId> {
        let proxy = self.proxy_for(control_id)?;
        self.registry.entry(proxy).map(|e| e.group)
    }

    /// Whether a proxy currently shows its selected image.
    pub fn is_selected(&self, proxy: ProxyId) -> bool {
        self.proxy_node(proxy)
            .and_then(|node| self.document.has_class(node, &self.config.selected_class).ok())
            .unwrap_or(false)
    }

    /// Identifiers of the checked controls of a group, in document order.
    pub fn checked_ids(&self, group: GroupId) -> Vec<String> {
        self.registry
            .members(group)
            .filter(|(_, entry)| {
                self.document
                    .control(entry.control)
                    .is_ok_and(|info| info.checked)
            })
            .map(|(_, entry)| entry.control_id.clone())
            .collect()
    }

    /// Number of lit proxies in a group: the star count of a rating.
    pub fn rating(&self, group: GroupId) -> usize {
        self.registry
            .members(group)
            .filter(|&(proxy, _)| self.is_selected(proxy))
            .count()
    }
}

static_assertions::assert_impl_all!(ImageRadio<Document>: Send, Sync);
