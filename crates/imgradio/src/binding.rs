//! Binding initializer.
//!
//! Turns native radio buttons and checkboxes into image proxies:
//!
//! 1. every control in the batch is validated (identifier, kind, group mode)
//! 2. each control and its labels are hidden, a proxy `<span>` is inserted
//!    right after it and registered in the [`GroupRegistry`]
//! 3. the member order of every touched group is refreshed from the
//!    document, so "preceding" always means document order
//!
//! Validation happens before any write, so a rejected batch leaves the
//! document as it was.

use std::collections::HashSet;

use imgradio_core::logging::targets;
use imgradio_core::{BindingError, NodeId};

use crate::config::{ImgRadioConfig, Mode};
use crate::document::{ControlInfo, Element, HostDocument, Scope};
use crate::registry::{GroupId, GroupKey, GroupRegistry, ProxyEntry, ProxyId};

/// A control that passed validation and is waiting for its proxy.
struct PendingBinding {
    node: NodeId,
    id: String,
    info: ControlInfo,
    proxy_id: String,
    key: GroupKey,
}

/// Bind a batch of controls in the given mode.
///
/// Returns the proxy handles in the order the controls were given.
#[tracing::instrument(skip_all, target = "imgradio::binding", level = "debug", fields(count = controls.len(), mode = ?mode))]
pub fn bind_controls<D: HostDocument>(
    doc: &mut D,
    registry: &mut GroupRegistry,
    config: &ImgRadioConfig,
    controls: &[NodeId],
    mode: Mode,
) -> Result<Vec<ProxyId>, BindingError> {
    let pending = validate(doc, registry, config, controls, mode)?;

    let mut proxies = Vec::with_capacity(pending.len());
    let mut touched: Vec<GroupId> = Vec::new();

    for binding in pending {
        doc.set_hidden(binding.node, true)?;
        if config.hide_labels {
            for label in doc.labels_for(&binding.id) {
                doc.set_hidden(label, true)?;
            }
        }

        let mut proxy = Element::span()
            .with_class(config.proxy_class.as_str())
            .with_id(binding.proxy_id.as_str())
            .with_attribute(config.group_attribute.as_str(), binding.key.tag.as_str());
        if binding.info.checked {
            proxy = proxy.with_class(config.selected_class.as_str());
        }
        let proxy_node = doc.insert_after(binding.node, proxy)?;

        let group = registry.ensure_group(binding.key, mode);
        if !touched.contains(&group) {
            touched.push(group);
        }
        let proxy_id = registry.insert(ProxyEntry {
            control: binding.node,
            proxy: proxy_node,
            control_id: binding.id,
            kind: binding.info.kind,
            group,
        });

        tracing::debug!(
            target: targets::BINDING,
            proxy = %binding.proxy_id,
            kind = %binding.info.kind,
            checked = binding.info.checked,
            "bound control"
        );
        proxies.push(proxy_id);
    }

    for group in touched {
        refresh_order(doc, registry, config, group);
    }

    Ok(proxies)
}

fn validate<D: HostDocument>(
    doc: &D,
    registry: &GroupRegistry,
    config: &ImgRadioConfig,
    controls: &[NodeId],
    mode: Mode,
) -> Result<Vec<PendingBinding>, BindingError> {
    let mut seen = HashSet::new();
    let mut proxy_ids = HashSet::new();
    let mut pending = Vec::with_capacity(controls.len());

    for &node in controls {
        let info = doc.control(node)?;

        let id = match info.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(refuse(BindingError::missing_identifier(node))),
        };
        if !info.kind.is_toggle() {
            return Err(refuse(BindingError::not_a_control(id)));
        }
        if doc.elements_with_attribute(Scope::Document, "id", &id).len() != 1 {
            return Err(refuse(BindingError::duplicate_identifier(id)));
        }
        if registry.proxy_for_control(node).is_some() || !seen.insert(node) {
            return Err(refuse(BindingError::AlreadyBound { id }));
        }

        let proxy_id = format!("{id}{}", config.proxy_suffix);
        if doc.element_by_id(&proxy_id).is_some() || !proxy_ids.insert(proxy_id.clone()) {
            return Err(refuse(BindingError::ProxyIdTaken { id, proxy_id }));
        }

        // A nameless control is its own group.
        let tag = info.name.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| id.clone());
        let key = GroupKey {
            scope: doc.scope_of(node),
            tag,
        };
        if let Some(group) = registry.group_id(&key).and_then(|g| registry.group(g)) {
            if group.mode() != mode {
                return Err(refuse(BindingError::ModeConflict {
                    id,
                    group: key.tag,
                }));
            }
        }

        pending.push(PendingBinding {
            node,
            id,
            info,
            proxy_id,
            key,
        });
    }

    Ok(pending)
}

fn refuse(err: BindingError) -> BindingError {
    tracing::warn!(target: targets::BINDING, error = %err, "refusing to bind controls");
    err
}

/// Re-read a group's proxies from the document to establish document order.
fn refresh_order<D: HostDocument>(
    doc: &D,
    registry: &mut GroupRegistry,
    config: &ImgRadioConfig,
    group: GroupId,
) {
    let Some(key) = registry.group(group).map(|g| g.key().clone()) else {
        return;
    };
    let order: Vec<ProxyId> = doc
        .elements_with_attribute(key.scope, &config.group_attribute, &key.tag)
        .into_iter()
        .filter_map(|node| registry.proxy_for_node(node))
        .filter(|&pid| registry.entry(pid).is_some_and(|e| e.group == group))
        .collect();

    if !registry.set_order(group, order) {
        tracing::warn!(
            target: targets::BINDING,
            group = %key.tag,
            "document query did not return every proxy of the group, keeping bind order"
        );
    }
}
