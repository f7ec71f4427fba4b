//! Selection controller.
//!
//! Decides, for one proxy activation, which native controls and which proxies
//! change state, then writes those changes to the document.
//!
//! # Transitions
//!
//! **Uncheck** (the control was checked): the control is cleared. In rating
//! mode the whole group goes dark; otherwise only the activated proxy does.
//!
//! **Check** (the control was unchecked):
//!
//! - radio: every control and proxy of the group is cleared first, along with
//!   any other radio sharing the control's name in the same form, bound or not
//! - rating: proxies up to and including the activated one are lit, the rest
//!   stay dark; checkbox groups get the same prefix on their native controls
//! - finally the control is checked and its proxy lit
//!
//! Clicking a lit star again resets the whole rating rather than stepping it
//! down by one.
//!
//! Planning never writes to the document, so a plan is computed against one
//! consistent snapshot of the group before [`apply_plan`] touches anything.
//! Applying is all or nothing: a refused write reverts the ones before it.

use imgradio_core::logging::targets;
use imgradio_core::{ActivationError, DocumentResult, NodeId};

use crate::config::{ImgRadioConfig, Mode};
use crate::document::{HostDocument, InputKind};
use crate::registry::{GroupRegistry, ProxyId};

/// Which way an activation flipped its control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The control was checked and has been cleared.
    Uncheck,
    /// The control was unchecked and has been checked.
    Check,
}

/// The writes an activation performs, last write per node wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    controls: Vec<(NodeId, bool)>,
    proxies: Vec<(NodeId, bool)>,
}

impl SelectionPlan {
    /// Native checked-state writes, in first-touched order.
    pub fn controls(&self) -> &[(NodeId, bool)] {
        &self.controls
    }

    /// Proxy selected-state writes, in first-touched order.
    pub fn proxies(&self) -> &[(NodeId, bool)] {
        &self.proxies
    }

    fn set_control(&mut self, node: NodeId, checked: bool) {
        upsert(&mut self.controls, node, checked);
    }

    fn set_proxy(&mut self, node: NodeId, selected: bool) {
        upsert(&mut self.proxies, node, selected);
    }
}

fn upsert(writes: &mut Vec<(NodeId, bool)>, node: NodeId, value: bool) {
    match writes.iter_mut().find(|(n, _)| *n == node) {
        Some(write) => write.1 = value,
        None => writes.push((node, value)),
    }
}

/// Compute the writes for activating `proxy`.
///
/// # Panics
///
/// Panics if `proxy` has no registry entry. Handles are only issued by
/// binding, so a dangling one is a bug in the caller.
pub fn plan_activation<D: HostDocument>(
    doc: &D,
    registry: &GroupRegistry,
    proxy: ProxyId,
) -> Result<(Transition, SelectionPlan), ActivationError> {
    let Some(entry) = registry.entry(proxy) else {
        panic!("proxy {proxy:?} has no registry entry");
    };
    let mode = registry
        .group(entry.group)
        .map(|g| g.mode())
        .unwrap_or_default();
    let control = doc.control(entry.control)?;
    let mut plan = SelectionPlan::default();

    if control.checked {
        plan.set_control(entry.control, false);
        match mode {
            Mode::Rating => {
                for (_, member) in registry.members(entry.group) {
                    plan.set_proxy(member.proxy, false);
                    if control.kind == InputKind::Checkbox {
                        plan.set_control(member.control, false);
                    }
                }
            }
            Mode::Standard => plan.set_proxy(entry.proxy, false),
        }
        return Ok((Transition::Uncheck, plan));
    }

    if control.kind != InputKind::Checkbox {
        for (_, member) in registry.members(entry.group) {
            plan.set_control(member.control, false);
            plan.set_proxy(member.proxy, false);
        }
        if let Some(name) = control.name.as_deref().filter(|n| !n.is_empty()) {
            let scope = doc.scope_of(entry.control);
            for node in doc.elements_with_attribute(scope, "name", name) {
                if doc.control(node).is_ok_and(|c| c.kind == InputKind::Radio && c.checked) {
                    plan.set_control(node, false);
                }
            }
        }
    }

    if mode.is_rating() {
        let mut before = true;
        for (member_id, member) in registry.members(entry.group) {
            plan.set_proxy(member.proxy, before);
            if control.kind == InputKind::Checkbox {
                plan.set_control(member.control, before);
            }
            if member_id == proxy {
                before = false;
            }
        }
    }

    plan.set_control(entry.control, true);
    plan.set_proxy(entry.proxy, true);
    Ok((Transition::Check, plan))
}

/// Write a plan to the document.
///
/// Every node is read before the first write. If a write fails, the writes
/// already made are reverted so controls and proxies keep agreeing, and the
/// error is returned.
///
/// Returns the controls whose checked state actually changed, with their new
/// state, in plan order.
pub fn apply_plan<D: HostDocument>(
    doc: &mut D,
    config: &ImgRadioConfig,
    plan: &SelectionPlan,
) -> Result<Vec<(NodeId, bool)>, ActivationError> {
    let mut writes = Vec::with_capacity(plan.controls().len() + plan.proxies().len());
    for &(node, checked) in plan.controls() {
        if doc.control(node)?.checked != checked {
            writes.push(StateChange::Control(node, checked));
        }
    }
    for &(node, selected) in plan.proxies() {
        if doc.has_class(node, &config.selected_class)? != selected {
            writes.push(StateChange::Proxy(node, selected));
        }
    }

    for (done, write) in writes.iter().enumerate() {
        if let Err(err) = write.apply(doc, config) {
            tracing::warn!(target: targets::CONTROLLER, ?write, %err, "write refused, reverting");
            for applied in writes[..done].iter().rev() {
                if let Err(undo) = applied.invert().apply(doc, config) {
                    tracing::error!(target: targets::CONTROLLER, write = ?applied, %undo, "revert failed");
                }
            }
            return Err(err.into());
        }
        tracing::trace!(target: targets::CONTROLLER, ?write, "written");
    }

    Ok(writes
        .into_iter()
        .filter_map(|write| match write {
            StateChange::Control(node, checked) => Some((node, checked)),
            StateChange::Proxy(..) => None,
        })
        .collect())
}

/// A single state change, reversible by flipping its value.
#[derive(Debug, Clone, Copy)]
enum StateChange {
    Control(NodeId, bool),
    Proxy(NodeId, bool),
}

impl StateChange {
    fn apply<D: HostDocument>(self, doc: &mut D, config: &ImgRadioConfig) -> DocumentResult<()> {
        match self {
            Self::Control(node, checked) => doc.set_checked(node, checked),
            Self::Proxy(node, selected) => doc.set_class(node, &config.selected_class, selected),
        }
    }

    fn invert(self) -> Self {
        match self {
            Self::Control(node, checked) => Self::Control(node, !checked),
            Self::Proxy(node, selected) => Self::Proxy(node, !selected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind_controls;
    use crate::document::{ControlInfo, Document, Element, Scope};
    use imgradio_core::DocumentError;

    struct Fixture {
        doc: Document,
        registry: GroupRegistry,
        config: ImgRadioConfig,
        controls: Vec<NodeId>,
        proxies: Vec<ProxyId>,
    }

    fn fixture(kind: InputKind, count: usize, mode: Mode) -> Fixture {
        let mut doc = Document::new();
        let form = doc.append(None, Element::form()).unwrap();
        let controls: Vec<NodeId> = (0..count)
            .map(|i| {
                let el = Element::input(kind).with_id(format!("i{i}")).with_name("g");
                doc.append(Some(form), el).unwrap()
            })
            .collect();
        let mut registry = GroupRegistry::new();
        let config = ImgRadioConfig::default();
        let proxies = bind_controls(&mut doc, &mut registry, &config, &controls, mode).unwrap();
        Fixture {
            doc,
            registry,
            config,
            controls,
            proxies,
        }
    }

    impl Fixture {
        fn plan(&self, index: usize) -> (Transition, SelectionPlan) {
            plan_activation(&self.doc, &self.registry, self.proxies[index]).unwrap()
        }

        fn activate(&mut self, index: usize) -> Transition {
            let (transition, plan) = self.plan(index);
            apply_plan(&mut self.doc, &self.config, &plan).unwrap();
            transition
        }

        fn checked(&self) -> Vec<bool> {
            self.controls
                .iter()
                .map(|&c| self.doc.control(c).unwrap().checked)
                .collect()
        }

        fn selected(&self) -> Vec<bool> {
            self.proxies
                .iter()
                .map(|&p| {
                    let node = self.registry.entry(p).unwrap().proxy;
                    self.doc.has_class(node, "checked").unwrap()
                })
                .collect()
        }
    }

    #[test]
    fn test_radio_check_clears_group() {
        let mut fx = fixture(InputKind::Radio, 3, Mode::Standard);
        assert_eq!(fx.activate(0), Transition::Check);
        assert_eq!(fx.activate(2), Transition::Check);
        assert_eq!(fx.checked(), [false, false, true]);
        assert_eq!(fx.selected(), [false, false, true]);
    }

    #[test]
    fn test_radio_recheck_unchecks() {
        let mut fx = fixture(InputKind::Radio, 2, Mode::Standard);
        fx.activate(1);
        assert_eq!(fx.activate(1), Transition::Uncheck);
        assert_eq!(fx.checked(), [false, false]);
        assert_eq!(fx.selected(), [false, false]);
    }

    #[test]
    fn test_standard_uncheck_only_touches_own_proxy() {
        let mut fx = fixture(InputKind::Checkbox, 3, Mode::Standard);
        fx.activate(0);
        fx.activate(1);
        let (transition, plan) = fx.plan(0);
        assert_eq!(transition, Transition::Uncheck);
        assert_eq!(plan.controls(), [(fx.controls[0], false)]);
        let own_proxy = fx.registry.entry(fx.proxies[0]).unwrap().proxy;
        assert_eq!(plan.proxies(), [(own_proxy, false)]);
    }

    #[test]
    fn test_rating_cascade_and_reset() {
        let mut fx = fixture(InputKind::Radio, 5, Mode::Rating);
        fx.activate(2);
        assert_eq!(fx.selected(), [true, true, true, false, false]);
        assert_eq!(fx.checked(), [false, false, true, false, false]);

        fx.activate(4);
        assert_eq!(fx.selected(), [true, true, true, true, true]);
        fx.activate(1);
        assert_eq!(fx.selected(), [true, true, false, false, false]);

        assert_eq!(fx.activate(1), Transition::Uncheck);
        assert_eq!(fx.selected(), [false; 5]);
        assert_eq!(fx.checked(), [false; 5]);
    }

    #[test]
    fn test_rating_checkbox_prefix() {
        let mut fx = fixture(InputKind::Checkbox, 4, Mode::Rating);
        fx.activate(3);
        assert_eq!(fx.checked(), [true; 4]);

        // Every box is checked now, so any activation is a reset.
        fx.activate(0);
        assert_eq!(fx.checked(), [false; 4]);
        assert_eq!(fx.selected(), [false; 4]);

        fx.activate(1);
        assert_eq!(fx.checked(), [true, true, false, false]);
        assert_eq!(fx.selected(), [true, true, false, false]);
    }

    #[test]
    fn test_plan_has_one_write_per_node() {
        let fx = fixture(InputKind::Radio, 3, Mode::Rating);
        let (_, plan) = fx.plan(1);
        assert_eq!(plan.controls().len(), 3);
        assert_eq!(plan.proxies().len(), 3);
    }

    #[test]
    fn test_apply_reports_changed_controls() {
        let mut fx = fixture(InputKind::Radio, 3, Mode::Standard);
        fx.activate(0);
        let (_, plan) = fx.plan(2);
        let changed = apply_plan(&mut fx.doc, &fx.config, &plan).unwrap();
        assert_eq!(changed, [(fx.controls[0], false), (fx.controls[2], true)]);
    }

    #[test]
    #[should_panic(expected = "has no registry entry")]
    fn test_dangling_proxy_panics() {
        let fx = fixture(InputKind::Radio, 1, Mode::Standard);
        let other = fixture(InputKind::Radio, 2, Mode::Standard);
        let _ = plan_activation(&fx.doc, &fx.registry, other.proxies[1]);
    }

    #[test]
    fn test_radio_check_clears_unbound_same_name_radio() {
        let mut doc = Document::new();
        let form = doc.append(None, Element::form()).unwrap();
        let a = doc.append(Some(form), Element::radio("a", "g")).unwrap();
        let b = doc.append(Some(form), Element::radio("b", "g")).unwrap();
        let loose = doc
            .append(Some(form), Element::radio("c", "g").with_checked(true))
            .unwrap();
        let mut registry = GroupRegistry::new();
        let config = ImgRadioConfig::default();
        let proxies =
            bind_controls(&mut doc, &mut registry, &config, &[a, b], Mode::Standard).unwrap();

        let (_, plan) = plan_activation(&doc, &registry, proxies[0]).unwrap();
        assert!(plan.controls().contains(&(loose, false)));
        apply_plan(&mut doc, &config, &plan).unwrap();

        assert!(doc.control(a).unwrap().checked);
        assert!(!doc.control(b).unwrap().checked);
        assert!(!doc.control(loose).unwrap().checked);
    }

    /// Delegates to a [`Document`] but refuses every class change.
    struct ReadOnlyClasses(Document);

    impl HostDocument for ReadOnlyClasses {
        fn element_by_id(&self, id: &str) -> Option<NodeId> {
            self.0.element_by_id(id)
        }

        fn enclosing_form(&self, node: NodeId) -> Option<NodeId> {
            self.0.enclosing_form(node)
        }

        fn elements_with_attribute(&self, scope: Scope, name: &str, value: &str) -> Vec<NodeId> {
            self.0.elements_with_attribute(scope, name, value)
        }

        fn elements_with_class(&self, scope: Scope, class: &str) -> Vec<NodeId> {
            self.0.elements_with_class(scope, class)
        }

        fn labels_for(&self, id: &str) -> Vec<NodeId> {
            self.0.labels_for(id)
        }

        fn control(&self, node: NodeId) -> DocumentResult<ControlInfo> {
            self.0.control(node)
        }

        fn set_checked(&mut self, node: NodeId, checked: bool) -> DocumentResult<()> {
            self.0.set_checked(node, checked)
        }

        fn set_hidden(&mut self, node: NodeId, hidden: bool) -> DocumentResult<()> {
            self.0.set_hidden(node, hidden)
        }

        fn insert_after(&mut self, anchor: NodeId, element: Element) -> DocumentResult<NodeId> {
            self.0.insert_after(anchor, element)
        }

        fn has_class(&self, node: NodeId, class: &str) -> DocumentResult<bool> {
            self.0.has_class(node, class)
        }

        fn set_class(&mut self, node: NodeId, _class: &str, _present: bool) -> DocumentResult<()> {
            Err(DocumentError::InvalidNode(node))
        }
    }

    #[test]
    fn test_refused_write_reverts_applied_writes() {
        let mut fx = fixture(InputKind::Radio, 3, Mode::Standard);
        fx.activate(0);
        let (_, plan) = fx.plan(2);

        let mut doc = ReadOnlyClasses(fx.doc);
        let result = apply_plan(&mut doc, &fx.config, &plan);
        assert!(matches!(
            result,
            Err(ActivationError::Document(DocumentError::InvalidNode(_)))
        ));

        fx.doc = doc.0;
        assert_eq!(fx.checked(), [true, false, false]);
        assert_eq!(fx.selected(), [true, false, false]);
    }

    #[test]
    fn test_apply_skips_proxies_already_in_state() {
        let mut fx = fixture(InputKind::Radio, 3, Mode::Standard);
        fx.activate(1);
        let mut doc = ReadOnlyClasses(fx.doc);

        // Only control and proxy writes that change something are attempted.
        let plan = SelectionPlan {
            controls: vec![(fx.controls[1], true)],
            proxies: vec![(fx.registry.entry(fx.proxies[0]).unwrap().proxy, false)],
        };
        assert!(apply_plan(&mut doc, &fx.config, &plan).unwrap().is_empty());
    }
}
