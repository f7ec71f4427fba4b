//! Group registry built at bind time.
//!
//! The registry maps each group (scope + tag) to the ordered list of proxies
//! bound into it, and each proxy to the control it stands for. Activations
//! resolve everything through it instead of re-scanning the document.

use std::collections::HashMap;

use imgradio_core::NodeId;
use slotmap::{new_key_type, SlotMap};

use crate::config::Mode;
use crate::document::{InputKind, Scope};

new_key_type! {
    /// Handle to a bound proxy, passed to
    /// [`ImageRadio::activate`](crate::ImageRadio::activate).
    pub struct ProxyId;

    /// Handle to a group of bound controls.
    pub struct GroupId;
}

/// Identity of a group: the lookup scope plus the group tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub scope: Scope,
    pub tag: String,
}

/// A bound control and its proxy.
#[derive(Debug, Clone)]
pub struct ProxyEntry {
    /// The native input.
    pub control: NodeId,
    /// The proxy element inserted after it.
    pub proxy: NodeId,
    /// The control's identifier.
    pub control_id: String,
    /// The control's kind at bind time.
    pub kind: InputKind,
    /// The group the control belongs to.
    pub group: GroupId,
}

/// A set of bound controls sharing a tag within one scope.
#[derive(Debug, Clone)]
pub struct Group {
    key: GroupKey,
    mode: Mode,
    members: Vec<ProxyId>,
}

impl Group {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn tag(&self) -> &str {
        &self.key.tag
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Members in document order.
    pub fn members(&self) -> &[ProxyId] {
        &self.members
    }
}

/// Registry of groups and proxies.
#[derive(Default)]
pub struct GroupRegistry {
    proxies: SlotMap<ProxyId, ProxyEntry>,
    groups: SlotMap<GroupId, Group>,
    by_key: HashMap<GroupKey, GroupId>,
    by_proxy_node: HashMap<NodeId, ProxyId>,
    by_control_node: HashMap<NodeId, ProxyId>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Look up a group by key.
    pub fn group_id(&self, key: &GroupKey) -> Option<GroupId> {
        self.by_key.get(key).copied()
    }

    /// Get the group for `key`, creating it with `mode` if it does not exist.
    ///
    /// The mode of an existing group is left unchanged.
    pub fn ensure_group(&mut self, key: GroupKey, mode: Mode) -> GroupId {
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = self.groups.insert(Group {
            key: key.clone(),
            mode,
            members: Vec::new(),
        });
        self.by_key.insert(key, id);
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Replace a group's member order.
    ///
    /// `order` must be a permutation of the current members; anything else is
    /// ignored so a faulty host query cannot drop or duplicate proxies.
    pub fn set_order(&mut self, id: GroupId, order: Vec<ProxyId>) -> bool {
        let Some(group) = self.groups.get_mut(id) else {
            return false;
        };
        let mut current = group.members.clone();
        let mut proposed = order.clone();
        current.sort();
        proposed.sort();
        if current != proposed {
            return false;
        }
        group.members = order;
        true
    }

    // =========================================================================
    // Proxies
    // =========================================================================

    /// Register a bound control. The proxy is appended to its group.
    pub fn insert(&mut self, entry: ProxyEntry) -> ProxyId {
        let group = entry.group;
        let control = entry.control;
        let proxy_node = entry.proxy;
        let id = self.proxies.insert(entry);
        if let Some(group) = self.groups.get_mut(group) {
            group.members.push(id);
        }
        self.by_proxy_node.insert(proxy_node, id);
        self.by_control_node.insert(control, id);
        id
    }

    pub fn entry(&self, id: ProxyId) -> Option<&ProxyEntry> {
        self.proxies.get(id)
    }

    /// The proxy whose element is `node`.
    pub fn proxy_for_node(&self, node: NodeId) -> Option<ProxyId> {
        self.by_proxy_node.get(&node).copied()
    }

    /// The proxy bound to the control element `node`.
    pub fn proxy_for_control(&self, node: NodeId) -> Option<ProxyId> {
        self.by_control_node.get(&node).copied()
    }

    /// The proxy's ordinal position within its group.
    pub fn position(&self, id: ProxyId) -> Option<usize> {
        let entry = self.proxies.get(id)?;
        self.groups
            .get(entry.group)?
            .members
            .iter()
            .position(|&member| member == id)
    }

    /// Entries of a group's members in document order.
    pub fn members(&self, id: GroupId) -> impl Iterator<Item = (ProxyId, &ProxyEntry)> {
        self.groups
            .get(id)
            .map(|g| g.members.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&pid| self.proxies.get(pid).map(|entry| (pid, entry)))
    }

    /// Number of bound proxies.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
