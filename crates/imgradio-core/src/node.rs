//! Node identifiers for host document elements.

use slotmap::new_key_type;

new_key_type! {
    /// A stable handle to an element in a host document.
    ///
    /// `NodeId`s stay valid while the element exists in the document that
    /// issued them. The binding layer keeps them as plain non-owning
    /// references: a proxy entry never owns the control it points at.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the NodeId to a raw u64 value.
    ///
    /// The raw value can be converted back using [`NodeId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a NodeId from a raw u64 value.
    ///
    /// This does not check that the node exists in any document.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}
