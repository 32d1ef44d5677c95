//! fOS DOM - Document Object Model
//!
//! Element handles and class token lists for embedded widgets.

mod classlist;
mod element;

pub use classlist::ClassList;
pub use element::Element;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> u64 {
        u64::from(id.0)
    }
}
