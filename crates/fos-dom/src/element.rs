//! Element Handles
//!
//! Minimal element handle carrying identity and classes.

use crate::{ClassList, NodeId};

/// Element handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: NodeId,
    tag_name: String,
    pub class_list: ClassList,
}

impl Element {
    /// Create an element with the given tag name
    pub fn new(id: NodeId, tag_name: &str) -> Self {
        Self {
            id,
            tag_name: tag_name.to_ascii_lowercase(),
            class_list: ClassList::new(),
        }
    }
    
    /// Document root element (`<html>`)
    pub fn document_root() -> Self {
        Self::new(NodeId::ROOT, "html")
    }
    
    pub fn id(&self) -> NodeId {
        self.id
    }
    
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_element_identity() {
        let el = Element::new(NodeId(3), "DIV");
        assert_eq!(el.id(), NodeId(3));
        assert_eq!(el.tag_name(), "div");
        assert!(el.class_list.is_empty());
        
        let root = Element::document_root();
        assert_eq!(root.id(), NodeId::ROOT);
        assert_eq!(root.tag_name(), "html");
    }
}
