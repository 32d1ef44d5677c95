//! Class Token List
//!
//! Space-separated class tokens used as visual hooks on widget elements.

/// Class token list (the `classList` of an element)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create empty class list
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    
    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
    
    /// Add a token, returns true if it was not present
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }
    
    /// Remove a token, returns true if it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        before != self.tokens.len()
    }
    
    /// Force a token on or off, returns whether the list changed
    pub fn set(&mut self, token: &str, on: bool) -> bool {
        if on {
            self.add(token)
        } else {
            self.remove(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_add_dedupes() {
        let mut list = ClassList::new();
        assert!(list.add("player-is-loading"));
        assert!(!list.add("player-is-loading"));
        assert!(!list.add(""));
        assert!(list.contains("player-is-loading"));
        assert!(list.remove("player-is-loading"));
        assert!(list.is_empty());
    }
    
    #[test]
    fn test_set_reports_change() {
        let mut list = ClassList::new();
        assert!(list.set("is-playing", true));
        assert!(!list.set("is-playing", true));
        assert!(list.set("is-playing", false));
        assert!(!list.set("is-playing", false));
        assert!(list.is_empty());
    }
}
