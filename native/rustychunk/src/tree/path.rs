//! Positional paths
//!
//! A path is the sequence of sibling ordinals from the top of the tree down
//! to a node. Lexicographic order over the ordinals is document order: an
//! ancestor sorts before all of its descendants, and earlier siblings'
//! subtrees sort before later ones.

use crate::error::ChunkError;
use std::fmt;
use std::str::FromStr;

/// Document-order address of a tree node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PosPath(Vec<u32>);

impl PosPath {
    /// The empty path (the virtual document root)
    pub fn root() -> Self {
        PosPath(Vec::new())
    }

    /// Path of this node's child at `ordinal`
    pub fn child(&self, ordinal: u32) -> Self {
        let mut ordinals = Vec::with_capacity(self.0.len() + 1);
        ordinals.extend_from_slice(&self.0);
        ordinals.push(ordinal);
        PosPath(ordinals)
    }

    /// Number of steps from the root
    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Strict ancestor test: a path is not its own ancestor
    pub fn is_ancestor_of(&self, other: &PosPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for PosPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for ordinal in &self.0 {
            write!(f, "/{}", ordinal)?;
        }
        Ok(())
    }
}

impl FromStr for PosPath {
    type Err = ChunkError;

    /// Parse the `/0/1/2` form; `/` is the root
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| ChunkError::InvalidPath(s.to_string()))?;
        if rest.is_empty() {
            return Ok(PosPath::root());
        }
        rest.split('/')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(PosPath)
            .map_err(|_| ChunkError::InvalidPath(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PosPath::root().to_string(), "/");
        assert_eq!(PosPath(vec![0, 3, 1]).to_string(), "/0/3/1");
    }

    #[test]
    fn test_parse() {
        assert_eq!("/".parse::<PosPath>(), Ok(PosPath::root()));
        assert_eq!(
            "/2/10".parse::<PosPath>(),
            Ok(PosPath(vec![2, 10]))
        );
        assert!("2/10".parse::<PosPath>().is_err());
        assert!("/a/1".parse::<PosPath>().is_err());
        assert!("/1//2".parse::<PosPath>().is_err());
    }

    #[test]
    fn test_document_order() {
        let mut paths: Vec<PosPath> = ["/1", "/0/2", "/0", "/0/10", "/0/2/0"]
            .iter()
            .map(|s| s.parse().expect("valid path"))
            .collect();
        paths.sort();
        let shown: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        // Numeric, not string, comparison: /0/2 precedes /0/10
        assert_eq!(shown, vec!["/0", "/0/2", "/0/2/0", "/0/10", "/1"]);
    }

    #[test]
    fn test_family() {
        let p = PosPath(vec![1, 2]);
        assert_eq!(p.child(0).to_string(), "/1/2/0");
        assert!(PosPath(vec![1]).is_ancestor_of(&p));
        assert!(PosPath::root().is_ancestor_of(&p));
        assert!(!p.is_ancestor_of(&p));
        assert!(!PosPath(vec![1, 20]).is_ancestor_of(&PosPath(vec![1, 2, 0])));
        assert_eq!(p.depth(), 2);
    }
}
