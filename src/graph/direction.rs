#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// One of the two ends of a read. Edges leaving the right end of a
/// read point in the `Sense` direction, edges leaving the left end in
/// the `Antisense` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum EdgeDir {
    Sense,
    Antisense,
}

impl EdgeDir {
    pub const BOTH: [EdgeDir; 2] = [EdgeDir::Sense, EdgeDir::Antisense];

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            EdgeDir::Sense => EdgeDir::Antisense,
            EdgeDir::Antisense => EdgeDir::Sense,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            EdgeDir::Sense => 0,
            EdgeDir::Antisense => 1,
        }
    }
}

impl std::ops::Not for EdgeDir {
    type Output = EdgeDir;

    #[inline]
    fn not(self) -> EdgeDir {
        self.flip()
    }
}

impl std::fmt::Display for EdgeDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeDir::Sense => write!(f, "sense"),
            EdgeDir::Antisense => write!(f, "antisense"),
        }
    }
}

/// Whether the two reads joined by an edge lie on the same strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum EdgeComp {
    Same,
    Reverse,
}

impl EdgeComp {
    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(self, EdgeComp::Reverse)
    }
}

impl Default for EdgeComp {
    #[inline]
    fn default() -> Self {
        EdgeComp::Same
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involution() {
        for dir in EdgeDir::BOTH.iter().copied() {
            assert_ne!(dir, !dir);
            assert_eq!(dir, !!dir);
        }
        assert_eq!(0, EdgeDir::Sense.index());
        assert_eq!(1, EdgeDir::Antisense.index());
    }
}
