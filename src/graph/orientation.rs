#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use super::EdgeComp;
use crate::parser::ParseFieldError;

/// Strand of a read as written in a GFA record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Orientation {
    Forward,
    Backward,
}

impl Orientation {
    /// Parse an orientation from a single-element bytestring, where +
    /// is Forward, - is Backward
    #[inline]
    pub fn from_bytes_plus_minus<T: AsRef<[u8]>>(bs: T) -> Option<Self> {
        match bs.as_ref() {
            b"+" => Some(Orientation::Forward),
            b"-" => Some(Orientation::Backward),
            _ => None,
        }
    }

    #[inline]
    pub fn parse_error(opt: Option<Self>) -> Result<Self, ParseFieldError> {
        opt.ok_or(ParseFieldError::OrientationError)
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        matches!(self, Orientation::Backward)
    }

    /// Two reads placed on the same strand overlap as `Same`,
    /// otherwise one of them is reverse complemented.
    #[inline]
    pub fn comp_with(&self, other: Orientation) -> EdgeComp {
        if *self == other {
            EdgeComp::Same
        } else {
            EdgeComp::Reverse
        }
    }
}

impl Default for Orientation {
    #[inline]
    fn default() -> Orientation {
        Orientation::Forward
    }
}

impl std::str::FromStr for Orientation {
    type Err = &'static str;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Orientation::from_bytes_plus_minus(s.as_bytes())
            .ok_or("Could not parse orientation (was not + or -)")
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sym = match self {
            Self::Forward => '+',
            Self::Backward => '-',
        };
        write!(f, "{}", sym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plus_minus() {
        assert_eq!(Some(Orientation::Forward), Orientation::from_bytes_plus_minus(b"+"));
        assert_eq!(Some(Orientation::Backward), Orientation::from_bytes_plus_minus("-"));
        assert_eq!(None, Orientation::from_bytes_plus_minus(b">"));
        assert!("x".parse::<Orientation>().is_err());
        assert_eq!("-", Orientation::Backward.to_string());
    }

    #[test]
    fn comp_from_orientations() {
        use Orientation::*;
        assert_eq!(EdgeComp::Same, Forward.comp_with(Forward));
        assert_eq!(EdgeComp::Same, Backward.comp_with(Backward));
        assert_eq!(EdgeComp::Reverse, Forward.comp_with(Backward));
        assert_eq!(EdgeComp::Reverse, Backward.comp_with(Forward));
    }
}
