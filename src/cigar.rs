use nom::IResult;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::parser::ParseFieldError;

/// An alignment operation. `E` is the `=` sequence match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum CIGAROp {
    M,
    I,
    D,
    N,
    S,
    H,
    P,
    E,
    X,
}

const OP_SYMBOLS: [(u8, CIGAROp); 9] = [
    (b'M', CIGAROp::M),
    (b'I', CIGAROp::I),
    (b'D', CIGAROp::D),
    (b'N', CIGAROp::N),
    (b'S', CIGAROp::S),
    (b'H', CIGAROp::H),
    (b'P', CIGAROp::P),
    (b'=', CIGAROp::E),
    (b'X', CIGAROp::X),
];

impl CIGAROp {
    pub fn from_symbol(sym: u8) -> Option<Self> {
        OP_SYMBOLS
            .iter()
            .find(|(s, _)| *s == sym)
            .map(|(_, op)| *op)
    }

    pub fn symbol(self) -> u8 {
        OP_SYMBOLS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or(b'?', |(s, _)| *s)
    }

    /// The operation advances along the `to` read of a link
    #[inline]
    pub fn consumes_query(self) -> bool {
        use CIGAROp::*;
        matches!(self, M | E | X | I | S)
    }

    /// The operation advances along the `from` read of a link
    #[inline]
    pub fn consumes_reference(self) -> bool {
        use CIGAROp::*;
        matches!(self, M | E | X | D | N)
    }
}

impl std::fmt::Display for CIGAROp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(self.symbol()))
    }
}

/// Overlap alignment of a link or containment record. Only the number
/// of bases it covers on each read matters to the graph.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct CIGAR(pub Vec<(u32, CIGAROp)>);

fn parse_count(digits: &[u8]) -> Result<u32, ParseFieldError> {
    Ok(std::str::from_utf8(digits)?.parse::<u32>()?)
}

fn op_run(input: &[u8]) -> IResult<&[u8], (u32, CIGAROp)> {
    use nom::{
        bytes::complete::take,
        character::complete::digit1,
        combinator::{map_opt, map_res},
        sequence::pair,
    };

    pair(
        map_res(digit1, parse_count),
        map_opt(take(1usize), |sym: &[u8]| CIGAROp::from_symbol(sym[0])),
    )(input)
}

impl CIGAR {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, CIGAROp)>,
    {
        CIGAR(pairs.into_iter().collect())
    }

    /// Parse as many operation runs as possible from the front of
    /// `input`; fails unless there is at least one
    pub(crate) fn parse_prefix(input: &[u8]) -> IResult<&[u8], Self> {
        use nom::{combinator::map, multi::many1};
        map(many1(op_run), CIGAR)(input)
    }

    /// Parse an entire field, rejecting trailing bytes
    pub fn from_bytestring(input: &[u8]) -> Option<Self> {
        match Self::parse_prefix(input) {
            Ok((rest, cigar)) if rest.is_empty() => Some(cigar),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(n, _)| n as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, CIGAROp)> + '_ {
        self.0.iter().copied()
    }

    fn covered(&self, consumes: fn(CIGAROp) -> bool) -> usize {
        self.iter()
            .filter(|&(_, op)| consumes(op))
            .map(|(n, _)| n as usize)
            .sum()
    }

    /// Overlap length on the `from` read
    pub fn ref_len(&self) -> usize {
        self.covered(CIGAROp::consumes_reference)
    }

    /// Overlap length on the `to` read
    pub fn query_len(&self) -> usize {
        self.covered(CIGAROp::consumes_query)
    }
}

impl std::fmt::Display for CIGAR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.iter().try_for_each(|(n, op)| write!(f, "{}{}", n, op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CIGAROp::*;

    #[test]
    fn every_op_symbol() {
        let text = "3M1I2D7N4S5H6P8=9X";
        let cigar = CIGAR::from_bytestring(text.as_bytes()).unwrap();
        assert_eq!(
            CIGAR::from_pairs(vec![
                (3, M),
                (1, I),
                (2, D),
                (7, N),
                (4, S),
                (5, H),
                (6, P),
                (8, E),
                (9, X)
            ]),
            cigar
        );
        assert_eq!(text, cigar.to_string());
    }

    #[test]
    fn partial_and_bad_input() {
        let (rest, cigar) = CIGAR::parse_prefix(b"15M2I7Q").unwrap();
        assert_eq!(b"7Q", rest);
        assert_eq!(CIGAR::from_pairs(vec![(15, M), (2, I)]), cigar);
        assert_eq!(None, CIGAR::from_bytestring(b"15M2I7Q"));

        assert_eq!(None, CIGAR::from_bytestring(b"M15"));
        assert_eq!(None, CIGAR::from_bytestring(b"15"));
        assert_eq!(None, CIGAR::from_bytestring(b""));
        assert_eq!(None, CIGAR::from_bytestring(b"5000000000M"));
        assert_eq!(None, CIGAR::from_bytestring(b"*"));
    }

    #[test]
    fn overlap_lengths() {
        let cigar = CIGAR::from_bytestring(b"40M3I12M5D").unwrap();
        assert_eq!(57, cigar.ref_len());
        assert_eq!(55, cigar.query_len());
        assert_eq!(60, cigar.len());

        let empty = CIGAR::from_bytestring(b"0M").unwrap();
        assert_eq!(0, empty.ref_len());
        assert!(!empty.is_empty());
    }
}
