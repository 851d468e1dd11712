pub mod error;

pub use self::error::*;

use std::path::Path;

use bstr::{BString, ByteSlice};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::cigar::CIGAR;
use crate::graph::{Orientation, StringGraph};

/// Selects the GFA line types that become part of the graph. Segments
/// are always loaded; headers and paths are always ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GFAParsingConfig {
    pub links: bool,
    pub containments: bool,
}

impl GFAParsingConfig {
    pub fn none() -> Self {
        GFAParsingConfig {
            links: false,
            containments: false,
        }
    }

    pub fn all() -> Self {
        GFAParsingConfig {
            links: true,
            containments: true,
        }
    }
}

/// Searches can't run over containment edges, so they are left out
/// unless asked for.
impl Default for GFAParsingConfig {
    fn default() -> Self {
        GFAParsingConfig {
            links: true,
            containments: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Record {
    Segment {
        name: BString,
        len: usize,
    },
    Link {
        from: BString,
        from_orient: Orientation,
        to: BString,
        to_orient: Orientation,
        overlap: CIGAR,
    },
    Containment {
        container: BString,
        container_orient: Orientation,
        contained: BString,
        contained_orient: Orientation,
        pos: usize,
        overlap: CIGAR,
    },
}

/// Builds a `StringGraph` from GFA1 text. Segments become vertices,
/// links and containments become pairs of twin edges. Links may
/// precede the segments they refer to.
#[derive(Debug, Clone, Default)]
pub struct GFAParser {
    config: GFAParsingConfig,
    tolerance: ParserTolerance,
}

impl GFAParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(config: GFAParsingConfig) -> Self {
        GFAParser {
            config,
            tolerance: Default::default(),
        }
    }

    pub fn tolerance(mut self, tolerance: ParserTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn tolerate<T>(&self, result: GFAResult<T>) -> GFAResult<Option<T>> {
        match result {
            Ok(t) => Ok(Some(t)),
            Err(err) if err.can_safely_continue(&self.tolerance) => {
                log::debug!("skipping GFA record: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn parse_lines<I>(&self, lines: I) -> GFAResult<StringGraph>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut segments = Vec::new();
        let mut overlaps = Vec::new();

        for line in lines {
            match self.tolerate(self.parse_record(line.as_ref()))? {
                Some(Some(seg @ Record::Segment { .. })) => segments.push(seg),
                Some(Some(overlap)) => overlaps.push(overlap),
                _ => (),
            }
        }

        let mut graph = StringGraph::new();

        for seg in segments {
            if let Record::Segment { name, len } = seg {
                self.tolerate(graph.add_vertex(&name, len).map_err(ParseError::from))?;
            }
        }

        for overlap in overlaps {
            self.tolerate(self.insert_overlap(&mut graph, overlap))?;
        }

        log::debug!(
            "loaded string graph with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> GFAResult<StringGraph> {
        use bstr::io::BufReadExt;
        use std::{fs::File, io::BufReader};

        let file = File::open(path.as_ref())?;
        let lines = BufReader::new(file).byte_lines();
        let lines = lines.collect::<std::io::Result<Vec<_>>>()?;
        self.parse_lines(lines)
    }

    fn insert_overlap(
        &self,
        graph: &mut StringGraph,
        record: Record,
    ) -> GFAResult<()> {
        let lookup = |name: &BString| {
            graph
                .vertex_id(name)
                .ok_or_else(|| ParseError::UnknownSegment(name.to_string()))
        };

        match record {
            Record::Link {
                from,
                from_orient,
                to,
                to_orient,
                overlap,
            } => {
                let (a, b) = (lookup(&from)?, lookup(&to)?);
                let (len_a, len_b) = (overlap.ref_len(), overlap.query_len());

                // a link spanning a whole read is stored as a
                // containment edge
                let contained = len_a == graph.vertex(a).seq_len()
                    || len_b == graph.vertex(b).seq_len();
                if contained && !self.config.containments {
                    return Err(ParseError::ContainedLink(
                        from.to_string(),
                        to.to_string(),
                    ));
                }

                graph.add_link(a, from_orient, b, to_orient, len_a, len_b)?;
            }
            Record::Containment {
                container,
                container_orient,
                contained,
                contained_orient,
                pos,
                overlap,
            } => {
                let (a, b) = (lookup(&container)?, lookup(&contained)?);
                graph.add_containment(
                    a,
                    container_orient,
                    b,
                    contained_orient,
                    pos,
                    overlap.ref_len(),
                )?;
            }
            Record::Segment { .. } => (),
        }
        Ok(())
    }

    /// Parse a single line. Returns `None` for header lines and for
    /// line types the config excludes.
    fn parse_record(&self, line: &[u8]) -> GFAResult<Option<Record>> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Err(ParseError::EmptyLine);
        }

        let mut fields = line.split_str(b"\t");
        let line_type = fields.next().ok_or(ParseError::EmptyLine)?;

        let record = match line_type {
            b"H" | b"P" => return Ok(None),
            b"S" => parse_segment(fields),
            b"L" if self.config.links => parse_link(fields),
            b"C" if self.config.containments => parse_containment(fields),
            b"L" | b"C" => return Ok(None),
            _ => return Err(ParseError::UnknownLineType),
        };

        record
            .map(Some)
            .map_err(|err| ParseError::invalid_line(err, line))
    }
}

fn next_field<'a, I>(input: &mut I) -> GFAFieldResult<&'a [u8]>
where
    I: Iterator<Item = &'a [u8]>,
{
    input.next().ok_or(ParseFieldError::MissingFields)
}

fn parse_name<'a, I>(input: &mut I) -> GFAFieldResult<BString>
where
    I: Iterator<Item = &'a [u8]>,
{
    lazy_static! {
        static ref RE: Regex = Regex::new(r"(?-u)^[!-)+-<>-~][!-~]*$").unwrap();
    }
    let name = next_field(input)?;
    if RE.is_match(name) {
        Ok(BString::from(name))
    } else {
        Err(ParseFieldError::InvalidField("name"))
    }
}

fn parse_orient<'a, I>(input: &mut I) -> GFAFieldResult<Orientation>
where
    I: Iterator<Item = &'a [u8]>,
{
    let field = next_field(input)?;
    Orientation::parse_error(Orientation::from_bytes_plus_minus(field))
}

fn parse_overlap<'a, I>(input: &mut I) -> GFAFieldResult<CIGAR>
where
    I: Iterator<Item = &'a [u8]>,
{
    let field = next_field(input)?;
    CIGAR::from_bytestring(field).ok_or(ParseFieldError::InvalidField("overlap"))
}

fn parse_usize(field: &[u8]) -> GFAFieldResult<usize> {
    Ok(field.to_str()?.parse::<usize>()?)
}

fn parse_segment<'a, I>(mut input: I) -> GFAFieldResult<Record>
where
    I: Iterator<Item = &'a [u8]>,
{
    lazy_static! {
        static ref RE_SEQ: Regex = Regex::new(r"(?-u)^(\*|[A-Za-z=.]+)$").unwrap();
        static ref RE_LEN: Regex = Regex::new(r"(?-u)^LN:i:([0-9]+)$").unwrap();
    }

    let name = parse_name(&mut input)?;
    let sequence = next_field(&mut input)?;
    if !RE_SEQ.is_match(sequence) {
        return Err(ParseFieldError::InvalidField("sequence"));
    }

    let len = if sequence != b"*" {
        sequence.len()
    } else {
        let tag = input
            .filter_map(|opt| RE_LEN.captures(opt))
            .next()
            .and_then(|caps| caps.get(1))
            .ok_or(ParseFieldError::InvalidField("LN"))?;
        parse_usize(tag.as_bytes())?
    };

    Ok(Record::Segment { name, len })
}

fn parse_link<'a, I>(mut input: I) -> GFAFieldResult<Record>
where
    I: Iterator<Item = &'a [u8]>,
{
    let from = parse_name(&mut input)?;
    let from_orient = parse_orient(&mut input)?;
    let to = parse_name(&mut input)?;
    let to_orient = parse_orient(&mut input)?;
    let overlap = parse_overlap(&mut input)?;
    Ok(Record::Link {
        from,
        from_orient,
        to,
        to_orient,
        overlap,
    })
}

fn parse_containment<'a, I>(mut input: I) -> GFAFieldResult<Record>
where
    I: Iterator<Item = &'a [u8]>,
{
    let container = parse_name(&mut input)?;
    let container_orient = parse_orient(&mut input)?;
    let contained = parse_name(&mut input)?;
    let contained_orient = parse_orient(&mut input)?;
    let pos = parse_usize(next_field(&mut input)?)?;
    let overlap = parse_overlap(&mut input)?;
    Ok(Record::Containment {
        container,
        container_orient,
        contained,
        contained_orient,
        pos,
        overlap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeDir, GraphError};
    use crate::search::find_variant_walks;

    const BUBBLE: &str = "H\tVN:Z:1.0
S\ta\t*\tLN:i:100
S\tb\t*\tLN:i:100
S\tc\tACGTACGTAC
L\ta\t+\tb\t+\t60M
L\ta\t+\tc\t+\t5M
L\tb\t+\td\t+\t60M
L\tc\t+\td\t+\t5M
S\td\t*\tRC:i:3\tLN:i:100
P\tp1\ta+,b+,d+\t60M,60M
";

    fn lines(text: &str) -> Vec<&[u8]> {
        text.lines().map(|l| l.as_bytes()).collect()
    }

    #[test]
    fn parse_bubble() {
        let graph = GFAParser::new().parse_lines(lines(BUBBLE)).unwrap();
        assert_eq!(4, graph.vertex_count());
        assert_eq!(8, graph.edge_count());

        let c = graph.vertex_id("c").unwrap();
        assert_eq!(10, graph.vertex(c).seq_len());

        let a = graph.vertex_id("a").unwrap();
        let ac = graph.edges(a, EdgeDir::Sense)[1];
        assert_eq!(c, graph.edge(ac).end());
        assert_eq!(5, graph.edge(ac).extension_len());

        let walks = find_variant_walks(&graph, a, EdgeDir::Sense, 200, 4).into_walks();
        assert_eq!(2, walks.len());
    }

    #[test]
    fn containments_follow_config() {
        let text = "S\ta\t*\tLN:i:100\nS\tb\t*\tLN:i:20\nC\ta\t+\tb\t-\t30\t20M\n";

        let graph = GFAParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(0, graph.edge_count());

        let graph = GFAParser::with_config(GFAParsingConfig::all())
            .parse_lines(lines(text))
            .unwrap();
        assert_eq!(2, graph.edge_count());
        assert!(graph.has_containments());

        let graph = GFAParser::with_config(GFAParsingConfig::none())
            .parse_lines(lines(BUBBLE))
            .unwrap();
        assert_eq!(4, graph.vertex_count());
        assert_eq!(0, graph.edge_count());
    }

    #[test]
    fn tolerance_levels() {
        let text = "S\ta\t*\tLN:i:100\n\nX\tsomething\nL\ta\t+\tq\t+\t10M\n";

        let safe = GFAParser::new().parse_lines(lines(text));
        assert!(matches!(safe, Err(ParseError::UnknownSegment(ref name)) if name == "q"));

        let graph = GFAParser::new()
            .tolerance(ParserTolerance::IgnoreAll)
            .parse_lines(lines(text))
            .unwrap();
        assert_eq!(1, graph.vertex_count());
        assert_eq!(0, graph.edge_count());

        let pedantic = GFAParser::new()
            .tolerance(ParserTolerance::Pedantic)
            .parse_lines(lines(text));
        assert!(matches!(pedantic, Err(ParseError::EmptyLine)));
    }

    #[test]
    fn invalid_lines() {
        let bad_orient = "S\ta\t*\tLN:i:100\nS\tb\t*\tLN:i:100\nL\ta\t?\tb\t+\t10M\n";
        let err = GFAParser::new().parse_lines(lines(bad_orient)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidLine(ParseFieldError::OrientationError, _)
        ));

        let no_len = "S\ta\t*\n";
        let err = GFAParser::new().parse_lines(lines(no_len)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidLine(ParseFieldError::InvalidField("LN"), _)
        ));

        let short = "S\ta\n";
        let err = GFAParser::new().parse_lines(lines(short)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidLine(ParseFieldError::MissingFields, _)
        ));

        let too_long = "S\ta\t*\tLN:i:10\nS\tb\t*\tLN:i:10\nL\ta\t+\tb\t+\t11M\n";
        let err = GFAParser::new().parse_lines(lines(too_long)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Graph(GraphError::CoordOutOfBounds(_, 11, 10))
        ));
    }

    #[test]
    fn links_covering_a_read() {
        use crate::search::count_spanning_coverage;

        // b lies entirely within the overlap of the a-b link
        let text = "S\tx\t*\tLN:i:100
S\ta\t*\tLN:i:100
S\tb\t*\tLN:i:50
L\tx\t+\ta\t+\t60M
L\ta\t+\tb\t+\t50M
";

        let graph = GFAParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(2, graph.edge_count());
        assert!(!graph.has_containments());

        let x = graph.vertex_id("x").unwrap();
        let xa = graph.edges(x, EdgeDir::Sense)[0];
        assert_eq!(Some(0), count_spanning_coverage(&graph, xa, 10));

        let err = GFAParser::new()
            .tolerance(ParserTolerance::Pedantic)
            .parse_lines(lines(text))
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::ContainedLink(ref from, ref to) if from == "a" && to == "b"
        ));

        let graph = GFAParser::with_config(GFAParsingConfig::all())
            .parse_lines(lines(text))
            .unwrap();
        assert_eq!(4, graph.edge_count());
        assert!(graph.has_containments());
    }

    #[test]
    fn parse_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BUBBLE.replace('\n', "\r\n").as_bytes()).unwrap();

        let graph = GFAParser::new().parse_file(file.path()).unwrap();
        assert_eq!(4, graph.vertex_count());
        assert_eq!(8, graph.edge_count());
    }
}
