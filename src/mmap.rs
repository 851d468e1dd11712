use crate::{
    graph::StringGraph,
    parser::{GFAParser, GFAParsingConfig},
};

use anyhow::{bail, Context, Result};

use memmap::Mmap;

use std::fs::File;
use std::path::Path;

use bstr::ByteSlice;

/// A GFA file mapped into memory
pub struct MmapGFA {
    mmap: Mmap,
}

/// Number of records of each graph-relevant line type in a file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub segments: usize,
    pub links: usize,
    pub containments: usize,
}

impl MmapGFA {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        if file.metadata()?.len() == 0 {
            bail!("GFA file {} is empty", path.display());
        }
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }

    pub fn get_ref(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Iterate the non-empty lines of the file, without their line
    /// terminators
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        ByteSlice::lines(self.get_ref()).filter(|line| !line.is_empty())
    }

    pub fn line_counts(&self) -> LineCounts {
        let mut counts = LineCounts::default();
        for line in self.lines() {
            match line.first() {
                Some(b'S') => counts.segments += 1,
                Some(b'L') => counts.links += 1,
                Some(b'C') => counts.containments += 1,
                _ => (),
            }
        }
        counts
    }

    pub fn build_graph(&self, parser: &GFAParser) -> Result<StringGraph> {
        let graph = parser.parse_lines(self.lines())?;
        Ok(graph)
    }
}

/// Map `path` and load it as a string graph with the default parser
/// tolerance.
pub fn load_graph<P: AsRef<Path>>(
    path: P,
    config: GFAParsingConfig,
) -> Result<StringGraph> {
    let path = path.as_ref();
    let gfa = MmapGFA::open(path)?;
    let counts = gfa.line_counts();
    log::info!(
        "{}: {} segments, {} links, {} containments",
        path.display(),
        counts.segments,
        counts.links,
        counts.containments
    );

    gfa.build_graph(&GFAParser::with_config(config))
        .with_context(|| format!("Failed to load {}", path.display()))
}
