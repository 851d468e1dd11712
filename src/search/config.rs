#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Node budget used by `find_variant_walks` for its convergence
/// search. Independent of the caller's `max_walks`, which only
/// bounds how many alternative walks are acceptable.
pub const COLLAPSED_NODE_LIMIT: usize = 500;

/// The bounds the searches are run with. Every bound is a hard
/// ceiling: a search that would exceed one gives up entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(default))]
pub struct SearchConfig {
    /// Longest extension distance a walk may reach
    pub max_distance: usize,
    /// Largest frontier a breadth-first walk search may hold
    pub max_queue: usize,
    /// Largest number of alternative walks a bubble may consist of
    pub max_walks: usize,
    /// Node budget for direct convergence searches
    pub max_nodes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_distance: 1000,
            max_queue: 100,
            max_walks: 10,
            max_nodes: COLLAPSED_NODE_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_max_queue(mut self, max_queue: usize) -> Self {
        self.max_queue = max_queue;
        self
    }

    pub fn with_max_walks(mut self, max_walks: usize) -> Self {
        self.max_walks = max_walks;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Save the config to a JSON file.
    #[cfg(feature = "serde1")]
    pub fn save_json<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::io::Result<()> {
        use std::{fs::File, io::BufWriter};
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a config from a JSON file. Missing fields take their
    /// default values.
    #[cfg(feature = "serde1")]
    pub fn load_json<P: AsRef<std::path::Path>>(
        path: P,
    ) -> std::io::Result<Self> {
        use std::{fs::File, io::BufReader};
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
