//! Bounded walk search over bidirected string graphs.
//!
//! A `StringGraph` holds sequence reads as vertices and their
//! overlaps as pairs of twin edges; it can be built directly or
//! loaded from GFA1 with `parser::GFAParser` or `mmap::load_graph`.
//! The `search` module finds walks between reads, counts the reads
//! spanning a junction, and detects bubbles that could be collapsed
//! into a single walk.

pub mod cigar;
pub mod graph;
pub mod mmap;
pub mod parser;
pub mod search;
pub mod stats;
pub mod walk;
