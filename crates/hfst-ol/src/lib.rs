//! HFST optimized-lookup transducer runtime.
//!
//! This crate loads pre-compiled transducers in the HFST optimized-lookup
//! binary format and runs morphological lookups against them. Both the
//! unweighted and the weighted variant of the format are supported.
//!
//! # Architecture
//!
//! - [`format`] -- Binary header parsing
//! - [`alphabet`] -- Symbol table and flag diacritic recognition
//! - [`flags`] -- Flag diacritic operations and the constraint stack
//! - [`trie`] -- Longest-match input tokenizer
//! - [`transition`] -- Index/transition records and dual table addressing
//! - [`unweighted`] -- Unweighted table decoding
//! - [`weighted`] -- Weighted table decoding
//! - [`config`] -- Lookup limits
//! - [`lookup`] -- Recursive traversal
//! - [`engine`] -- Loading facade and lookup entry points
//!
//! # Example
//!
//! ```no_run
//! let engine = hfst_ol::Engine::open("analyser.hfstol")?;
//! for analysis in engine.lookup("talossa") {
//!     println!("{}", analysis.output);
//! }
//! # Ok::<(), hfst_ol::HfstError>(())
//! ```

pub mod alphabet;
pub mod config;
pub mod engine;
pub mod flags;
pub mod format;
pub mod lookup;
pub mod transition;
pub mod trie;
pub mod unweighted;
pub mod weighted;

pub use alphabet::Alphabet;
pub use config::LookupConfig;
pub use engine::Engine;
pub use format::TransducerHeader;
pub use lookup::Analysis;

use transition::{TableAddress, Transition, TransitionIndex};

/// Error type for transducer loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum HfstError {
    #[error("malformed header: expected {expected} bytes, got {actual}")]
    MalformedHeader { expected: usize, actual: usize },
    #[error("malformed alphabet: {0}")]
    MalformedAlphabet(String),
    #[error("truncated table data: expected {expected} bytes, got {actual}")]
    TruncatedTable { expected: usize, actual: usize },
    #[error("traversal exceeded the depth limit of {limit}")]
    CycleLimitExceeded { limit: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The epsilon symbol. Always symbol number 0 with the empty string.
pub const EPSILON_SYMBOL: u16 = 0;

/// "No symbol" marker: unused table slots, state headers and end of input.
pub const NO_SYMBOL_NUMBER: u16 = u16::MAX;

/// "No target" marker for table slots.
pub const NO_TABLE_INDEX: u32 = u32::MAX;

/// Targets at or above this value address the transition table.
pub const TRANSITION_TARGET_TABLE_START: u32 = 1 << 31;

/// Weight of a non-final state in weighted transducers.
pub const INFINITE_WEIGHT: f32 = u32::MAX as f32;

/// Target value that marks a final state in unweighted transducers.
pub const FINAL_TARGET: u32 = 1;

/// Read access to decoded index and transition tables, abstracting over the
/// weighted and unweighted variants.
///
/// Out-of-range reads return `None`; the traversal treats them as the end of
/// a transition block.
pub trait AutomatonTables {
    /// Whether transitions and final states carry weights.
    const WEIGHTED: bool;

    fn index_at(&self, i: u32) -> Option<TransitionIndex>;

    fn transition_at(&self, i: u32) -> Option<Transition>;

    /// Whether the state slot at `address` is final.
    fn is_final(&self, address: TableAddress) -> bool;

    /// Final weight of the state slot at `address`. Only meaningful when
    /// [`is_final`](Self::is_final) holds.
    fn final_weight(&self, _address: TableAddress) -> f32 {
        0.0
    }
}
