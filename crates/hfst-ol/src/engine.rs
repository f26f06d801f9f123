// Engine: loads a transducer file and answers lookups.

use std::io::Read;
use std::path::Path;

use crate::alphabet::Alphabet;
use crate::config::LookupConfig;
use crate::format::{HEADER_SIZE, TransducerHeader};
use crate::lookup::{self, Analysis};
use crate::trie::LetterTrie;
use crate::unweighted::UnweightedTables;
use crate::weighted::WeightedTables;
use crate::{HfstError, NO_SYMBOL_NUMBER};

enum Tables {
    Unweighted(UnweightedTables),
    Weighted(WeightedTables),
}

/// A loaded transducer.
///
/// Immutable after loading. Every lookup keeps its traversal state to
/// itself, so one engine can be shared between threads.
pub struct Engine {
    header: TransducerHeader,
    alphabet: Alphabet,
    trie: LetterTrie,
    tables: Tables,
    config: LookupConfig,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (index_count, transition_count) = match &self.tables {
            Tables::Unweighted(t) => (t.index_count(), t.transition_count()),
            Tables::Weighted(t) => (t.index_count(), t.transition_count()),
        };
        f.debug_struct("Engine")
            .field("weighted", &self.header.weighted)
            .field("symbol_count", &self.alphabet.len())
            .field("flag_count", &self.alphabet.flag_count())
            .field("index_count", &index_count)
            .field("transition_count", &transition_count)
            .finish()
    }
}

impl Engine {
    /// Decode a complete transducer image.
    ///
    /// Header, alphabet and tables are read in order, each from where the
    /// previous one ended. Bytes after the transition table are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HfstError> {
        let header = TransducerHeader::parse(data)?;
        log::debug!(
            "header read: {} symbols ({} input), {} index slots, {} transitions, weighted={}",
            header.number_of_symbols,
            header.number_of_input_symbols,
            header.size_of_transition_index_table,
            header.size_of_transition_target_table,
            header.weighted
        );

        let (alphabet, offset) = Alphabet::parse(data, HEADER_SIZE, header.number_of_symbols)?;
        log::debug!(
            "alphabet read: {} symbols, {} flag diacritics over {} features",
            alphabet.len(),
            alphabet.flag_count(),
            alphabet.flag_feature_count()
        );

        let trie = LetterTrie::from_alphabet(&alphabet);
        log::debug!("letter trie built");

        let (tables, end) = if header.weighted {
            let (tables, end) = WeightedTables::parse(data, offset, &header)?;
            (Tables::Weighted(tables), end)
        } else {
            let (tables, end) = UnweightedTables::parse(data, offset, &header)?;
            (Tables::Unweighted(tables), end)
        };
        log::debug!("tables read");

        if end < data.len() {
            log::debug!("ignoring {} trailing bytes", data.len() - end);
        }

        Ok(Self {
            header,
            alphabet,
            trie,
            tables,
            config: LookupConfig::default(),
        })
    }

    /// Read a transducer image from `reader` to the end and decode it.
    pub fn load(mut reader: impl Read) -> Result<Self, HfstError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Read and decode the transducer file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HfstError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Replace the limits used by [`lookup`](Self::lookup).
    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn header(&self) -> &TransducerHeader {
        &self.header
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn is_weighted(&self) -> bool {
        self.header.weighted
    }

    /// Split `text` into symbol numbers, terminated by
    /// [`NO_SYMBOL_NUMBER`].
    ///
    /// `None` if `text` is empty or some position starts no known symbol.
    pub fn tokenize(&self, text: &str) -> Option<Vec<u16>> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let mut symbols = self.trie.tokenize(&chars)?;
        symbols.push(NO_SYMBOL_NUMBER);
        Some(symbols)
    }

    /// All analyses of `text`.
    ///
    /// Input that does not tokenize, or that no path accepts, gives an empty
    /// result. A traversal that runs into the depth limit is logged and also
    /// gives an empty result; use [`lookup_with`](Self::lookup_with) to see
    /// the error.
    pub fn lookup(&self, text: &str) -> Vec<Analysis> {
        match self.lookup_with(text, &self.config) {
            Ok(analyses) => analyses,
            Err(e) => {
                log::warn!("lookup of {text:?} abandoned: {e}");
                Vec::new()
            }
        }
    }

    /// All analyses of `text` under explicit limits.
    pub fn lookup_with(
        &self,
        text: &str,
        config: &LookupConfig,
    ) -> Result<Vec<Analysis>, HfstError> {
        let Some(input) = self.tokenize(text) else {
            log::trace!("{text:?} does not tokenize");
            return Ok(Vec::new());
        };
        match &self.tables {
            Tables::Unweighted(tables) => lookup::lookup(tables, &self.alphabet, &input, config),
            Tables::Weighted(tables) => lookup::lookup(tables, &self.alphabet, &input, config),
        }
    }
}
