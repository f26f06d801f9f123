// Unweighted index and transition tables.

use crate::format::TransducerHeader;
use crate::transition::{RawTransition, RawTransitionIndex, TRANSITION_INDEX_SIZE, decode_records};
use crate::{AutomatonTables, HfstError, TableAddress, Transition, TransitionIndex};

/// Decoded tables of an unweighted transducer.
///
/// Both tables are copied into owned vectors; the source bytes carry no
/// alignment guarantee.
#[derive(Clone)]
pub struct UnweightedTables {
    indices: Vec<TransitionIndex>,
    transitions: Vec<Transition>,
}

impl std::fmt::Debug for UnweightedTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnweightedTables")
            .field("index_count", &self.indices.len())
            .field("transition_count", &self.transitions.len())
            .finish()
    }
}

impl UnweightedTables {
    pub fn new(indices: Vec<TransitionIndex>, transitions: Vec<Transition>) -> Self {
        Self {
            indices,
            transitions,
        }
    }

    /// Decode both tables starting at `offset`, sized by `header`.
    ///
    /// Returns the tables and the offset just past the transition table.
    pub fn parse(
        data: &[u8],
        offset: usize,
        header: &TransducerHeader,
    ) -> Result<(Self, usize), HfstError> {
        let index_count = header.size_of_transition_index_table as usize;
        let transition_count = header.size_of_transition_target_table as usize;
        let index_bytes = index_count * TRANSITION_INDEX_SIZE;
        let end = offset + index_bytes + transition_count * header.transition_record_size();

        if data.len() < end {
            return Err(HfstError::TruncatedTable {
                expected: end,
                actual: data.len(),
            });
        }

        let index_data = &data[offset..offset + index_bytes];
        let transition_data = &data[offset + index_bytes..end];
        let indices = decode_records::<RawTransitionIndex, _>(
            index_data,
            index_count,
            TransitionIndex::from_raw,
        );
        let transitions = decode_records::<RawTransition, _>(
            transition_data,
            transition_count,
            Transition::from_raw,
        );

        Ok((Self::new(indices, transitions), end))
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

impl AutomatonTables for UnweightedTables {
    const WEIGHTED: bool = false;

    #[inline]
    fn index_at(&self, i: u32) -> Option<TransitionIndex> {
        self.indices.get(i as usize).copied()
    }

    #[inline]
    fn transition_at(&self, i: u32) -> Option<Transition> {
        self.transitions.get(i as usize).copied()
    }

    fn is_final(&self, address: TableAddress) -> bool {
        match address {
            TableAddress::Index(i) => self.index_at(i).is_some_and(|slot| slot.is_final()),
            TableAddress::Transition(i) => {
                self.transition_at(i).is_some_and(|slot| slot.is_final())
            }
        }
    }
}
