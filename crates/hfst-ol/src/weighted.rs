// Weighted index and transition tables.
//
// Same layout as the unweighted variant except that transitions carry a
// trailing f32 weight, and finality is read from weights instead of the
// final target marker.

use crate::format::TransducerHeader;
use crate::transition::{
    RawTransitionIndex, RawWeightedTransition, TRANSITION_INDEX_SIZE, decode_records,
};
use crate::{AutomatonTables, HfstError, TableAddress, Transition, TransitionIndex};

/// Decoded tables of a weighted transducer.
#[derive(Clone)]
pub struct WeightedTables {
    indices: Vec<TransitionIndex>,
    transitions: Vec<Transition>,
}

impl std::fmt::Debug for WeightedTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedTables")
            .field("index_count", &self.indices.len())
            .field("transition_count", &self.transitions.len())
            .finish()
    }
}

impl WeightedTables {
    pub fn new(indices: Vec<TransitionIndex>, transitions: Vec<Transition>) -> Self {
        Self {
            indices,
            transitions,
        }
    }

    /// Decode both tables starting at `offset`, sized by `header`.
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

        let indices = decode_records::<RawTransitionIndex, _>(
            &data[offset..offset + index_bytes],
            index_count,
            TransitionIndex::from_raw,
        );
        let transitions = decode_records::<RawWeightedTransition, _>(
            &data[offset + index_bytes..end],
            transition_count,
            Transition::from_raw_weighted,
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

impl AutomatonTables for WeightedTables {
    const WEIGHTED: bool = true;

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
            TableAddress::Index(i) => self
                .index_at(i)
                .is_some_and(|slot| slot.is_final_weighted()),
            TableAddress::Transition(i) => self
                .transition_at(i)
                .is_some_and(|slot| slot.is_final_weighted()),
        }
    }

    fn final_weight(&self, address: TableAddress) -> f32 {
        match address {
            TableAddress::Index(i) => self.index_at(i).map_or(0.0, |slot| slot.final_weight()),
            TableAddress::Transition(i) => self.transition_at(i).map_or(0.0, |slot| slot.weight),
        }
    }
}
