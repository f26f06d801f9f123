// Index and transition table records, and the dual table addressing scheme.
//
// On-disk records are packed little-endian structs read with bytemuck; they
// are converted to the plain in-memory types below right after decoding.

use bytemuck::{Pod, Zeroable};

use crate::{
    FINAL_TARGET, INFINITE_WEIGHT, NO_SYMBOL_NUMBER, NO_TABLE_INDEX, TRANSITION_TARGET_TABLE_START,
};

/// Size of one index table record (u16 input + u32 target).
pub const TRANSITION_INDEX_SIZE: usize = 6;

/// Size of one unweighted transition record (2 x u16 + u32 target).
pub const TRANSITION_SIZE: usize = 8;

/// Size of one weighted transition record (2 x u16 + u32 target + f32 weight).
pub const WEIGHTED_TRANSITION_SIZE: usize = 12;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct RawTransitionIndex {
    input: u16,
    target: u32,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct RawTransition {
    input: u16,
    output: u16,
    target: u32,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct RawWeightedTransition {
    input: u16,
    output: u16,
    target: u32,
    weight: u32,
}

const _: () = assert!(size_of::<RawTransitionIndex>() == TRANSITION_INDEX_SIZE);
const _: () = assert!(size_of::<RawTransition>() == TRANSITION_SIZE);
const _: () = assert!(size_of::<RawWeightedTransition>() == WEIGHTED_TRANSITION_SIZE);

/// A position in one of the two tables.
///
/// Transition targets below [`TRANSITION_TARGET_TABLE_START`] point into the
/// index table; the rest point into the transition table after subtracting
/// the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAddress {
    Index(u32),
    Transition(u32),
}

impl TableAddress {
    #[inline]
    pub fn from_target(target: u32) -> Self {
        if target >= TRANSITION_TARGET_TABLE_START {
            Self::Transition(target - TRANSITION_TARGET_TABLE_START)
        } else {
            Self::Index(target)
        }
    }
}

/// One index table slot.
///
/// For an index-table state at slot `p`, slot `p` itself carries finality
/// and slot `p + 1 + s` holds the entry for input symbol `s`, whose target
/// is the first matching transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionIndex {
    pub input: u16,
    pub target: u32,
}

impl TransitionIndex {
    pub fn new(input: u16, target: u32) -> Self {
        Self { input, target }
    }

    /// An unused slot.
    pub fn empty() -> Self {
        Self::new(NO_SYMBOL_NUMBER, NO_TABLE_INDEX)
    }

    /// Unweighted finality: state slot marked with the final target.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.input == NO_SYMBOL_NUMBER && self.target == FINAL_TARGET
    }

    /// The target's bits read as a final weight.
    #[inline]
    pub fn final_weight(&self) -> f32 {
        f32::from_bits(self.target)
    }

    /// Weighted finality: state slot whose weight is finite.
    #[inline]
    pub fn is_final_weighted(&self) -> bool {
        self.input == NO_SYMBOL_NUMBER
            && self.target != NO_TABLE_INDEX
            && self.final_weight() != INFINITE_WEIGHT
    }

    pub(crate) fn from_raw(raw: RawTransitionIndex) -> Self {
        Self::new(u16::from_le(raw.input), u32::from_le(raw.target))
    }

    /// Encode into the 6-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; TRANSITION_INDEX_SIZE] {
        let raw = RawTransitionIndex {
            input: self.input.to_le(),
            target: self.target.to_le(),
        };
        let mut out = [0u8; TRANSITION_INDEX_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }
}

/// One transition table slot. `weight` is 0.0 in unweighted transducers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub input: u16,
    pub output: u16,
    pub target: u32,
    pub weight: f32,
}

impl Transition {
    pub fn new(input: u16, output: u16, target: u32) -> Self {
        Self::weighted(input, output, target, 0.0)
    }

    pub fn weighted(input: u16, output: u16, target: u32, weight: f32) -> Self {
        Self {
            input,
            output,
            target,
            weight,
        }
    }

    /// State header slot of a transition-table state.
    pub fn state(is_final: bool) -> Self {
        let target = if is_final { FINAL_TARGET } else { NO_TABLE_INDEX };
        Self::new(NO_SYMBOL_NUMBER, NO_SYMBOL_NUMBER, target)
    }

    /// Weighted state header slot; `None` marks a non-final state.
    pub fn weighted_state(final_weight: Option<f32>) -> Self {
        let weight = final_weight.unwrap_or(INFINITE_WEIGHT);
        Self::weighted(NO_SYMBOL_NUMBER, NO_SYMBOL_NUMBER, FINAL_TARGET, weight)
    }

    #[inline]
    fn is_state_header(&self) -> bool {
        self.input == NO_SYMBOL_NUMBER && self.output == NO_SYMBOL_NUMBER
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_state_header() && self.target == FINAL_TARGET
    }

    #[inline]
    pub fn is_final_weighted(&self) -> bool {
        self.is_state_header() && self.weight != INFINITE_WEIGHT
    }

    #[inline]
    pub fn target_address(&self) -> TableAddress {
        TableAddress::from_target(self.target)
    }

    pub(crate) fn from_raw(raw: RawTransition) -> Self {
        Self::new(
            u16::from_le(raw.input),
            u16::from_le(raw.output),
            u32::from_le(raw.target),
        )
    }

    pub(crate) fn from_raw_weighted(raw: RawWeightedTransition) -> Self {
        Self::weighted(
            u16::from_le(raw.input),
            u16::from_le(raw.output),
            u32::from_le(raw.target),
            f32::from_bits(u32::from_le(raw.weight)),
        )
    }

    /// Encode into the 8-byte unweighted on-disk form.
    pub fn to_bytes(&self) -> [u8; TRANSITION_SIZE] {
        let raw = RawTransition {
            input: self.input.to_le(),
            output: self.output.to_le(),
            target: self.target.to_le(),
        };
        let mut out = [0u8; TRANSITION_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    /// Encode into the 12-byte weighted on-disk form.
    pub fn to_weighted_bytes(&self) -> [u8; WEIGHTED_TRANSITION_SIZE] {
        let raw = RawWeightedTransition {
            input: self.input.to_le(),
            output: self.output.to_le(),
            target: self.target.to_le(),
            weight: self.weight.to_bits().to_le(),
        };
        let mut out = [0u8; WEIGHTED_TRANSITION_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }
}

/// Decode `count` fixed-size records of type `R` from the start of `data`.
///
/// The caller has already checked that `data` holds enough bytes.
pub(crate) fn decode_records<R: Pod, T>(data: &[u8], count: usize, convert: fn(R) -> T) -> Vec<T> {
    data.chunks_exact(size_of::<R>())
        .take(count)
        .map(|chunk| convert(bytemuck::pod_read_unaligned(chunk)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes() {
        assert_eq!(size_of::<RawTransitionIndex>(), 6);
        assert_eq!(size_of::<RawTransition>(), 8);
        assert_eq!(size_of::<RawWeightedTransition>(), 12);
    }

    #[test]
    fn address_split_at_table_start() {
        assert_eq!(TableAddress::from_target(0), TableAddress::Index(0));
        assert_eq!(
            TableAddress::from_target(TRANSITION_TARGET_TABLE_START - 1),
            TableAddress::Index(TRANSITION_TARGET_TABLE_START - 1)
        );
        assert_eq!(
            TableAddress::from_target(TRANSITION_TARGET_TABLE_START),
            TableAddress::Transition(0)
        );
        assert_eq!(
            TableAddress::from_target(TRANSITION_TARGET_TABLE_START + 7),
            TableAddress::Transition(7)
        );
    }

    #[test]
    fn decode_unweighted_records() {
        let raw: [u8; 16] = [
            0x01, 0x00, // input = 1
            0x02, 0x00, // output = 2
            0x03, 0x00, 0x00, 0x80, // target = 2^31 + 3
            0xFF, 0xFF, // input = NO_SYMBOL
            0xFF, 0xFF, // output = NO_SYMBOL
            0x01, 0x00, 0x00, 0x00, // target = 1 (final)
        ];
        let transitions = decode_records(&raw, 2, Transition::from_raw);
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].input, 1);
        assert_eq!(transitions[0].output, 2);
        assert_eq!(transitions[0].target_address(), TableAddress::Transition(3));
        assert_eq!(transitions[0].weight, 0.0);
        assert!(!transitions[0].is_final());
        assert!(transitions[1].is_final());
    }

    #[test]
    fn decode_weighted_record() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&4u16.to_le_bytes());
        raw.extend_from_slice(&5u16.to_le_bytes());
        raw.extend_from_slice(&9u32.to_le_bytes());
        raw.extend_from_slice(&1.5f32.to_le_bytes());
        let transitions = decode_records(&raw, 1, Transition::from_raw_weighted);
        assert_eq!(transitions[0], Transition::weighted(4, 5, 9, 1.5));
    }

    #[test]
    fn decode_index_records() {
        let raw: [u8; 12] = [
            0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00, // final state slot
            0x03, 0x00, 0x00, 0x00, 0x00, 0x80, // symbol 3 -> transition 0
        ];
        let indices = decode_records(&raw, 2, TransitionIndex::from_raw);
        assert!(indices[0].is_final());
        assert_eq!(indices[1].input, 3);
        assert_eq!(
            TableAddress::from_target(indices[1].target),
            TableAddress::Transition(0)
        );
    }

    #[test]
    fn unweighted_finality() {
        assert!(Transition::state(true).is_final());
        assert!(!Transition::state(false).is_final());
        // a real transition whose target happens to be 1 is not a final marker
        assert!(!Transition::new(3, 3, FINAL_TARGET).is_final());
        assert!(TransitionIndex::new(NO_SYMBOL_NUMBER, FINAL_TARGET).is_final());
        assert!(!TransitionIndex::empty().is_final());
        assert!(!TransitionIndex::new(2, FINAL_TARGET).is_final());
    }

    #[test]
    fn weighted_finality() {
        assert!(Transition::weighted_state(Some(0.25)).is_final_weighted());
        assert!(!Transition::weighted_state(None).is_final_weighted());

        let index = TransitionIndex::new(NO_SYMBOL_NUMBER, 2.5f32.to_bits());
        assert!(index.is_final_weighted());
        assert_eq!(index.final_weight(), 2.5);
        assert!(!TransitionIndex::empty().is_final_weighted());
        let infinite = TransitionIndex::new(NO_SYMBOL_NUMBER, INFINITE_WEIGHT.to_bits());
        assert!(!infinite.is_final_weighted());
    }

    #[test]
    fn records_reencode_to_same_bytes() {
        let raw_index: [u8; 6] = [0x07, 0x00, 0x2A, 0x00, 0x00, 0x80];
        let index = decode_records(&raw_index, 1, TransitionIndex::from_raw)[0];
        assert_eq!(index.to_bytes(), raw_index);

        let raw_transition: [u8; 8] = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x80];
        let transition = decode_records(&raw_transition, 1, Transition::from_raw)[0];
        assert_eq!(transition.to_bytes(), raw_transition);

        let weighted = Transition::weighted(1, 2, 3, -0.75);
        let bytes = weighted.to_weighted_bytes();
        assert_eq!(decode_records(&bytes, 1, Transition::from_raw_weighted)[0], weighted);
    }
}
