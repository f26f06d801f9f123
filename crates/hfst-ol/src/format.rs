// Optimized-lookup binary format: header parsing.

use bytemuck::{Pod, Zeroable};

use crate::HfstError;

/// Size of the optimized-lookup binary header in bytes.
pub const HEADER_SIZE: usize = 56;

/// On-disk header layout: 2 x u16, 4 x u32 counts and 9 x u32 booleans,
/// all little-endian.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawHeader {
    number_of_input_symbols: u16,
    number_of_symbols: u16,
    size_of_transition_index_table: u32,
    size_of_transition_target_table: u32,
    number_of_states: u32,
    number_of_transitions: u32,
    flags: [u32; 9],
}

const _: () = assert!(size_of::<RawHeader>() == HEADER_SIZE);

/// Parsed transducer header.
///
/// The counts size every subsequent read; the booleans describe properties
/// the compiler recorded. Only `weighted` changes how the rest of the file
/// is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransducerHeader {
    pub number_of_input_symbols: u16,
    pub number_of_symbols: u16,
    pub size_of_transition_index_table: u32,
    pub size_of_transition_target_table: u32,
    pub number_of_states: u32,
    pub number_of_transitions: u32,
    pub weighted: bool,
    pub deterministic: bool,
    pub input_deterministic: bool,
    pub minimized: bool,
    pub cyclic: bool,
    pub has_epsilon_epsilon_transitions: bool,
    pub has_input_epsilon_transitions: bool,
    pub has_input_epsilon_cycles: bool,
    pub has_unweighted_input_epsilon_cycles: bool,
}

impl TransducerHeader {
    /// Parse the 56-byte header at the start of `data`.
    ///
    /// Trailing data is ignored. Apart from the length check no validation is
    /// done: later stages trust the declared counts.
    pub fn parse(data: &[u8]) -> Result<Self, HfstError> {
        if data.len() < HEADER_SIZE {
            return Err(HfstError::MalformedHeader {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let raw: RawHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
        let flag = |i: usize| u32::from_le(raw.flags[i]) != 0;

        let header = Self {
            number_of_input_symbols: u16::from_le(raw.number_of_input_symbols),
            number_of_symbols: u16::from_le(raw.number_of_symbols),
            size_of_transition_index_table: u32::from_le(raw.size_of_transition_index_table),
            size_of_transition_target_table: u32::from_le(raw.size_of_transition_target_table),
            number_of_states: u32::from_le(raw.number_of_states),
            number_of_transitions: u32::from_le(raw.number_of_transitions),
            weighted: flag(0),
            deterministic: flag(1),
            input_deterministic: flag(2),
            minimized: flag(3),
            cyclic: flag(4),
            has_epsilon_epsilon_transitions: flag(5),
            has_input_epsilon_transitions: flag(6),
            has_input_epsilon_cycles: flag(7),
            has_unweighted_input_epsilon_cycles: flag(8),
        };

        if header.number_of_symbols < header.number_of_input_symbols {
            log::warn!(
                "header declares {} input symbols but only {} symbols",
                header.number_of_input_symbols,
                header.number_of_symbols
            );
        }
        if header.has_input_epsilon_cycles {
            log::debug!("transducer has input epsilon cycles");
        }

        Ok(header)
    }

    /// Encode the header back into its 56-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let flags = [
            self.weighted,
            self.deterministic,
            self.input_deterministic,
            self.minimized,
            self.cyclic,
            self.has_epsilon_epsilon_transitions,
            self.has_input_epsilon_transitions,
            self.has_input_epsilon_cycles,
            self.has_unweighted_input_epsilon_cycles,
        ]
        .map(|b| u32::to_le(b as u32));

        let raw = RawHeader {
            number_of_input_symbols: self.number_of_input_symbols.to_le(),
            number_of_symbols: self.number_of_symbols.to_le(),
            size_of_transition_index_table: self.size_of_transition_index_table.to_le(),
            size_of_transition_target_table: self.size_of_transition_target_table.to_le(),
            number_of_states: self.number_of_states.to_le(),
            number_of_transitions: self.number_of_transitions.to_le(),
            flags,
        };
        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    /// Byte length of one transition record for this header's variant.
    pub fn transition_record_size(&self) -> usize {
        if self.weighted {
            crate::transition::WEIGHTED_TRANSITION_SIZE
        } else {
            crate::transition::TRANSITION_SIZE
        }
    }
}
