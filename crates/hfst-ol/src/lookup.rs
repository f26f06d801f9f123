// Recursive traversal: epsilon closure, flag diacritics, symbol matching.
//
// One `Traversal` per lookup call. It borrows the immutable tables and
// alphabet and owns everything that changes while walking: the output
// buffer, the weight accumulator, the flag stack and the input cursor.

use crate::alphabet::Alphabet;
use crate::config::LookupConfig;
use crate::flags::FlagDiacriticStack;
use crate::{
    AutomatonTables, EPSILON_SYMBOL, HfstError, NO_SYMBOL_NUMBER, TRANSITION_TARGET_TABLE_START,
    TableAddress, Transition,
};

/// One accepted output of a lookup.
///
/// `weight` is the path weight plus the final weight for weighted
/// transducers and `None` for unweighted ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    pub output: String,
    pub weight: Option<f32>,
}

/// Why a traversal stopped before exploring every path.
enum Halt {
    DepthExceeded,
    AnalysisLimit,
}

type Step = Result<(), Halt>;

/// Run a lookup of `input` (symbol numbers terminated by
/// [`NO_SYMBOL_NUMBER`]) from the start state.
///
/// Analyses are returned in discovery order, without deduplication.
pub fn lookup<T: AutomatonTables>(
    tables: &T,
    alphabet: &Alphabet,
    input: &[u16],
    config: &LookupConfig,
) -> Result<Vec<Analysis>, HfstError> {
    if config.max_analyses == Some(0) {
        return Ok(Vec::new());
    }

    let mut traversal = Traversal::new(tables, alphabet, input, config);
    match traversal.visit(TableAddress::Index(0)) {
        Ok(()) => {}
        Err(Halt::AnalysisLimit) => {
            log::debug!("stopped after {} analyses", traversal.results.len());
        }
        Err(Halt::DepthExceeded) => {
            return Err(HfstError::CycleLimitExceeded {
                limit: config.max_depth,
            });
        }
    }
    Ok(traversal.results)
}

struct Traversal<'a, T: AutomatonTables> {
    tables: &'a T,
    alphabet: &'a Alphabet,
    config: &'a LookupConfig,
    input: &'a [u16],
    input_pos: usize,
    output: Vec<u16>,
    weight: f32,
    flags: FlagDiacriticStack,
    depth: usize,
    results: Vec<Analysis>,
}

impl<'a, T: AutomatonTables> Traversal<'a, T> {
    fn new(
        tables: &'a T,
        alphabet: &'a Alphabet,
        input: &'a [u16],
        config: &'a LookupConfig,
    ) -> Self {
        Self {
            tables,
            alphabet,
            config,
            input,
            input_pos: 0,
            output: Vec::with_capacity(input.len() * 2),
            weight: 0.0,
            flags: FlagDiacriticStack::new(alphabet.flag_feature_count()),
            depth: 0,
            results: Vec::new(),
        }
    }

    #[inline]
    fn next_input(&self) -> u16 {
        self.input
            .get(self.input_pos)
            .copied()
            .unwrap_or(NO_SYMBOL_NUMBER)
    }

    /// Explore every path from the state at `address`.
    fn visit(&mut self, address: TableAddress) -> Step {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(Halt::DepthExceeded);
        }
        let result = self.visit_state(address);
        self.depth -= 1;
        result
    }

    fn visit_state(&mut self, address: TableAddress) -> Step {
        self.epsilon_closure(address)?;

        let symbol = self.next_input();
        if symbol == NO_SYMBOL_NUMBER {
            if self.tables.is_final(address) {
                self.note_analysis(self.tables.final_weight(address))?;
            }
            return Ok(());
        }

        self.input_pos += 1;
        let result = match address {
            TableAddress::Index(i) => self.find_index(i, symbol),
            TableAddress::Transition(i) => self.find_transitions(i, symbol),
        };
        self.input_pos -= 1;
        result
    }

    /// Follow epsilon and flag diacritic transitions of the state at
    /// `address`. They come first in a state's transition block.
    fn epsilon_closure(&mut self, address: TableAddress) -> Step {
        let mut i = match address {
            TableAddress::Index(i) => match self.tables.index_at(i + 1) {
                Some(slot)
                    if slot.input == EPSILON_SYMBOL
                        && slot.target >= TRANSITION_TARGET_TABLE_START =>
                {
                    slot.target - TRANSITION_TARGET_TABLE_START
                }
                _ => return Ok(()),
            },
            TableAddress::Transition(i) => i + 1,
        };

        let alphabet = self.alphabet;
        while let Some(transition) = self.tables.transition_at(i) {
            let epsilon = transition.input == EPSILON_SYMBOL;
            let flag_symbol = if epsilon {
                transition.output
            } else {
                transition.input
            };

            match alphabet.flag_operation(flag_symbol) {
                Some(op) => {
                    if !self.flags.apply(op) {
                        log::trace!("{} blocks path", alphabet.name(flag_symbol));
                    } else {
                        let result = self.traverse(transition);
                        self.flags.pop();
                        result?;
                    }
                }
                None if epsilon => self.traverse(transition)?,
                None => break,
            }
            i += 1;
        }
        Ok(())
    }

    /// Consume `symbol` from the index-table state at `state`.
    fn find_index(&mut self, state: u32, symbol: u16) -> Step {
        let Some(slot) = self.tables.index_at(state + 1 + symbol as u32) else {
            return Ok(());
        };
        if slot.input != symbol || slot.target < TRANSITION_TARGET_TABLE_START {
            return Ok(());
        }
        self.traverse_matching(slot.target - TRANSITION_TARGET_TABLE_START, symbol)
    }

    /// Consume `symbol` from the transition-table state at `state`.
    ///
    /// The state's block is sorted: epsilon and flag transitions first, then
    /// ascending input symbols.
    fn find_transitions(&mut self, state: u32, symbol: u16) -> Step {
        let mut i = state + 1;
        while let Some(transition) = self.tables.transition_at(i) {
            let input = transition.input;
            let skip = input != NO_SYMBOL_NUMBER
                && (input == EPSILON_SYMBOL || self.alphabet.is_flag(input) || input < symbol);
            if !skip {
                break;
            }
            i += 1;
        }
        self.traverse_matching(i, symbol)
    }

    fn traverse_matching(&mut self, start: u32, symbol: u16) -> Step {
        let mut i = start;
        while let Some(transition) = self.tables.transition_at(i) {
            if transition.input != symbol {
                break;
            }
            self.traverse(transition)?;
            i += 1;
        }
        Ok(())
    }

    /// Take `transition`: emit its output, add its weight, explore the
    /// target, then undo both.
    fn traverse(&mut self, transition: Transition) -> Step {
        self.output.push(transition.output);
        let saved_weight = self.weight;
        self.weight += transition.weight;

        let result = self.visit(transition.target_address());

        self.weight = saved_weight;
        self.output.pop();
        result
    }

    fn note_analysis(&mut self, final_weight: f32) -> Step {
        let output: String = self
            .output
            .iter()
            .map(|&symbol| self.alphabet.key(symbol))
            .collect();
        let weight = T::WEIGHTED.then_some(self.weight + final_weight);
        log::trace!("analysis {output:?} weight {weight:?}");
        self.results.push(Analysis { output, weight });

        if self
            .config
            .max_analyses
            .is_some_and(|max| self.results.len() >= max)
        {
            return Err(Halt::AnalysisLimit);
        }
        Ok(())
    }
}
