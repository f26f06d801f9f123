// Flag diacritic operations: P, N, R, D, C, U
// Parsing of `@OP.FEATURE[.VALUE]@` symbols and the scoped constraint stack
// consulted during traversal.

use hashbrown::HashMap;

/// The six flag diacritic operations of the optimized-lookup format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOp {
    /// `P`: unconditionally bind the feature to the value, positively.
    PositiveSet,
    /// `N`: unconditionally bind the feature to the value, negatively.
    NegativeSet,
    /// `R`: pass only if the feature is positively bound to the value.
    Require,
    /// `D`: fail if the feature is positively bound to the value.
    Disallow,
    /// `C`: remove the feature's binding.
    Clear,
    /// `U`: bind if compatible with the current binding, fail otherwise.
    Unify,
}

impl FlagOp {
    /// Map the one-letter operation code to an operation.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(Self::PositiveSet),
            "N" => Some(Self::NegativeSet),
            "R" => Some(Self::Require),
            "D" => Some(Self::Disallow),
            "C" => Some(Self::Clear),
            "U" => Some(Self::Unify),
            _ => None,
        }
    }
}

/// Interned index of "no value" (`@R.FEATURE@` style symbols).
pub const FLAG_VALUE_NONE: u16 = 0;

/// A parsed flag diacritic.
///
/// Feature and value names are kept for display; the interned indices are
/// what [`FlagDiacriticStack`] works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDiacriticOperation {
    pub op: FlagOp,
    pub feature: String,
    pub value: Option<String>,
    feature_index: u16,
    value_index: u16,
}

impl FlagDiacriticOperation {
    pub fn feature_index(&self) -> u16 {
        self.feature_index
    }

    pub fn value_index(&self) -> u16 {
        self.value_index
    }
}

/// Recognizes flag diacritic symbols and interns their feature and value
/// names across a whole alphabet.
pub struct FlagDiacriticParser {
    features: HashMap<String, u16>,
    values: HashMap<String, u16>,
}

impl Default for FlagDiacriticParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagDiacriticParser {
    pub fn new() -> Self {
        Self {
            features: HashMap::new(),
            values: HashMap::new(),
        }
    }

    /// Number of distinct features seen so far.
    pub fn feature_count(&self) -> u16 {
        self.features.len() as u16
    }

    /// Parse `symbol` as a flag diacritic.
    ///
    /// A flag is at least three characters long, starts and ends with `@`,
    /// has `.` as its third character, and its interior splits on `.` into
    /// operation and feature, optionally followed by a value. Returns `None`
    /// for anything else, including unknown operation codes; such symbols
    /// are ordinary symbols.
    pub fn parse(&mut self, symbol: &str) -> Option<FlagDiacriticOperation> {
        let mut chars = symbol.chars();
        if chars.clone().count() < 3
            || chars.next() != Some('@')
            || chars.next_back() != Some('@')
            || symbol.chars().nth(2) != Some('.')
        {
            return None;
        }

        let inner = &symbol[1..symbol.len() - 1];
        let parts: Vec<&str> = inner.split('.').collect();
        let (code, feature, value) = match parts.as_slice() {
            [code, feature] => (*code, *feature, None),
            [code, feature, value] => (*code, *feature, Some(*value)),
            _ => return None,
        };
        let op = FlagOp::from_code(code)?;

        let feature_index = {
            let next_idx = self.features.len() as u16;
            *self.features.entry(feature.to_string()).or_insert(next_idx)
        };
        let value_index = match value {
            None => FLAG_VALUE_NONE,
            Some(v) => {
                // 0 is reserved for "no value"
                let next_idx = self.values.len() as u16 + 1;
                *self.values.entry(v.to_string()).or_insert(next_idx)
            }
        };

        Some(FlagDiacriticOperation {
            op,
            feature: feature.to_string(),
            value: value.map(str::to_string),
            feature_index,
            value_index,
        })
    }
}

/// A feature binding: interned value and polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlagBinding {
    value: u16,
    positive: bool,
}

/// Scoped flag diacritic state.
///
/// Frames are stored as flat rows of `feature_count` bindings. A successful
/// [`apply`](Self::apply) copies the top row forward and modifies the copy;
/// [`pop`](Self::pop) drops it again. The root frame (all features unbound)
/// can never be popped.
#[derive(Debug, Clone)]
pub struct FlagDiacriticStack {
    feature_count: usize,
    rows: Vec<Option<FlagBinding>>,
    depth: usize,
}

impl FlagDiacriticStack {
    /// Create a stack holding only the root frame.
    pub fn new(feature_count: u16) -> Self {
        let feature_count = feature_count as usize;
        Self {
            feature_count,
            rows: vec![None; feature_count],
            depth: 0,
        }
    }

    /// Number of frames pushed on top of the root frame.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Try `op` against the top frame.
    ///
    /// On success a new frame is pushed and `true` is returned; on failure
    /// the stack is unchanged. Value-less `R` and `D` operations test whether
    /// the feature is bound at all.
    pub fn apply(&mut self, op: &FlagDiacriticOperation) -> bool {
        let feature = op.feature_index as usize;
        debug_assert!(feature < self.feature_count);
        let current = self.top()[feature];
        let wanted = FlagBinding {
            value: op.value_index,
            positive: true,
        };

        let update = match op.op {
            FlagOp::PositiveSet => Some(Some(wanted)),
            FlagOp::NegativeSet => Some(Some(FlagBinding {
                positive: false,
                ..wanted
            })),
            FlagOp::Require => {
                let passes = if op.value_index == FLAG_VALUE_NONE {
                    current.is_some()
                } else {
                    current == Some(wanted)
                };
                if !passes {
                    return false;
                }
                None
            }
            FlagOp::Disallow => {
                let passes = if op.value_index == FLAG_VALUE_NONE {
                    current.is_none()
                } else {
                    current != Some(wanted)
                };
                if !passes {
                    return false;
                }
                None
            }
            FlagOp::Clear => Some(None),
            FlagOp::Unify => match current {
                None => Some(Some(wanted)),
                Some(binding) if binding == wanted => Some(Some(wanted)),
                Some(binding) if !binding.positive && binding.value != wanted.value => {
                    Some(Some(wanted))
                }
                Some(_) => return false,
            },
        };

        self.push_frame();
        if let Some(binding) = update {
            self.top_mut()[feature] = binding;
        }
        true
    }

    /// Drop the most recently pushed frame.
    pub fn pop(&mut self) {
        debug_assert!(self.depth > 0, "pop on the root flag frame");
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        self.rows.truncate((self.depth + 1) * self.feature_count);
    }

    fn top(&self) -> &[Option<FlagBinding>] {
        let start = self.depth * self.feature_count;
        &self.rows[start..start + self.feature_count]
    }

    fn top_mut(&mut self) -> &mut [Option<FlagBinding>] {
        let start = self.depth * self.feature_count;
        &mut self.rows[start..start + self.feature_count]
    }

    fn push_frame(&mut self) {
        let start = self.depth * self.feature_count;
        self.rows.extend_from_within(start..start + self.feature_count);
        self.depth += 1;
    }
}
