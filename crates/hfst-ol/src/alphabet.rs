// Alphabet: symbol number to string mapping and flag diacritic table.

use hashbrown::HashMap;

use crate::HfstError;
use crate::flags::{FlagDiacriticOperation, FlagDiacriticParser};

/// Decoded transducer alphabet.
///
/// Symbol `k` is the `k`-th NUL-terminated string of the alphabet section.
/// Symbol 0 is epsilon and always maps to the empty string, whatever name
/// the file gives it. Flag diacritics map to the empty string as well; their
/// original names remain available through [`name`](Self::name).
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// Output strings, indexed by symbol number.
    key_table: Vec<String>,
    /// Names as stored in the file (epsilon excepted).
    names: Vec<String>,
    flag_operations: HashMap<u16, FlagDiacriticOperation>,
    flag_feature_count: u16,
}

impl Alphabet {
    /// Parse `number_of_symbols` NUL-terminated UTF-8 strings starting at
    /// `offset`.
    ///
    /// Returns the alphabet and the offset just past the last terminator.
    pub fn parse(
        data: &[u8],
        offset: usize,
        number_of_symbols: u16,
    ) -> Result<(Self, usize), HfstError> {
        let mut symbols = Vec::with_capacity(number_of_symbols as usize);
        let mut pos = offset;

        for i in 0..number_of_symbols {
            let rest = data.get(pos..).unwrap_or_default();
            let Some(len) = rest.iter().position(|&b| b == 0) else {
                return Err(HfstError::MalformedAlphabet(format!(
                    "symbol {i} is not terminated ({} bytes left)",
                    rest.len()
                )));
            };

            let symbol = std::str::from_utf8(&rest[..len]).map_err(|e| {
                let reason = if e.error_len().is_none() {
                    "ends inside a multi-byte sequence"
                } else {
                    "is not valid UTF-8"
                };
                HfstError::MalformedAlphabet(format!("symbol {i} {reason}"))
            })?;
            symbols.push(symbol);
            pos += len + 1;
        }

        Ok((Self::from_symbols(&symbols), pos))
    }

    /// Build an alphabet from symbol names, in symbol number order.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut key_table = Vec::with_capacity(symbols.len());
        let mut names = Vec::with_capacity(symbols.len());
        let mut flag_operations = HashMap::new();
        let mut parser = FlagDiacriticParser::new();

        for (i, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.as_ref();
            if i == 0 {
                key_table.push(String::new());
                names.push(String::new());
                continue;
            }

            names.push(symbol.to_string());
            match parser.parse(symbol) {
                Some(op) => {
                    flag_operations.insert(i as u16, op);
                    key_table.push(String::new());
                }
                None => key_table.push(symbol.to_string()),
            }
        }

        Self {
            key_table,
            names,
            flag_operations,
            flag_feature_count: parser.feature_count(),
        }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.key_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_table.is_empty()
    }

    /// Output string of `symbol`. Empty for epsilon, flag diacritics and
    /// unknown symbol numbers.
    pub fn key(&self, symbol: u16) -> &str {
        self.key_table
            .get(symbol as usize)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Name of `symbol` as stored in the file.
    pub fn name(&self, symbol: u16) -> &str {
        self.names
            .get(symbol as usize)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Iterate over `(symbol number, name)` pairs.
    pub fn names(&self) -> impl Iterator<Item = (u16, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (i as u16, name.as_str()))
    }

    /// Flag diacritic operation of `symbol`, if it is one.
    pub fn flag_operation(&self, symbol: u16) -> Option<&FlagDiacriticOperation> {
        self.flag_operations.get(&symbol)
    }

    pub fn is_flag(&self, symbol: u16) -> bool {
        self.flag_operations.contains_key(&symbol)
    }

    /// Number of flag diacritic symbols.
    pub fn flag_count(&self) -> usize {
        self.flag_operations.len()
    }

    /// Number of distinct flag diacritic features.
    pub fn flag_feature_count(&self) -> u16 {
        self.flag_feature_count
    }
}
