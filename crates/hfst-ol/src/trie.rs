// Letter trie: longest-match tokenization of input text into symbols.

use hashbrown::HashMap;

use crate::alphabet::Alphabet;

/// One trie node.
///
/// `children` continues multi-character symbols; `symbols` resolves a symbol
/// whose last character is consumed at this node.
#[derive(Debug, Default, Clone)]
struct LetterTrieNode {
    symbols: HashMap<char, u16>,
    children: HashMap<char, LetterTrieNode>,
}

impl LetterTrieNode {
    fn insert(&mut self, rest: &[char], symbol: u16) {
        match rest {
            [] => {}
            [last] => {
                self.symbols.insert(*last, symbol);
            }
            [first, tail @ ..] => self
                .children
                .entry(*first)
                .or_default()
                .insert(tail, symbol),
        }
    }

    fn find(&self, input: &[char], position: usize) -> Option<(u16, usize)> {
        let ch = *input.get(position)?;
        let leaf = || self.symbols.get(&ch).map(|&symbol| (symbol, 1));
        match self.children.get(&ch) {
            Some(child) => child
                .find(input, position + 1)
                .map(|(symbol, consumed)| (symbol, consumed + 1))
                .or_else(leaf),
            None => leaf(),
        }
    }
}

/// Tokenizer mapping runs of input characters to symbol numbers.
///
/// Built once from the alphabet's original symbol names, so multi-character
/// symbols and flag diacritic names are both recognized. Matching is greedy:
/// the longest symbol starting at a position wins.
#[derive(Debug, Default, Clone)]
pub struct LetterTrie {
    root: LetterTrieNode,
}

impl LetterTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie holding every named symbol of `alphabet`.
    pub fn from_alphabet(alphabet: &Alphabet) -> Self {
        let mut trie = Self::new();
        for (symbol, name) in alphabet.names() {
            trie.insert(name, symbol);
        }
        trie
    }

    /// Insert `string` so that it resolves to `symbol`. Empty strings are
    /// ignored; a later insertion of the same string wins.
    pub fn insert(&mut self, string: &str, symbol: u16) {
        let chars: Vec<char> = string.chars().collect();
        self.root.insert(&chars, symbol);
    }

    /// Longest symbol starting at `position`.
    ///
    /// Returns the symbol number and the number of characters it spans, or
    /// `None` if no symbol starts there.
    pub fn match_longest(&self, input: &[char], position: usize) -> Option<(u16, usize)> {
        self.root.find(input, position)
    }

    /// Split `input` into symbols, left to right. `None` if some position
    /// starts no symbol.
    pub fn tokenize(&self, input: &[char]) -> Option<Vec<u16>> {
        let mut symbols = Vec::with_capacity(input.len() + 1);
        let mut position = 0;
        while position < input.len() {
            let (symbol, consumed) = self.match_longest(input, position)?;
            symbols.push(symbol);
            position += consumed;
        }
        Some(symbols)
    }
}
