use crate::error::{Error, Result};
use crate::registry::TypeRegistry;

/// word characters for tokens and identifiers: `[_A-Za-z0-9]`
pub(crate) fn is_word_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// raw lexical scan: maximal runs of word characters, or exactly one of
/// `(` `)` `*` `,`. everything else is a separator and is discarded.
fn scan(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in input.chars() {
        if is_word_char(c) {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if matches!(c, '(' | ')' | '*' | ',') {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// rewindable token stream over one declaration.
///
/// adjacent tokens that are all registered keywords are merged into a
/// single space-joined token, so `unsigned long long` reaches the parser
/// as one base-type word. the cursor starts one position before the first
/// token; the grammar needs at most one token of push-back at any decision
/// point.
#[derive(Debug)]
pub struct Tokenizer {
    source: String,
    tokens: Vec<String>,
    /// index of the token last returned by `next`; -1 before the first
    cursor: isize,
}

impl Tokenizer {
    pub fn new(input: &str, registry: &TypeRegistry) -> Self {
        let mut tokens = Vec::new();
        let mut run: Vec<String> = Vec::new();
        for token in scan(input) {
            if registry.is_keyword(&token) {
                run.push(token);
            } else {
                if !run.is_empty() {
                    tokens.push(run.join(" "));
                    run.clear();
                }
                tokens.push(token);
            }
        }
        if !run.is_empty() {
            tokens.push(run.join(" "));
        }

        Self {
            source: input.to_string(),
            tokens,
            cursor: -1,
        }
    }

    /// advance the cursor and return the token there
    pub fn next(&mut self) -> Result<&str> {
        if self.is_exhausted() {
            return Err(Error::Exhausted(self.source.clone()));
        }
        self.cursor += 1;
        Ok(self.current())
    }

    /// token at the cursor without moving it. panics if called before the
    /// first `next`
    pub fn current(&self) -> &str {
        &self.tokens[self.cursor as usize]
    }

    /// move the cursor back one token
    pub fn push_back(&mut self) -> Result<()> {
        if self.cursor < 0 {
            return Err(Error::Rewind(self.source.clone()));
        }
        self.cursor -= 1;
        Ok(())
    }

    /// true when the cursor sits at the last token (or the stream is empty)
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len() as isize - 1
    }

    /// the declaration string this stream was built from
    pub fn source(&self) -> &str {
        &self.source
    }
}
