//! Token vocabulary: a bidirectional mapping between token strings and
//! dense integer ids.
//!
//! The vocabulary file is a JSON array of strings; a token's id is its
//! position in the array. Loading is lenient about the reserved tokens
//! (`<start>`, `<end>`, `<unk>`) — their absence only surfaces when a
//! lookup first needs them.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CaptionError, Result};

/// Token that opens every decoded sequence.
pub const START_TOKEN: &str = "<start>";

/// Token that terminates a decoded sequence.
pub const END_TOKEN: &str = "<end>";

/// Fallback token for unknown strings and out-of-range ids.
pub const UNK_TOKEN: &str = "<unk>";

/// A loaded vocabulary, immutable after construction.
#[derive(Debug)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Load a vocabulary from a JSON file containing an ordered array of
    /// token strings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CaptionError::Vocab(format!(
                "Failed to open vocabulary file {}: {}",
                path.display(),
                e
            ))
        })?;
        let tokens: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            CaptionError::Vocab(format!(
                "Failed to parse vocabulary file {}: {}",
                path.display(),
                e
            ))
        })?;

        let vocab = Self::from_tokens(tokens);
        tracing::info!("Vocabulary loaded successfully with {} tokens", vocab.size());
        Ok(vocab)
    }

    /// Build a vocabulary from an ordered token list.
    ///
    /// Duplicate strings resolve last-write-wins in the reverse index,
    /// which keeps lookups deterministic.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let index: HashMap<String, usize> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, index }
    }

    /// The token string for `id`, or `"<unk>"` when `id` is out of range.
    pub fn id_to_token(&self, id: usize) -> &str {
        self.tokens.get(id).map(String::as_str).unwrap_or(UNK_TOKEN)
    }

    /// The id for `token`, falling back to the id of `"<unk>"` for unmapped
    /// strings.
    ///
    /// A vocabulary without an `<unk>` entry cannot answer fallback lookups;
    /// that is a data-integrity error, never a sentinel id.
    pub fn token_to_id(&self, token: &str) -> Result<usize> {
        if let Some(&id) = self.index.get(token) {
            return Ok(id);
        }
        self.index.get(UNK_TOKEN).copied().ok_or_else(|| {
            CaptionError::Vocab("vocabulary has no <unk> entry".to_string())
        })
    }

    /// Number of loaded tokens.
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The start-of-sequence token literal.
    pub fn start_token(&self) -> &'static str {
        START_TOKEN
    }

    /// The end-of-sequence token literal.
    pub fn end_token(&self) -> &'static str {
        END_TOKEN
    }
}
