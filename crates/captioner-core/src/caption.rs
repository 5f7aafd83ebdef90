//! Caption generation: wires preprocessing, beam search, and rendering.

use std::path::Path;

use crate::config::Config;
use crate::decode::beam_search;
use crate::error::Result;
use crate::model::ModelSession;
use crate::preprocess::ImagePreprocessor;
use crate::vocab::{Vocabulary, UNK_TOKEN};

/// Render a token-id sequence as display text.
///
/// Control tokens (`<start>`, `<end>`, `<unk>`) are dropped; every kept
/// token is followed by a single space, including the last one. The
/// trailing space is long-standing output behavior and is preserved.
pub fn decode_caption(token_ids: &[usize], vocab: &Vocabulary) -> String {
    let mut caption = String::new();
    for &id in token_ids {
        let token = vocab.id_to_token(id);
        if token == vocab.start_token() || token == vocab.end_token() || token == UNK_TOKEN {
            continue;
        }
        caption.push_str(token);
        caption.push(' ');
    }
    caption
}

/// End-to-end caption generator: the main entry point of the library.
///
/// Owns the vocabulary and the model session; both are read-only after
/// construction, so one generator can serve any number of sequential
/// `generate` calls.
pub struct CaptionGenerator {
    config: Config,
    preprocessor: ImagePreprocessor,
    vocab: Vocabulary,
    model: ModelSession,
}

impl CaptionGenerator {
    /// Build a generator from a validated configuration: constructs the
    /// preprocessor and loads the vocabulary and the ONNX model.
    pub fn new(config: Config) -> Result<Self> {
        let preprocessor = ImagePreprocessor::new(&config.input_shape);
        let vocab = Vocabulary::from_file(&config.vocab_path)?;
        let model = ModelSession::load(&config.model_path)?;

        tracing::info!("CaptionGenerator initialized successfully");
        Ok(Self {
            config,
            preprocessor,
            vocab,
            model,
        })
    }

    /// Generate a caption for one image file.
    pub fn generate(&self, image_path: &Path) -> Result<String> {
        let input_tensor = self.preprocessor.preprocess(image_path)?;

        let token_ids = beam_search(
            &self.model,
            &input_tensor,
            self.config.max_caption_length,
            self.config.beam_width,
            &self.vocab,
        )?;

        let caption = decode_caption(&token_ids, &self.vocab);
        tracing::info!(
            "Generated caption for {}: {}",
            image_path.display(),
            caption
        );
        Ok(caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(tokens: &[&str]) -> Vocabulary {
        Vocabulary::from_tokens(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_decode_caption_filters_control_tokens() {
        let v = vocab(&["<unk>", "<start>", "<end>", "a", "dog"]);
        let caption = decode_caption(&[1, 3, 4, 2], &v);
        assert_eq!(caption, "a dog ");
    }

    #[test]
    fn test_decode_caption_all_control_tokens_renders_empty() {
        let v = vocab(&["<unk>", "<start>", "<end>", "a", "dog"]);
        assert_eq!(decode_caption(&[1, 2], &v), "");
    }

    #[test]
    fn test_decode_caption_out_of_range_ids_are_dropped() {
        // Out-of-range ids render as <unk>, which is filtered.
        let v = vocab(&["<unk>", "<start>", "<end>", "a", "dog"]);
        assert_eq!(decode_caption(&[1, 3, 99, 4, 2], &v), "a dog ");
    }

    #[test]
    fn test_decode_caption_preserves_trailing_space() {
        let v = vocab(&["<unk>", "<start>", "<end>", "a", "dog"]);
        let caption = decode_caption(&[3], &v);
        assert!(caption.ends_with(' '));
        assert_eq!(caption, "a ");
    }

    #[test]
    fn test_decode_caption_empty_sequence() {
        let v = vocab(&["<unk>", "<start>", "<end>"]);
        assert_eq!(decode_caption(&[], &v), "");
    }
}
