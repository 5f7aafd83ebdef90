//! Captioner Core - Image captioning library.
//!
//! Turns an image into a natural-language caption by combining a
//! fixed-shape numeric encoding of the image with an ONNX sequence model
//! that scores vocabulary tokens one step at a time, then beam-searching
//! over token sequences for a high-scoring, well-formed caption.
//!
//! # Architecture
//!
//! ```text
//! Image → Preprocess (NCHW tensor) → Beam Search over ONNX scores → Caption text
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use captioner_core::{CaptionGenerator, Config};
//!
//! fn main() -> captioner_core::Result<()> {
//!     let config = Config::load_from("config.json".as_ref())?;
//!     let generator = CaptionGenerator::new(config)?;
//!     let caption = generator.generate("image.jpg".as_ref())?;
//!     println!("{caption}");
//!     Ok(())
//! }
//! ```

pub mod caption;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod vocab;

// Re-exports for convenient access
pub use caption::{decode_caption, CaptionGenerator};
pub use config::Config;
pub use decode::{beam_search, Scorer};
pub use error::{CaptionError, ConfigError, Result};
pub use model::ModelSession;
pub use preprocess::ImagePreprocessor;
pub use vocab::{Vocabulary, END_TOKEN, START_TOKEN, UNK_TOKEN};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
