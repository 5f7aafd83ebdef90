//! Beam search decoding over a next-token scoring oracle.
//!
//! The engine drives the oracle one step at a time, keeping a bounded set
//! of partial-sequence hypotheses. Each step expands every pending
//! hypothesis with its top-scoring next tokens, then re-ranks the combined
//! candidate pool globally — a strong parent may keep several children
//! while a weak parent keeps none. Scores are additive (log-domain by the
//! oracle contract); the engine applies no length penalty and no
//! renormalization.

use ndarray::Array4;

use crate::error::{CaptionError, Result};
use crate::vocab::Vocabulary;

/// Next-token scoring oracle.
///
/// Given an image encoding and a token-id prefix, returns one score per
/// vocabulary entry for the token following the prefix. The result length
/// must equal the vocabulary size; the engine checks this on every call.
pub trait Scorer {
    fn score_step(&self, image: &Array4<f32>, prefix: &[usize]) -> Result<Vec<f32>>;
}

/// One candidate sequence with its accumulated score.
///
/// Hypotheses are append-only: a child is its parent's sequence plus one
/// token, and the parent's score plus that token's oracle score.
#[derive(Debug, Clone)]
struct Hypothesis {
    sequence: Vec<usize>,
    score: f32,
    finished: bool,
}

/// Expand one hypothesis with its top `beam_width` next tokens.
///
/// Vocabulary entries are ranked by score descending; exact ties keep
/// vocabulary-id order (stable sort over `(id, score)` pairs).
fn expand(parent: &Hypothesis, scores: &[f32], beam_width: usize, end_id: usize) -> Vec<Hypothesis> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .iter()
        .take(beam_width)
        .map(|&(token_id, score)| {
            let mut sequence = parent.sequence.clone();
            sequence.push(token_id);
            Hypothesis {
                sequence,
                score: parent.score + score,
                finished: token_id == end_id,
            }
        })
        .collect()
}

/// Run beam search and return the best token-id sequence.
///
/// The beam holds at most `beam_width` active hypotheses, sorted by score
/// descending, and the loop runs for at most `max_length` steps. Finished
/// hypotheses leave the beam for the finished pool; hypotheses still
/// active when the step budget runs out join the pool as-is, so hitting
/// `max_length` without an end token still yields a candidate.
pub fn beam_search<S: Scorer>(
    scorer: &S,
    image: &Array4<f32>,
    max_length: usize,
    beam_width: usize,
    vocab: &Vocabulary,
) -> Result<Vec<usize>> {
    let start_id = vocab.token_to_id(vocab.start_token())?;
    let end_id = vocab.token_to_id(vocab.end_token())?;

    let mut beam = vec![Hypothesis {
        sequence: vec![start_id],
        score: 0.0,
        finished: false,
    }];
    let mut finished: Vec<Hypothesis> = Vec::new();

    for _step in 0..max_length {
        // Drain the beam in score order: finished hypotheses retire to the
        // pool, the rest are expanded this step.
        let mut pending = Vec::with_capacity(beam.len());
        for hypothesis in beam.drain(..) {
            if hypothesis.finished {
                finished.push(hypothesis);
            } else {
                pending.push(hypothesis);
            }
        }
        if pending.is_empty() {
            break;
        }

        let mut candidates = Vec::with_capacity(pending.len() * beam_width);
        for hypothesis in &pending {
            let scores = scorer.score_step(image, &hypothesis.sequence)?;
            if scores.len() != vocab.size() {
                return Err(CaptionError::Inference(format!(
                    "score vector length {} does not match vocabulary size {}",
                    scores.len(),
                    vocab.size()
                )));
            }
            candidates.extend(expand(hypothesis, &scores, beam_width, end_id));
        }

        // Global re-rank across all parents; ties keep generation order.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(beam_width);
        if candidates.is_empty() {
            break;
        }
        beam = candidates;
    }

    // Max-length cutoff: whatever is still active counts as a result.
    finished.append(&mut beam);

    if finished.is_empty() {
        tracing::warn!("No valid caption generated");
        return Err(CaptionError::EmptySearch);
    }

    // Stable sort, so among equal scores the first-inserted hypothesis wins.
    finished.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(finished.swap_remove(0).sequence)
}
