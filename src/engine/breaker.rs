//! BiLSTM inference and BIES decoding over a same-script run.

use std::sync::Arc;

use log::trace;

use crate::engine::cell::lstm_step;
use crate::error::{Result, SeabreakError};
use crate::math::{ops, Matrix};
use crate::model::weights::WeightLayout;
use crate::model::LstmModel;

/// Longest run a single [`LstmBreakEngine::break_word`] call accepts.
///
/// Longer runs are rejected rather than risk unbounded working-memory
/// allocation for one call.
pub const MAX_RUN_LEN: usize = 2048;

/// Per-character segmentation label emitted by the trained models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiesLabel {
    /// First character of a multi-character word.
    Begin,
    /// Interior character of a word.
    Inside,
    /// Last character of a multi-character word.
    End,
    /// A single-character word.
    Single,
}

impl BiesLabel {
    /// Decodes the argmax index of the four output logits.
    pub fn decode(index: usize) -> BiesLabel {
        match index {
            0 => BiesLabel::Begin,
            1 => BiesLabel::Inside,
            2 => BiesLabel::End,
            3 => BiesLabel::Single,
            _ => unreachable!("BIES index out of range: {index}"),
        }
    }

    /// Whether a word boundary precedes a character with this label.
    #[inline]
    pub fn breaks_before(self) -> bool {
        matches!(self, BiesLabel::Begin | BiesLabel::Single)
    }
}

/// A word-boundary engine for one script, driven by one trained model.
///
/// Immutable after construction; concurrent [`break_word`] calls on the
/// same engine are safe since all working memory is call-local.
///
/// [`break_word`]: LstmBreakEngine::break_word
#[derive(Debug)]
pub struct LstmBreakEngine {
    model: Arc<LstmModel>,
    layout: WeightLayout,
}

impl LstmBreakEngine {
    /// Binds the model's weight blob into an engine.
    pub fn new(model: Arc<LstmModel>) -> Self {
        let layout = WeightLayout::of(&model);
        Self { model, layout }
    }

    /// The model backing this engine.
    pub fn model(&self) -> &LstmModel {
        &self.model
    }

    /// Finds word boundaries in `text[start..end]`, a run of same-script
    /// code points.
    ///
    /// Invokes `on_break(pos)` for every absolute position `pos` at which
    /// a line break may be taken, in strictly increasing order. No break
    /// is reported at `start` itself. Runs longer than [`MAX_RUN_LEN`]
    /// fail with [`SeabreakError::RangeTooLong`] before any callback
    /// fires.
    pub fn break_word<F>(
        &self,
        text: &[char],
        start: usize,
        end: usize,
        on_break: &mut F,
    ) -> Result<()>
    where
        F: FnMut(usize),
    {
        debug_assert!(start <= end && end <= text.len());
        let len = end - start;
        if len > MAX_RUN_LEN {
            return Err(SeabreakError::RangeTooLong { len, max: MAX_RUN_LEN });
        }
        trace!("breaking run of {} code points with {}", len, self.model.name());

        let weights = self.layout.bind(self.model.matrices());
        let hunits = self.model.hunits();

        let indices: Vec<usize> = text[start..end]
            .iter()
            .map(|&ch| self.model.mapping().index_of(ch))
            .collect();

        // Working memory for the whole call.
        let mut ifco = vec![0.0f32; 4 * hunits];
        let mut c = vec![0.0f32; hunits];
        let mut logp = vec![0.0f32; 4];
        let mut h_backward = Matrix::zeros(len, hunits);
        let mut fb_row = vec![0.0f32; 2 * hunits];

        // Backward LSTM, storing every hidden state. Each row starts from
        // its successor's state; the last row starts from zero.
        for i in (0..len).rev() {
            if i + 1 < len {
                h_backward.copy_row(i, i + 1);
            }
            lstm_step(
                &weights.backward_w,
                &weights.backward_u,
                weights.backward_b,
                weights.embedding.row(indices[i]),
                h_backward.row_mut(i),
                &mut c,
                &mut ifco,
            );
        }

        // Forward LSTM fused with the output layer: only h[i-1] is needed,
        // so the forward state streams through the first half of fb_row.
        // The cell-state buffer is reused across the two passes.
        c.fill(0.0);
        for i in 0..len {
            let (forward_row, backward_row) = fb_row.split_at_mut(hunits);
            lstm_step(
                &weights.forward_w,
                &weights.forward_u,
                weights.forward_b,
                weights.embedding.row(indices[i]),
                forward_row,
                &mut c,
                &mut ifco,
            );
            backward_row.copy_from_slice(h_backward.row(i));

            logp.copy_from_slice(weights.output_b);
            ops::add_dot(&mut logp, &fb_row, &weights.output_w);

            let label = BiesLabel::decode(ops::argmax(&logp));
            if label.breaks_before() && i != 0 {
                on_break(start + i);
            }
        }
        Ok(())
    }
}
