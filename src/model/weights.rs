//! Binding of the contiguous weight blob into the nine named tensors.
//!
//! The blob layout is fixed: embedding, forward W/U/b, backward W/U/b,
//! output W/b. Within every `4H` gate vector the lanes are i, f, c̃, o.
//! Binding is pure offset arithmetic over a blob whose length was already
//! validated at model construction; no weights are copied.

use crate::math::MatrixView;
use crate::model::LstmModel;

#[derive(Debug, Clone, Copy)]
struct Seg2 {
    offset: usize,
    rows: usize,
    cols: usize,
}

#[derive(Debug, Clone, Copy)]
struct Seg1 {
    offset: usize,
    len: usize,
}

/// Offsets and shapes of the nine tensors, computed once per engine.
#[derive(Debug, Clone)]
pub(crate) struct WeightLayout {
    embedding: Seg2,
    forward_w: Seg2,
    forward_u: Seg2,
    forward_b: Seg1,
    backward_w: Seg2,
    backward_u: Seg2,
    backward_b: Seg1,
    output_w: Seg2,
    output_b: Seg1,
}

/// The nine tensors as views borrowing the model blob.
pub(crate) struct LstmWeights<'a> {
    pub embedding: MatrixView<'a>,
    pub forward_w: MatrixView<'a>,
    pub forward_u: MatrixView<'a>,
    pub forward_b: &'a [f32],
    pub backward_w: MatrixView<'a>,
    pub backward_u: MatrixView<'a>,
    pub backward_b: &'a [f32],
    pub output_w: MatrixView<'a>,
    pub output_b: &'a [f32],
}

impl WeightLayout {
    /// Carves the shape table out of the model's dimensions.
    pub(crate) fn of(model: &LstmModel) -> Self {
        let num_index = model.num_index();
        let embedding_size = model.embedding_size();
        let hunits = model.hunits();

        let h4 = 4 * hunits;
        let mut offset = 0;

        let embedding = Seg2 { offset, rows: num_index + 1, cols: embedding_size };
        offset += embedding.rows * embedding.cols;
        let forward_w = Seg2 { offset, rows: embedding_size, cols: h4 };
        offset += forward_w.rows * forward_w.cols;
        let forward_u = Seg2 { offset, rows: hunits, cols: h4 };
        offset += forward_u.rows * forward_u.cols;
        let forward_b = Seg1 { offset, len: h4 };
        offset += forward_b.len;
        let backward_w = Seg2 { offset, rows: embedding_size, cols: h4 };
        offset += backward_w.rows * backward_w.cols;
        let backward_u = Seg2 { offset, rows: hunits, cols: h4 };
        offset += backward_u.rows * backward_u.cols;
        let backward_b = Seg1 { offset, len: h4 };
        offset += backward_b.len;
        let output_w = Seg2 { offset, rows: 2 * hunits, cols: 4 };
        offset += output_w.rows * output_w.cols;
        let output_b = Seg1 { offset, len: 4 };
        offset += output_b.len;

        debug_assert_eq!(
            offset,
            LstmModel::expected_matrix_len(num_index, embedding_size, hunits)
        );

        Self {
            embedding,
            forward_w,
            forward_u,
            forward_b,
            backward_w,
            backward_u,
            backward_b,
            output_w,
            output_b,
        }
    }

    /// Materialises the nine views over the blob.
    pub(crate) fn bind<'a>(&self, data: &'a [f32]) -> LstmWeights<'a> {
        let view2 = |seg: Seg2| MatrixView::new(&data[seg.offset..seg.offset + seg.rows * seg.cols], seg.rows, seg.cols);
        let view1 = |seg: Seg1| &data[seg.offset..seg.offset + seg.len];
        LstmWeights {
            embedding: view2(self.embedding),
            forward_w: view2(self.forward_w),
            forward_u: view2(self.forward_u),
            forward_b: view1(self.forward_b),
            backward_w: view2(self.backward_w),
            backward_u: view2(self.backward_u),
            backward_b: view1(self.backward_b),
            output_w: view2(self.output_w),
            output_b: view1(self.output_b),
        }
    }
}
