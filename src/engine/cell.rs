//! One timestep of an LSTM cell with a forget gate.

use crate::math::{ops, MatrixView};

/// Advances an LSTM cell by one timestep.
///
/// `w` is `E x 4H`, `u` is `H x 4H`, `b` is `4H`, `x` is the input of
/// length `E`; `h` and `c` (length `H`) are updated in place and `ifco`
/// (length `4H`) is gate scratch. The `4H` vectors hold the four gate
/// lanes in the order i, f, c̃, o.
///
/// The cell state is updated before the hidden state reads it; callers
/// rely on that ordering.
pub(crate) fn lstm_step(
    w: &MatrixView<'_>,
    u: &MatrixView<'_>,
    b: &[f32],
    x: &[f32],
    h: &mut [f32],
    c: &mut [f32],
    ifco: &mut [f32],
) {
    let hunits = h.len();
    debug_assert_eq!(c.len(), hunits);
    debug_assert_eq!(ifco.len(), 4 * hunits);
    debug_assert_eq!(b.len(), 4 * hunits);
    debug_assert_eq!(w.rows(), x.len());
    debug_assert_eq!(u.rows(), hunits);

    // ifco = b + x*W + h*U
    ifco.copy_from_slice(b);
    ops::add_dot(ifco, x, w);
    ops::add_dot(ifco, h, u);

    ops::sigmoid(&mut ifco[..hunits]); // i
    ops::sigmoid(&mut ifco[hunits..2 * hunits]); // f
    ops::tanh(&mut ifco[2 * hunits..3 * hunits]); // c~
    ops::sigmoid(&mut ifco[3 * hunits..]); // o

    // c = c (.) f + i (.) c~
    ops::hadamard(c, &ifco[hunits..2 * hunits]);
    ops::add_hadamard(c, &ifco[..hunits], &ifco[2 * hunits..3 * hunits]);

    // h = tanh(c) (.) o
    ops::tanh_from(h, c);
    ops::hadamard(h, &ifco[3 * hunits..]);
}
