//! Row-wise numeric kernels shared by the distillation criteria.
//!
//! Every function treats an `Array2<f32>` as `[batch, classes]` and works on
//! each row independently.

use ndarray::{Array2, Axis, Zip};

/// Divide logits by the temperature.
pub fn soften(logits: &Array2<f32>, temperature: f32) -> Array2<f32> {
    logits / temperature
}

/// Softmax along the class axis.
///
/// softmax(x)_i = exp(x_i - max(x)) / Σ exp(x_j - max(x))
pub fn softmax_2d(x: &Array2<f32>) -> Array2<f32> {
    let mut result = x.clone();

    for mut row in result.axis_iter_mut(Axis(0)) {
        let max_val = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        row.mapv_inplace(|v| (v - max_val).exp());

        let sum: f32 = row.sum();
        row.mapv_inplace(|v| v / sum);
    }

    result
}

/// Log-softmax along the class axis.
///
/// log_softmax(x)_i = x_i - max(x) - ln Σ exp(x_j - max(x))
pub fn log_softmax_2d(x: &Array2<f32>) -> Array2<f32> {
    let mut result = x.clone();

    for mut row in result.axis_iter_mut(Axis(0)) {
        let max_val = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let log_sum_exp = row
            .iter()
            .map(|&v| (v - max_val).exp())
            .sum::<f32>()
            .max(f32::MIN_POSITIVE)
            .ln();
        row.mapv_inplace(|v| v - max_val - log_sum_exp);
    }

    result
}

/// Back-propagate through a row-wise log-softmax.
///
/// Given `grad_out = dL/d log_softmax(x)` and the forward output
/// `log_probs`, returns `dL/dx = g - softmax(x) * Σ_j g_j` per row.
pub fn log_softmax_backward(grad_out: &Array2<f32>, log_probs: &Array2<f32>) -> Array2<f32> {
    debug_assert_eq!(grad_out.shape(), log_probs.shape());

    let mut grad_in = grad_out.clone();
    Zip::from(grad_in.rows_mut())
        .and(log_probs.rows())
        .for_each(|mut g, lp| {
            let total: f32 = g.sum();
            g.zip_mut_with(&lp, |gi, &lpi| *gi -= lpi.exp() * total);
        });

    grad_in
}
