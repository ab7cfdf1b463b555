//! 可分离的三抽头卷积.

use ndarray::{Array2, ArrayViewMut1};

/// 三抽头卷积核.
pub(crate) type Kernel3 = [f64; 3];

/// 对一维数据做 "same" 模式卷积 (零填充, 输出长度与输入一致), 并就地写回.
///
/// 卷积核会按卷积定义翻转: `out[i] = k[0] * x[i + 1] + k[1] * x[i] + k[2] * x[i - 1]`.
/// 越界的邻居视为 0.
pub(crate) fn convolve_same(mut lane: ArrayViewMut1<f64>, kernel: &Kernel3) {
    let src = lane.to_vec();
    for (i, out) in lane.iter_mut().enumerate() {
        let prev = match i {
            0 => 0.0,
            _ => src[i - 1],
        };
        let next = src.get(i + 1).copied().unwrap_or(0.0);
        *out = kernel[0] * next + kernel[1] * src[i] + kernel[2] * prev;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use ndarray::Axis;
        use rayon::prelude::*;

        /// 先对每一行卷积, 再对行卷积结果的每一列卷积. 行与行 (列与列) 之间并行.
        pub(crate) fn separable_convolve(array: &mut Array2<f64>, kernel: &Kernel3) {
            array
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .for_each(|row| convolve_same(row, kernel));
            array
                .axis_iter_mut(Axis(1))
                .into_par_iter()
                .for_each(|col| convolve_same(col, kernel));
        }
    } else {
        /// 先对每一行卷积, 再对行卷积结果的每一列卷积.
        pub(crate) fn separable_convolve(array: &mut Array2<f64>, kernel: &Kernel3) {
            for row in array.rows_mut() {
                convolve_same(row, kernel);
            }
            for col in array.columns_mut() {
                convolve_same(col, kernel);
            }
        }
    }
}
