//! 运行时错误.

use thiserror::Error;

/// 数据增强的运行时错误.
///
/// 所有错误都代表调用方违反了前置条件, 因此不做任何局部恢复:
/// 一旦出错, 整个调用失败, 不会返回处理了一半的数组.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AugmentError {
    /// 输入图像不含任何像素.
    #[error("input image is empty")]
    EmptyImage,

    /// 输入图像的全局最大值为 0, 无法归一化.
    #[error("input image maximum is zero, cannot normalize")]
    ZeroMaximum,

    /// 输入图像含有 NaN 或 inf.
    #[error("input image contains a non-finite value: {0}")]
    NonFiniteValue(f64),

    /// 输入数组不是二维的.
    #[error("expected a 2-dimensional array, got {ndim} dimension(s)")]
    ShapeMismatch {
        /// 实际维数.
        ndim: usize,
    },

    /// 概率阈值超出 `[0, 100]`.
    #[error("probability limit {0} is out of range [0, 100]")]
    ProbabilityOutOfRange(u32),
}

impl AugmentError {
    /// 是否属于非法输入值一类的错误 (空图, 最大值为 0, 非有限值).
    #[inline]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyImage | Self::ZeroMaximum | Self::NonFiniteValue(_)
        )
    }
}
