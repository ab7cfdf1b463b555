//! 数据增强配置.

use super::{AugmentError, AugmentResult};
use crate::consts::gate::{DEFAULT_PROBABILITY_LIMIT, MAX_PROBABILITY_LIMIT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 数据增强配置, 包含扰动触发概率阈值和诊断开关.
///
/// 该配置是只读的. 若要修改参数, 你应该创建新的实例.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AugmentConfig {
    probability_limit: u8,
    verbose: bool,
}

impl AugmentConfig {
    /// 构建配置.
    ///
    /// `probability_limit` 必须位于 `[0, 100]`, 否则返回
    /// [`AugmentError::ProbabilityOutOfRange`].
    pub fn new(probability_limit: u32, verbose: bool) -> AugmentResult<Self> {
        match u8::try_from(probability_limit) {
            Ok(limit) if limit <= MAX_PROBABILITY_LIMIT => Ok(Self {
                probability_limit: limit,
                verbose,
            }),
            _ => Err(AugmentError::ProbabilityOutOfRange(probability_limit)),
        }
    }

    /// 所有扰动都不触发的配置. 此时增强只做归一化与截断.
    #[inline]
    pub const fn disabled() -> Self {
        Self {
            probability_limit: 0,
            verbose: false,
        }
    }

    /// 所有扰动都必然触发的配置.
    #[inline]
    pub const fn always() -> Self {
        Self {
            probability_limit: MAX_PROBABILITY_LIMIT,
            verbose: false,
        }
    }

    /// 以新的诊断开关复制一份配置.
    #[inline]
    pub const fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    /// 扰动触发概率阈值 (百分比).
    #[inline]
    pub fn probability_limit(&self) -> u8 {
        self.probability_limit
    }

    /// 是否在每个阶段之后汇报中间结果.
    #[inline]
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            probability_limit: DEFAULT_PROBABILITY_LIMIT,
            verbose: false,
        }
    }
}
