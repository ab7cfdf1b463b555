//! 中间结果诊断输出.

use super::Stage;
use ndarray::ArrayView2;

/// 接收每个阶段结束后的中间数组.
///
/// 仅当 [`crate::augment::AugmentConfig::verbose`] 为 `true` 时才会被调用.
/// 任何 `FnMut(Stage, ArrayView2<f64>)` 闭包都可以直接作为 sink 使用.
pub trait StageSink {
    /// 汇报 `stage` 结束后的数组内容.
    fn report(&mut self, stage: Stage, array: ArrayView2<'_, f64>);
}

/// 丢弃所有汇报.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl StageSink for NoopSink {
    #[inline]
    fn report(&mut self, _stage: Stage, _array: ArrayView2<'_, f64>) {}
}

/// 通过 `log` 门面输出完整数组.
#[derive(Copy, Clone, Debug)]
pub struct LogSink {
    level: log::Level,
}

impl LogSink {
    /// 以指定日志级别输出.
    #[inline]
    pub const fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    /// 日志级别.
    #[inline]
    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::with_level(log::Level::Debug)
    }
}

impl StageSink for LogSink {
    fn report(&mut self, stage: Stage, array: ArrayView2<'_, f64>) {
        log::log!(self.level, "{stage}\n{array}");
    }
}

impl<F> StageSink for F
where
    F: FnMut(Stage, ArrayView2<'_, f64>),
{
    #[inline]
    fn report(&mut self, stage: Stage, array: ArrayView2<'_, f64>) {
        self(stage, array)
    }
}
