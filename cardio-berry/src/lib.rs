#![warn(missing_docs)]

//! 核心库. 为心脏影像 (cine MRI / CT) 的二维切片提供可复现的随机扰动, 用于训练数据增强.
//!
//! 该 crate 只负责 "二维数组进, 二维数组出". DICOM/NIfTI 解码, 网格处理,
//! 点集配准, 流形统计与可视化均由调用方的其它工具完成.
//!
//! # 注意
//!
//! 1. 输入切片会先按全局最大值归一化, 因此全 0 切片会返回错误, 调用方需要提前过滤.
//! 2. 所有随机数都来自调用方传入的生成器. 库内部不持有任何全局随机状态.
//!
//! # 开发计划
//!
//! ### 六阶段扰动流水线 ✅
//!
//! 亮度, 对比度, 模糊, 高斯噪声, 量化噪声, 椒盐噪声, 各自独立门控.
//!
//! 实现位于 `cardio-berry/src/augment`.
//!
//! ### 中间结果诊断 ✅
//!
//! 每个阶段之后的数组可交给任意 `StageSink` (闭包, 日志或丢弃).
//!
//! 实现位于 `cardio-berry/src/augment/sink.rs`.
//!
//! ### 三维体数据 / 批量切片 ✅
//!
//! 每张切片使用独立的随机数流, 并行与串行结果一致.
//!
//! 实现位于 `cardio-berry/src/batch.rs`.

/// 二维索引 (高, 宽).
pub type Idx2d = (usize, usize);

pub mod augment;

pub mod batch;

pub mod consts;

pub mod prelude;

pub use augment::{
    augment, demo_slice, AugmentConfig, AugmentError, AugmentResult, Augmenter, LogSink,
    NoopSink, Perturbation, Stage, StageSink,
};
