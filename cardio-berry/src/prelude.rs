//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx2d;

pub use crate::augment::{
    augment, demo_slice, AugmentConfig, AugmentError, AugmentResult, Augmenter, LogSink,
    NoopSink, Perturbation, Stage, StageSink,
};

pub use crate::batch::{augment_batch, augment_volume, slice_rng};

pub use crate::consts::gate::{DEFAULT_PROBABILITY_LIMIT, MAX_PROBABILITY_LIMIT};
