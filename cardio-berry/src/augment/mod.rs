//! 二维切片的随机扰动流水线.
//!
//! 输入一张任意数值范围的二维切片, 先按全局最大值归一化, 再依次经过六个
//! 独立门控的扰动阶段 (亮度, 对比度, 模糊, 高斯噪声, 量化噪声, 椒盐噪声),
//! 最后截断到 `[0, 1]`.
//!
//! 每个阶段都会抽取一个 `[0, 100)` 的门控整数, 当且仅当它小于
//! [`AugmentConfig::probability_limit`] 时该阶段生效.
//!
//! 所有随机数都来自调用方传入的 `rng`. 相同的种子和输入总会得到相同的输出.
//!
//! ```
//! use cardio_berry::augment::{AugmentConfig, Augmenter};
//! use ndarray::Array2;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let image = Array2::<f32>::from_elem((10, 10), 5.0);
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let out = Augmenter::new(AugmentConfig::disabled())
//!     .augment(image.view(), &mut rng)
//!     .unwrap();
//! assert!(out.iter().all(|v| *v == 1.0));
//! ```

mod config;
mod error;
mod kernel;
mod sink;
mod stage;

pub use config::AugmentConfig;
pub use error::AugmentError;
pub use sink::{LogSink, NoopSink, StageSink};
pub use stage::{salt_pepper_count, Perturbation, Stage};

use stage::draw_gate;

use crate::consts::{DEMO_SCALE, DEMO_SHAPE, OUTPUT_MAX, OUTPUT_MIN};
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};
use num::traits::AsPrimitive;
use rand::Rng;

/// 数据增强运行时结果.
pub type AugmentResult<T> = Result<T, AugmentError>;

/// 按给定配置执行数据增强.
#[derive(Copy, Clone, Debug, Default)]
pub struct Augmenter {
    config: AugmentConfig,
}

impl Augmenter {
    /// 初始化.
    #[inline]
    pub fn new(config: AugmentConfig) -> Self {
        Self { config }
    }

    /// 当前配置.
    #[inline]
    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// 对 `image` 做数据增强, 返回形状相同且取值位于 `[0, 1]` 的新数组.
    ///
    /// 打开 `verbose` 时, 中间结果以 `debug` 级别写入日志.
    pub fn augment<T, R>(&self, image: ArrayView2<T>, rng: &mut R) -> AugmentResult<Array2<f64>>
    where
        T: AsPrimitive<f64>,
        R: Rng + ?Sized,
    {
        self.augment_with_sink(image, rng, &mut LogSink::default())
    }

    /// 同 [`Self::augment`], 但接受任意维数的数组. 非二维时返回
    /// [`AugmentError::ShapeMismatch`], 且不做任何处理.
    pub fn augment_dyn<T, R>(&self, image: ArrayViewD<T>, rng: &mut R) -> AugmentResult<Array2<f64>>
    where
        T: AsPrimitive<f64>,
        R: Rng + ?Sized,
    {
        let ndim = image.ndim();
        let image = image
            .into_dimensionality::<Ix2>()
            .map_err(|_| AugmentError::ShapeMismatch { ndim })?;
        self.augment(image, rng)
    }

    /// 同 [`Self::augment`], 但打开 `verbose` 时中间结果交给 `sink`.
    ///
    /// `sink` 会依次收到 `Input`, 六个扰动阶段 (无论是否生效) 和 `Output`.
    pub fn augment_with_sink<T, R, S>(
        &self,
        image: ArrayView2<T>,
        rng: &mut R,
        sink: &mut S,
    ) -> AugmentResult<Array2<f64>>
    where
        T: AsPrimitive<f64>,
        R: Rng + ?Sized,
        S: StageSink + ?Sized,
    {
        let mut array = normalize(image)?;
        let limit = self.config.probability_limit();
        let verbose = self.config.verbose();
        let mut report = |stage: Stage, a: &Array2<f64>| {
            if verbose {
                sink.report(stage, a.view());
            }
        };

        report(Stage::Input, &array);

        for stage in Stage::PERTURBATIONS {
            let gate = draw_gate(rng);
            if gate < limit {
                if let Some(p) = Perturbation::draw(stage, gate, rng) {
                    log::debug!("{stage} fired (gate {gate} < {limit}): {p:?}");
                    p.apply(&mut array, rng);
                }
            }
            report(stage, &array);
        }

        array.mapv_inplace(|v| v.clamp(OUTPUT_MIN, OUTPUT_MAX));
        report(Stage::Output, &array);

        Ok(array)
    }
}

/// 以概率阈值 `probability_limit` (百分比, `[0, 100]`) 对 `image` 做数据增强.
///
/// 这是 `Augmenter::new(AugmentConfig::new(probability_limit, false)?).augment(..)` 的简写.
pub fn augment<T, R>(
    image: ArrayView2<T>,
    probability_limit: u32,
    rng: &mut R,
) -> AugmentResult<Array2<f64>>
where
    T: AsPrimitive<f64>,
    R: Rng + ?Sized,
{
    let config = AugmentConfig::new(probability_limit, false)?;
    Augmenter::new(config).augment(image, rng)
}

/// 转换为 `f64` 副本并除以全局最大值. 负值不会被平移.
fn normalize<T: AsPrimitive<f64>>(image: ArrayView2<T>) -> AugmentResult<Array2<f64>> {
    if image.is_empty() {
        return Err(AugmentError::EmptyImage);
    }
    let array = image.mapv(|v| v.as_());
    if let Some(v) = array.iter().copied().find(|v| !v.is_finite()) {
        return Err(AugmentError::NonFiniteValue(v));
    }
    let max = array.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    if max == 0.0 {
        return Err(AugmentError::ZeroMaximum);
    }
    Ok(array.mapv_into(|v| v / max))
}

/// 生成一张 10 x 10 的演示切片, 像素取自 `[0, 10)` 上的均匀分布.
pub fn demo_slice<R: Rng + ?Sized>(rng: &mut R) -> Array2<f64> {
    Array2::from_shape_fn(DEMO_SHAPE, |_| DEMO_SCALE * rng.gen::<f64>())
}
