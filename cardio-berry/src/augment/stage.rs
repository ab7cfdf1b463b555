//! 扰动阶段及其参数.

use super::kernel::{self, Kernel3};
use crate::consts::excitation::{EXCITATION_CLIP, EXCITATION_STD};
use crate::consts::gate::GATE_UPPER;
use crate::consts::stage::*;
use crate::Idx2d;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// 流水线中的汇报点.
///
/// `Input` 与 `Output` 分别对应归一化之后和最终截断之后, 其余六个对应扰动阶段.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stage {
    /// 归一化后的输入.
    Input,

    /// 亮度.
    Brightness,

    /// 对比度.
    Contrast,

    /// 模糊.
    Blurring,

    /// 高斯噪声.
    GaussianNoise,

    /// 量化 ("均匀") 噪声.
    UniformNoise,

    /// 椒盐噪声.
    SaltAndPepper,

    /// 截断后的输出.
    Output,
}

impl Stage {
    /// 按执行顺序排列的六个扰动阶段.
    pub const PERTURBATIONS: [Stage; 6] = [
        Stage::Brightness,
        Stage::Contrast,
        Stage::Blurring,
        Stage::GaussianNoise,
        Stage::UniformNoise,
        Stage::SaltAndPepper,
    ];

    /// 汇报时使用的标签.
    pub const fn label(&self) -> &'static str {
        match self {
            Stage::Input => "INPUT",
            Stage::Brightness => "BRIGHTNESS",
            Stage::Contrast => "CONTRAST",
            Stage::Blurring => "BLURRING",
            Stage::GaussianNoise => "NOISE - GAUSSIAN",
            Stage::UniformNoise => "NOISE - UNIFORM",
            Stage::SaltAndPepper => "NOISE - SALT AND PEPPER",
            Stage::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 抽取一个门控整数, 取值于 `[0, 100)`.
#[inline]
pub(crate) fn draw_gate<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(0..GATE_UPPER)
}

/// 抽取一个截断到 `[-1, 1]` 的激励值 `e ~ N(0, 0.388)`.
#[inline]
pub(crate) fn draw_excitation<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    (z * EXCITATION_STD).clamp(-EXCITATION_CLIP, EXCITATION_CLIP)
}

/// 一次已抽取好参数的扰动.
///
/// 将参数抽取与数组修改分开, 便于单独检查每个阶段的行为.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Perturbation {
    /// 整体乘以 `multiplier`.
    Brightness {
        /// 亮度乘子, 位于 `[0.5, 1.5]`.
        multiplier: f64,
    },

    /// 整体加上 `shift`.
    Contrast {
        /// 平移量, 位于 `(-0.1, 0.1)`.
        shift: f64,
    },

    /// 以 `strength * [0.5, 1, 0.5]` 为卷积核, 先行后列做可分离卷积.
    Blur {
        /// 卷积核强度, 位于 `[0.5, 1]`.
        strength: f64,
    },

    /// 逐像素叠加 `clip(N(0, std), -2, 2) / 100`.
    GaussianNoise {
        /// 噪声标准差, 位于 `[0, 1]`. 为 0 时不生效.
        std: f64,
    },

    /// 按当前值域重新量化为 `bins` 个等级.
    Quantize {
        /// 量化区间数. 不超过 100 时不生效.
        bins: u32,
    },

    /// 随机置 1 (盐) 与置 0 (椒).
    SaltAndPepper {
        /// 受影响像素比例.
        amount: f64,
    },
}

impl Perturbation {
    /// 为 `stage` 抽取扰动参数. `gate` 是该阶段已经抽取的门控整数 (对比度阶段会复用它).
    ///
    /// `Stage::Input` 与 `Stage::Output` 不对应任何扰动, 返回 `None`.
    pub fn draw<R: Rng + ?Sized>(stage: Stage, gate: u8, rng: &mut R) -> Option<Self> {
        let p = match stage {
            Stage::Input | Stage::Output => return None,
            Stage::Brightness => Self::draw_brightness(rng),
            Stage::Contrast => Self::draw_contrast(gate, rng),
            Stage::Blurring => Self::draw_blur(rng),
            Stage::GaussianNoise => Self::draw_gaussian_noise(rng),
            Stage::UniformNoise => Self::draw_quantize(rng),
            Stage::SaltAndPepper => Self::draw_salt_and_pepper(rng),
        };
        Some(p)
    }

    /// 抽取亮度乘子 `1 + 0.5 * e`.
    pub fn draw_brightness<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::Brightness {
            multiplier: 1.0 + BRIGHTNESS_GAIN * draw_excitation(rng),
        }
    }

    /// 以门控整数 `gate` 作为幅值, 再以 50% 概率取负.
    pub fn draw_contrast<R: Rng + ?Sized>(gate: u8, rng: &mut R) -> Self {
        let magnitude = f64::from(gate) / CONTRAST_DIVISOR;
        let shift = if rng.gen_bool(0.5) {
            -magnitude
        } else {
            magnitude
        };
        Self::Contrast { shift }
    }

    /// 抽取卷积核强度 `(|e| + 1) / 2`.
    pub fn draw_blur<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::Blur {
            strength: (draw_excitation(rng).abs() + 1.0) / 2.0,
        }
    }

    /// 抽取噪声标准差 `|e|`.
    pub fn draw_gaussian_noise<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::GaussianNoise {
            std: draw_excitation(rng).abs(),
        }
    }

    /// 抽取量化区间数 `round((|e| + 1) * 500)`.
    pub fn draw_quantize<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bins = ((draw_excitation(rng).abs() + 1.0) * QUANT_BASE_BINS).round();
        Self::Quantize { bins: bins as u32 }
    }

    /// 抽取受影响比例 `0.0005 * (|e| + 1) * 50`.
    pub fn draw_salt_and_pepper<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::SaltAndPepper {
            amount: SALT_PEPPER_BASE * (draw_excitation(rng).abs() + 1.0) * SALT_PEPPER_GAIN,
        }
    }

    /// 该扰动所属的阶段.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Brightness { .. } => Stage::Brightness,
            Self::Contrast { .. } => Stage::Contrast,
            Self::Blur { .. } => Stage::Blurring,
            Self::GaussianNoise { .. } => Stage::GaussianNoise,
            Self::Quantize { .. } => Stage::UniformNoise,
            Self::SaltAndPepper { .. } => Stage::SaltAndPepper,
        }
    }

    /// 参数是否使得该扰动即使被触发也不修改数组.
    #[inline]
    pub fn is_noop(&self) -> bool {
        match *self {
            Self::GaussianNoise { std } => std == 0.0,
            Self::Quantize { bins } => bins <= QUANT_MIN_BINS,
            _ => false,
        }
    }

    /// 就地应用扰动. 噪声类扰动会继续从 `rng` 中抽取逐像素的随机数.
    pub fn apply<R: Rng + ?Sized>(&self, array: &mut Array2<f64>, rng: &mut R) {
        if self.is_noop() {
            return;
        }
        match *self {
            Self::Brightness { multiplier } => array.mapv_inplace(|v| v * multiplier),
            Self::Contrast { shift } => array.mapv_inplace(|v| v + shift),
            Self::Blur { strength } => {
                let taps: Kernel3 = BLUR_TAPS.map(|t| t * strength);
                kernel::separable_convolve(array, &taps);
            }
            Self::GaussianNoise { std } => {
                array.mapv_inplace(|v| {
                    let z: f64 = rng.sample(StandardNormal);
                    v + (z * std).clamp(-NOISE_CLIP, NOISE_CLIP) * NOISE_SCALE
                });
            }
            Self::Quantize { bins } => quantize(array, bins),
            Self::SaltAndPepper { amount } => salt_and_pepper(array, amount, rng),
        }
    }
}

/// 求数组的 `(最小值, 最大值)`. 数组为空时返回 `None`.
pub(crate) fn min_max(array: ArrayView2<f64>) -> Option<(f64, f64)> {
    let mut it = array.iter().copied();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// 在 `[min, max]` 上等距取 `bins` 个边界, 将每个值替换为 `不大于它的边界个数 / bins`.
///
/// 最小值映射到 `1 / bins`, 最大值映射到 1.
fn quantize(array: &mut Array2<f64>, bins: u32) {
    let Some((lo, hi)) = min_max(array.view()) else {
        return;
    };
    let n = bins as usize;
    let step = (hi - lo) / (n - 1) as f64;
    let mut edges: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
    edges[n - 1] = hi;

    let scale = f64::from(bins);
    array.mapv_inplace(|v| edges.partition_point(|&e| e <= v) as f64 / scale);
}

/// 先置盐, 再置椒. 行列坐标独立、有放回地抽取, 因此实际受影响像素可能更少.
fn salt_and_pepper<R: Rng + ?Sized>(array: &mut Array2<f64>, amount: f64, rng: &mut R) {
    let (h, w) = array.dim();
    if h == 0 || w == 0 {
        return;
    }
    let size = (h * w) as f64;
    for (ratio, value) in [(SALT_RATIO, 1.0), (1.0 - SALT_RATIO, 0.0)] {
        let count = (amount * size * ratio).ceil() as usize;
        let rows: Vec<usize> = (0..count).map(|_| rng.gen_range(0..h)).collect();
        let cols: Vec<usize> = (0..count).map(|_| rng.gen_range(0..w)).collect();
        for pos in rows.into_iter().zip(cols) {
            array[pos] = value;
        }
    }
}

/// 椒盐噪声中单种噪声 (盐或椒) 的像素个数.
#[inline]
pub fn salt_pepper_count(amount: f64, (h, w): Idx2d) -> usize {
    (amount * (h * w) as f64 * SALT_RATIO).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::{draw_excitation, draw_gate, min_max, salt_pepper_count, Perturbation, Stage};
    use ndarray::{arr2, Array2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(Stage::Input.to_string(), "INPUT");
        assert_eq!(Stage::SaltAndPepper.to_string(), "NOISE - SALT AND PEPPER");
        assert_eq!(Stage::PERTURBATIONS.len(), 6);
        assert!(!Stage::PERTURBATIONS.contains(&Stage::Input));
        assert!(!Stage::PERTURBATIONS.contains(&Stage::Output));
    }

    #[test]
    fn test_draw_ranges() {
        let mut r = rng();
        for _ in 0..2000 {
            assert!(draw_gate(&mut r) < 100);
            let e = draw_excitation(&mut r);
            assert!((-1.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn test_drawn_parameter_ranges() {
        let mut r = rng();
        for _ in 0..500 {
            match Perturbation::draw_brightness(&mut r) {
                Perturbation::Brightness { multiplier } => {
                    assert!((0.5..=1.5).contains(&multiplier))
                }
                p => panic!("unexpected {p:?}"),
            }
            match Perturbation::draw_blur(&mut r) {
                Perturbation::Blur { strength } => assert!((0.5..=1.0).contains(&strength)),
                p => panic!("unexpected {p:?}"),
            }
            match Perturbation::draw_quantize(&mut r) {
                Perturbation::Quantize { bins } => assert!((500..=1000).contains(&bins)),
                p => panic!("unexpected {p:?}"),
            }
            match Perturbation::draw_salt_and_pepper(&mut r) {
                Perturbation::SaltAndPepper { amount } => {
                    assert!((0.025 - 1e-12..=0.05 + 1e-12).contains(&amount))
                }
                p => panic!("unexpected {p:?}"),
            }
        }
    }

    /// 对比度的幅值直接来自门控整数, 只有符号是随机的.
    #[test]
    fn test_contrast_reuses_gate() {
        let mut r = rng();
        let (mut pos, mut neg) = (0, 0);
        for _ in 0..200 {
            match Perturbation::draw_contrast(37, &mut r) {
                Perturbation::Contrast { shift } => {
                    assert!(f64_eq(shift.abs(), 0.037));
                    if shift > 0.0 {
                        pos += 1;
                    } else {
                        neg += 1;
                    }
                }
                p => panic!("unexpected {p:?}"),
            }
        }
        assert!(pos > 0 && neg > 0);
    }

    #[test]
    fn test_draw_dispatch() {
        let mut r = rng();
        assert!(Perturbation::draw(Stage::Input, 0, &mut r).is_none());
        assert!(Perturbation::draw(Stage::Output, 0, &mut r).is_none());
        for stage in Stage::PERTURBATIONS {
            let p = Perturbation::draw(stage, 10, &mut r).unwrap();
            assert_eq!(p.stage(), stage);
        }
    }

    #[test]
    fn test_brightness_and_contrast() {
        let mut r = rng();
        let mut a = arr2(&[[0.2, 0.4], [0.6, 0.8]]);
        Perturbation::Brightness { multiplier: 1.5 }.apply(&mut a, &mut r);
        Perturbation::Contrast { shift: -0.05 }.apply(&mut a, &mut r);
        let expected = arr2(&[[0.25, 0.55], [0.85, 1.15]]);
        for (x, y) in a.iter().zip(expected.iter()) {
            assert!(f64_eq(*x, *y));
        }
    }

    #[test]
    fn test_blur_uniform_interior() {
        let mut r = rng();
        let mut a = Array2::<f64>::ones((5, 5));
        Perturbation::Blur { strength: 0.5 }.apply(&mut a, &mut r);
        // 卷积核之和为 1, 内部保持不变; 边缘每个方向缺一个 0.25.
        assert!(f64_eq(a[(2, 2)], 1.0));
        assert!(f64_eq(a[(0, 2)], 0.75));
        assert!(f64_eq(a[(0, 0)], 0.5625));
    }

    #[test]
    fn test_gaussian_noise_zero_std_is_noop() {
        let p = Perturbation::GaussianNoise { std: 0.0 };
        assert!(p.is_noop());

        let mut a = arr2(&[[0.1, 0.2], [0.3, 0.4]]);
        let before = a.clone();
        let mut r1 = rng();
        let mut r2 = rng();
        p.apply(&mut a, &mut r1);
        assert_eq!(a, before);
        // 不消耗任何随机数.
        assert_eq!(draw_gate(&mut r1), draw_gate(&mut r2));
    }

    #[test]
    fn test_gaussian_noise_bounded() {
        let mut r = rng();
        let mut a = Array2::<f64>::from_elem((20, 20), 0.5);
        Perturbation::GaussianNoise { std: 1.0 }.apply(&mut a, &mut r);
        assert!(a.iter().all(|v| (0.48..=0.52).contains(v)));
        assert!(a.iter().any(|v| *v != 0.5));
    }

    #[test]
    fn test_quantize_small_bins_is_noop() {
        for bins in [0, 1, 50, 100] {
            let p = Perturbation::Quantize { bins };
            assert!(p.is_noop());
            let mut a = arr2(&[[0.11, 0.27], [0.35, 0.93]]);
            let before = a.clone();
            p.apply(&mut a, &mut rng());
            assert_eq!(a, before);
        }
        assert!(!Perturbation::Quantize { bins: 101 }.is_noop());
    }

    #[test]
    fn test_quantize_levels() {
        let mut a = arr2(&[[0.0, 0.5], [0.25, 1.0]]);
        Perturbation::Quantize { bins: 101 }.apply(&mut a, &mut rng());
        // 边界间距 0.01: 0 -> 1 个边界, 0.25 -> 26, 0.5 -> 51, 1 -> 101.
        assert!(f64_eq(a[(0, 0)], 1.0 / 101.0));
        assert!(f64_eq(a[(1, 0)], 26.0 / 101.0));
        assert!(f64_eq(a[(0, 1)], 51.0 / 101.0));
        assert!(f64_eq(a[(1, 1)], 1.0));
    }

    #[test]
    fn test_quantize_constant_array() {
        let mut a = Array2::<f64>::from_elem((3, 3), 0.7);
        Perturbation::Quantize { bins: 500 }.apply(&mut a, &mut rng());
        assert!(a.iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_salt_and_pepper_counts() {
        let mut r = rng();
        let amount = 0.025;
        let shape = (100, 100);
        let n = salt_pepper_count(amount, shape);
        assert_eq!(n, 125);

        let mut a = Array2::<f64>::from_elem(shape, 0.5);
        Perturbation::SaltAndPepper { amount }.apply(&mut a, &mut r);
        let ones = a.iter().filter(|v| **v == 1.0).count();
        let zeros = a.iter().filter(|v| **v == 0.0).count();
        assert!(ones <= n);
        assert!(zeros <= n);
        // 有放回抽样只会少量重复.
        assert!(ones + zeros >= 2 * n - 40);
        assert!(zeros > 0 && ones > 0);
    }

    #[test]
    fn test_salt_pepper_count_rounds_up() {
        // 0.025 * 100 * 0.5 = 1.25 -> 2
        assert_eq!(salt_pepper_count(0.025, (10, 10)), 2);
        assert_eq!(salt_pepper_count(0.05, (10, 10)), 3);
    }

    #[test]
    fn test_min_max() {
        let a = arr2(&[[3.0, -1.0], [2.0, 7.5]]);
        assert_eq!(min_max(a.view()), Some((-1.0, 7.5)));
        let empty = Array2::<f64>::zeros((0, 4));
        assert_eq!(min_max(empty.view()), None);
    }
}
