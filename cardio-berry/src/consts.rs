//! 通用常量.

/// 扰动门控相关常量.
pub mod gate {
    /// 门控随机整数的上界 (不含). 每个扰动阶段抽取 `[0, GATE_UPPER)` 中的整数.
    pub const GATE_UPPER: u8 = 100;

    /// 默认的扰动触发概率阈值 (百分比).
    pub const DEFAULT_PROBABILITY_LIMIT: u8 = 25;

    /// 概率阈值的最大合法值. 此时每个扰动阶段都必然触发.
    pub const MAX_PROBABILITY_LIMIT: u8 = 100;
}

/// 激励值 (excitation) 相关常量.
///
/// 除对比度以外, 每个扰动阶段都先从 `N(0, EXCITATION_STD)` 中抽取一个激励值,
/// 并截断到 `[-EXCITATION_CLIP, EXCITATION_CLIP]`.
pub mod excitation {
    /// 激励值正态分布的标准差.
    pub const EXCITATION_STD: f64 = 0.388;

    /// 激励值的截断范围.
    pub const EXCITATION_CLIP: f64 = 1.0;
}

/// 各扰动阶段的参数.
pub mod stage {
    /// 亮度增益. 亮度乘子为 `1 + BRIGHTNESS_GAIN * e`.
    pub const BRIGHTNESS_GAIN: f64 = 0.5;

    /// 对比度平移量的分母. 平移量为 `gate / CONTRAST_DIVISOR`.
    pub const CONTRAST_DIVISOR: f64 = 1000.0;

    /// 模糊卷积核的基础形状, 实际卷积核为 `k * BLUR_TAPS`.
    pub const BLUR_TAPS: [f64; 3] = [0.5, 1.0, 0.5];

    /// 高斯噪声单个样本的截断范围.
    pub const NOISE_CLIP: f64 = 2.0;

    /// 高斯噪声叠加前的缩放系数.
    pub const NOISE_SCALE: f64 = 0.01;

    /// 量化噪声的基础区间个数. 实际区间数为 `round((|e| + 1) * QUANT_BASE_BINS)`.
    pub const QUANT_BASE_BINS: f64 = 500.0;

    /// 量化区间数不超过该值时, 量化阶段不生效.
    pub const QUANT_MIN_BINS: u32 = 100;

    /// 椒盐噪声基础比例.
    pub const SALT_PEPPER_BASE: f64 = 0.0005;

    /// 椒盐噪声比例的放大系数.
    pub const SALT_PEPPER_GAIN: f64 = 50.0;

    /// 椒盐噪声中 "盐" 所占的比例, 其余为 "椒".
    pub const SALT_RATIO: f64 = 0.5;
}

/// 输出像素的下界.
pub const OUTPUT_MIN: f64 = 0.0;

/// 输出像素的上界.
pub const OUTPUT_MAX: f64 = 1.0;

/// 演示切片的分辨率 (高, 宽).
pub const DEMO_SHAPE: (usize, usize) = (10, 10);

/// 演示切片的像素幅值. 每个像素取自 `[0, DEMO_SCALE)` 上的均匀分布.
pub const DEMO_SCALE: f64 = 10.0;
