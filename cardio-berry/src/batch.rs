//! 对多张切片 (或三维体数据的全部切片) 批量做数据增强.
//!
//! 第 `i` 张切片使用 `ChaCha8Rng::seed_from_u64(seed)` 的第 `i` 条流,
//! 因此无论是否开启 `rayon` 并行, 结果都完全一致.

use crate::augment::{AugmentConfig, AugmentError, AugmentResult, Augmenter};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use num::traits::AsPrimitive;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 为第 `index` 张切片创建独立的随机数生成器.
#[inline]
pub fn slice_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// 沿 `axis` 将 `volume` 切成二维切片, 分别做数据增强后按原顺序拼回.
///
/// 任意一张切片失败 (如全 0 切片) 都会使整个调用失败.
/// `axis` 越界时程序 panic.
pub fn augment_volume<T>(
    volume: ArrayView3<T>,
    axis: Axis,
    config: &AugmentConfig,
    seed: u64,
) -> AugmentResult<Array3<f64>>
where
    T: AsPrimitive<f64> + Sync,
{
    if volume.len_of(axis) == 0 {
        return Err(AugmentError::EmptyImage);
    }
    let slices = augment_slices(volume, axis, Augmenter::new(*config), seed)?;

    let views: Vec<ArrayView2<f64>> = slices.iter().map(|s| s.view()).collect();
    ndarray::stack(axis, &views).map_err(|_| AugmentError::ShapeMismatch { ndim: 3 })
}

/// 对 `slices` 中的每张切片分别做数据增强, 结果与输入一一对应.
///
/// 切片之间的形状可以不同. 任意一张切片失败都会使整个调用失败.
pub fn augment_batch<T>(
    slices: &[Array2<T>],
    config: &AugmentConfig,
    seed: u64,
) -> AugmentResult<Vec<Array2<f64>>>
where
    T: AsPrimitive<f64> + Sync,
{
    augment_each(slices, Augmenter::new(*config), seed)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::prelude::*;

        fn augment_slices<T>(
            volume: ArrayView3<T>,
            axis: Axis,
            augmenter: Augmenter,
            seed: u64,
        ) -> AugmentResult<Vec<Array2<f64>>>
        where
            T: AsPrimitive<f64> + Sync,
        {
            volume
                .axis_iter(axis)
                .into_par_iter()
                .enumerate()
                .map(|(index, slice)| augmenter.augment(slice, &mut slice_rng(seed, index)))
                .collect()
        }

        fn augment_each<T>(
            slices: &[Array2<T>],
            augmenter: Augmenter,
            seed: u64,
        ) -> AugmentResult<Vec<Array2<f64>>>
        where
            T: AsPrimitive<f64> + Sync,
        {
            slices
                .par_iter()
                .enumerate()
                .map(|(index, slice)| augmenter.augment(slice.view(), &mut slice_rng(seed, index)))
                .collect()
        }
    } else {
        fn augment_slices<T>(
            volume: ArrayView3<T>,
            axis: Axis,
            augmenter: Augmenter,
            seed: u64,
        ) -> AugmentResult<Vec<Array2<f64>>>
        where
            T: AsPrimitive<f64>,
        {
            volume
                .axis_iter(axis)
                .enumerate()
                .map(|(index, slice)| augmenter.augment(slice, &mut slice_rng(seed, index)))
                .collect()
        }

        fn augment_each<T>(
            slices: &[Array2<T>],
            augmenter: Augmenter,
            seed: u64,
        ) -> AugmentResult<Vec<Array2<f64>>>
        where
            T: AsPrimitive<f64>,
        {
            slices
                .iter()
                .enumerate()
                .map(|(index, slice)| augmenter.augment(slice.view(), &mut slice_rng(seed, index)))
                .collect()
        }
    }
}
