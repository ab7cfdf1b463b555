//! 实验输入的定位与加载.

use ndarray::Array2;
use ndarray_npy::{read_npy, ReadNpyError};
use std::env;
use std::path::{Path, PathBuf};

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    ans.extend(it);
    Some(ans)
}

/// 获取实验切片 (`.npy`, 二维 `f64`) 的路径.
///
/// 1. 若环境变量 `$CARDIO_SLICE_NPY` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/cardio/slice.npy`. 无法确定主目录时返回 `None`.
pub fn slice_path_from_env_or_home() -> Option<PathBuf> {
    match env::var("CARDIO_SLICE_NPY") {
        Ok(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => home_dataset_dir_with(["cardio", "slice.npy"]),
    }
}

/// 读取二维 `f64` `.npy` 切片.
pub fn load_slice<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, ReadNpyError> {
    read_npy(path)
}

/// 从环境变量 `key` 读取一个数值, 缺失或无法解析时返回 `default`.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 随机数种子. 取自 `$CARDIO_SWEEP_SEED`, 默认为 0.
#[inline]
pub fn seed_from_env() -> u64 {
    env_or("CARDIO_SWEEP_SEED", 0)
}

/// 每个概率阈值下的重复次数. 取自 `$CARDIO_SWEEP_ROUNDS`, 默认为 200.
#[inline]
pub fn rounds_from_env() -> u32 {
    env_or("CARDIO_SWEEP_ROUNDS", 200)
}

#[cfg(test)]
mod tests {
    use super::{env_or, home_dataset_dir_with};

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("CARDIO_TEST_SURELY_UNSET_KEY", 17u32), 17);
    }

    #[test]
    fn test_home_dataset_dir_with() {
        if let Some(p) = home_dataset_dir_with(["cardio", "slice.npy"]) {
            assert!(p.ends_with("dataset/cardio/slice.npy"));
        }
    }
}
