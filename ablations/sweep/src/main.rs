//! 概率阈值扫描: 在不同触发概率下重复增强同一张切片, 比较耗时与扰动强度.
//!
//! 输入切片取自 `$CARDIO_SLICE_NPY` 或 `$HOME/dataset/cardio/slice.npy`,
//! 均不存在时使用 10 x 10 的随机演示切片.

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::init_with_level(log::Level::Info).expect("Logger init error");
    runner::run().analyze();
}
