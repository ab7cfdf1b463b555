//! 消融实验依赖的通用组件.

use cardio_berry::AugmentConfig;

pub mod loader;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep() {
    println!("{SEP}");
}

/// 简单分隔线.
#[inline]
pub fn sep_to<W: std::io::Write>(mut w: W) -> std::io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

/// 消融实验扫描的概率阈值.
pub const SWEEP_LIMITS: [u32; 5] = [0, 25, 50, 75, 100];

/// 为扫描中的每个概率阈值创建配置.
pub fn sweep_configs() -> Vec<(u32, AugmentConfig)> {
    SWEEP_LIMITS
        .into_iter()
        .filter_map(|limit| AugmentConfig::new(limit, false).ok().map(|c| (limit, c)))
        .collect()
}
