//! 程序运行函数.

use crate::profile::Profile;
use crate::result::SweepResult;
use cardio_berry::prelude::*;
use ndarray::Array2;
use std::thread;
use utils::loader;

/// 加载实验切片. 若 `.npy` 文件不存在, 则改用随机演示切片.
pub fn load_input(seed: u64) -> Array2<f64> {
    if let Some(path) = loader::slice_path_from_env_or_home() {
        if path.is_file() {
            log::info!("Loading slice from {}", path.display());
            return loader::load_slice(&path).expect("Loading slice error");
        }
        log::info!("{} not found, using demo slice", path.display());
    }
    demo_slice(&mut slice_rng(seed, usize::MAX))
}

/// 以 `config` 重复增强 `input` `rounds` 次并统计.
pub fn profile_limit(
    input: &Array2<f64>,
    config: AugmentConfig,
    rounds: u32,
    seed: u64,
    stream: usize,
) -> Profile {
    let mut profile = Profile::new();
    let mut rng = slice_rng(seed, stream);
    let augmenter = Augmenter::new(config);
    let baseline = Augmenter::new(AugmentConfig::disabled());

    for _ in 0..rounds {
        let Ok(plain) = baseline.augment(input.view(), &mut rng) else {
            profile.count_failed();
            continue;
        };
        profile.augment_start();
        let out = augmenter.augment(input.view(), &mut rng);
        profile.augment_elapsed();
        match out {
            Ok(out) => profile.count_round(out.iter(), plain.iter()),
            Err(e) => {
                log::warn!("Augmentation failed: {e}");
                profile.count_failed();
            }
        }
    }
    profile.finish()
}

/// 实际运行.
pub fn run() -> SweepResult {
    let seed = loader::seed_from_env();
    let rounds = loader::rounds_from_env();
    let input = load_input(seed);

    // 先按原始流程完整地演示一次, 中间结果写入日志.
    let demo = Augmenter::new(AugmentConfig::always().with_verbose(true));
    demo.augment_with_sink(
        input.view(),
        &mut slice_rng(seed, 0),
        &mut LogSink::with_level(log::Level::Info),
    )
    .expect("Demo augmentation error");

    log::info!(
        "Running probability sweep: {rounds} rounds per limit on {} cpus...",
        utils::cpus()
    );
    let input = &input;
    thread::scope(|s| {
        let configs = utils::sweep_configs();
        let handles: Vec<_> = configs
            .iter()
            .map(|&(limit, config)| {
                s.spawn(move || profile_limit(input, config, rounds, seed, limit as usize + 1))
            })
            .collect();

        SweepResult::from_iter(
            configs.iter().map(|(limit, _)| *limit).zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::profile_limit;
    use cardio_berry::prelude::*;
    use ndarray::Array2;

    #[test]
    fn test_zero_limit_has_no_deviation() {
        let input = demo_slice(&mut slice_rng(0, 0));
        let p = profile_limit(&input, AugmentConfig::disabled(), 5, 0, 1);
        assert_eq!(p.get_rounds(), 5);
        assert_eq!(p.get_mean_deviation(), Some(0.0));
    }

    #[test]
    fn test_full_limit_deviates() {
        let input = demo_slice(&mut slice_rng(0, 0));
        let p = profile_limit(&input, AugmentConfig::always(), 5, 0, 2);
        assert_eq!(p.get_rounds(), 5);
        assert!(p.get_mean_deviation().unwrap() > 0.0);
        assert!(p.get_saturated_ratio().unwrap() > 0.0);
    }

    #[test]
    fn test_invalid_input_counted() {
        let input = Array2::<f64>::zeros((4, 4));
        let p = profile_limit(&input, AugmentConfig::always(), 3, 0, 3);
        assert_eq!(p.get_rounds(), 0);
        assert_eq!(p.get_failed(), 3);
    }
}
