//! 扫描运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::from_secs(0),
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 某一概率阈值下的扫描统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 完成的增强次数.
    rounds: u64,

    /// 因输入非法而失败的次数.
    failed: u64,

    /// 增强本身花费的总时间.
    augment_time: AccTimer,

    /// 整个任务花费的总时间.
    real_time: AccTimer,

    /// 最耗时的一次增强.
    most: Duration,

    /// 输出中恰好为 0 或 1 的像素总数.
    saturated: u64,

    /// 输出像素总数.
    pixels: u64,

    /// 相对于 "只归一化与截断" 的逐像素绝对偏差之和.
    deviation: f64,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            rounds: 0,
            failed: 0,
            augment_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: Duration::MAX,
            saturated: 0,
            pixels: 0,
            deviation: 0.0,
        }
    }

    /// 开始一次增强计时.
    #[inline]
    pub fn augment_start(&mut self) {
        self.augment_time.start();
    }

    /// 结束一次增强计时.
    #[inline]
    pub fn augment_elapsed(&mut self) {
        let d = self.augment_time.elapsed();
        self.most = match self.most {
            Duration::MAX => d,
            once_duration => std::cmp::max(d, once_duration),
        };
    }

    /// 记录一次成功的增强结果.
    pub fn count_round<'a, I>(&mut self, output: I, baseline: I)
    where
        I: IntoIterator<Item = &'a f64>,
    {
        self.rounds += 1;
        for (o, b) in output.into_iter().zip(baseline) {
            self.pixels += 1;
            if *o == 0.0 || *o == 1.0 {
                self.saturated += 1;
            }
            self.deviation += (o - b).abs();
        }
    }

    /// 记录一次失败.
    #[inline]
    pub fn count_failed(&mut self) {
        self.failed += 1;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得成功次数.
    #[inline]
    pub fn get_rounds(&self) -> u64 {
        self.rounds
    }

    /// 获得失败次数.
    #[inline]
    pub fn get_failed(&self) -> u64 {
        self.failed
    }

    /// 以微秒为单位获得增强的总花费时间.
    #[inline]
    pub fn get_augment_time_us(&self) -> u64 {
        self.augment_time.get_total_us()
    }

    /// 以微秒为单位获得任务运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得单次增强的平均时间.
    #[inline]
    pub fn get_avg_augment_time_us(&self) -> Option<f64> {
        match self.rounds {
            0 => None,
            rounds => Some(self.get_augment_time_us() as f64 / rounds as f64),
        }
    }

    /// 饱和 (恰为 0 或 1) 像素占比.
    #[inline]
    pub fn get_saturated_ratio(&self) -> Option<f64> {
        match self.pixels {
            0 => None,
            pixels => Some(self.saturated as f64 / pixels as f64),
        }
    }

    /// 逐像素平均绝对偏差.
    #[inline]
    pub fn get_mean_deviation(&self) -> Option<f64> {
        match self.pixels {
            0 => None,
            pixels => Some(self.deviation / pixels as f64),
        }
    }

    /// 获取最耗时的一次增强. 如果不存在任务, 则返回 `None`.
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        match self.most {
            Duration::MAX => None,
            d => Some(d),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
