//! 扫描结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(limit: u32, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Probability limit `{limit}`:")?;
    writeln!(w, "{S4}Augmented slices: {}", p.get_rounds())?;
    writeln!(w, "{S4}Failed slices: {}", p.get_failed())?;
    writeln!(w, "{S4}Augmentation total time: {} us", p.get_augment_time_us())?;
    writeln!(
        w,
        "{S4}Augmentation average time: {} us",
        f64_to_display(p.get_avg_augment_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    writeln!(
        w,
        "{S4}Saturated pixel ratio: {}",
        f64_to_display(p.get_saturated_ratio())
    )?;
    writeln!(
        w,
        "{S4}Mean absolute deviation: {}",
        f64_to_display(p.get_mean_deviation())
    )?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming round costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 扫描最终结果.
pub struct SweepResult {
    data: Vec<(u32, Profile)>,
}

impl SweepResult {
    pub fn from_iter<I: IntoIterator<Item = (u32, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (limit, profile) in self.data.iter() {
            describe_into(*limit, profile, &mut buf).expect("Writing into buffer error");
            println!("{}", String::from_utf8_lossy(&buf));
            buf.clear();

            utils::sep();
        }
    }
}
