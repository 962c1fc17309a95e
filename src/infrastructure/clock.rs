//! 时钟 - 基础设施层
//!
//! 只暴露"现在几点"的能力，方便测试时注入固定时间

use chrono::{Local, NaiveDateTime};

/// 墙上时钟
pub trait Clock {
    /// 当前本地时间
    fn now(&self) -> NaiveDateTime;

    /// 当前时间的交卷时间字符串
    fn submission_time(&self) -> String {
        format_submission_time(&self.now())
    }
}

/// 系统本地时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟（测试用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// 格式化为 en-US 的 12 小时制，小时不补零，例如 `9:05:03 AM`
pub fn format_submission_time(time: &NaiveDateTime) -> String {
    time.format("%-I:%M:%S %p").to_string()
}
