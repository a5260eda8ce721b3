//! 基础设施实现

pub mod mail;

use super::*;
use crate::app::Timestamp;
use component_macros::{injectable, Injectable};
use std::time::{SystemTime, UNIX_EPOCH};

/// 系统时钟
#[injectable(implements(dyn Clock))]
#[derive(Debug, Injectable)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// 时间戳只在内部使用，不作为扫描得到的服务
impl Timestamp for SystemClock {
    fn timestamp(&self) -> String {
        format!("system+{}", self.now())
    }
}

/// 固定时钟，未登记到类型目录，只能手动注册
#[derive(Debug, Default, Injectable)]
pub struct FixedClock {
    #[inject(default)]
    seconds: u64,
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.seconds
    }
}
