//! # 扫描演示
//!
//! 同一组类型分别通过运行时扫描（[`app::scan_services`]）与构建期生成的
//! [`register_services`] 注册，两种方式得到相同的服务集合。
//! [`app::build_services`] 在扫描结果上叠加装饰、聚合与适配。

pub mod app;
pub mod infra;
pub mod notify;

/// 构建期生成的注册代码
#[allow(missing_docs)]
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/registrations.rs"));
}

pub use generated::register_services;

/// 时钟服务
pub trait Clock: Send + Sync {
    /// 当前时间（秒）
    fn now(&self) -> u64;
}

/// 邮件服务
pub trait Mailer: Send + Sync {
    /// 发送邮件，返回投递记录
    fn send(&self, to: &str, body: &str) -> String;
}

/// 通知服务
pub trait Notifier: Send + Sync {
    /// 发送通知，返回每条投递记录
    fn notify(&self, message: &str) -> Vec<String>;
}

/// 实验性类型标记，扫描时排除
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experimental;
