//! 通知实现

use crate::{Clock, Mailer, Notifier};
use component_macros::{injectable, Injectable};
use std::sync::Arc;

/// 运维邮箱
pub const OPS_ADDRESS: &str = "ops@example.com";

/// 邮件通知，作用域内共享
#[injectable(implements(dyn Notifier), descriptor(service = dyn Notifier, lifetime = scoped))]
#[derive(Injectable)]
pub struct EmailNotifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier for EmailNotifier {
    fn notify(&self, message: &str) -> Vec<String> {
        vec![self.mailer.send(OPS_ADDRESS, message)]
    }
}

/// 日志通知，注册为自身及 [`Notifier`]
#[injectable(implements(dyn Notifier), descriptor(lifetime = transient))]
#[derive(Injectable)]
pub struct LogNotifier {
    clock: Option<Arc<dyn Clock>>,
}

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) -> Vec<String> {
        let now = self.clock.as_ref().map_or(0, |clock| clock.now());
        vec![format!("[{now}] {message}")]
    }
}
