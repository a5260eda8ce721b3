//! 邮件实现

use crate::{Clock, Experimental, Mailer};
use component_macros::{injectable, Injectable};
use std::sync::Arc;

/// SMTP 邮件发送
#[injectable(implements(dyn Mailer))]
#[derive(Injectable)]
pub struct SmtpMailer {
    clock: Arc<dyn Clock>,
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, body: &str) -> String {
        format!("smtp:{to}:{body}@{}", self.clock.now())
    }
}

/// 试验中的邮件通道，带 [`Experimental`] 标记
#[injectable(implements(dyn Mailer), attribute(Experimental))]
#[derive(Debug, Injectable)]
pub struct BetaMailer;

impl Mailer for BetaMailer {
    fn send(&self, to: &str, body: &str) -> String {
        format!("beta:{to}:{body}")
    }
}
