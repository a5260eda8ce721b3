//! 服务组装
//!
//! 先注册扫描结果，再装饰 [`Mailer`]、聚合 [`Notifier`]，并把 [`Clock`] 适配为 [`Timestamp`]。

use crate::infra::SystemClock;
use crate::notify::EmailNotifier;
use crate::{register_services, Clock, Experimental, Mailer, Notifier};
use di_abstractions::{ServiceCollection, ServiceProvider};
use di_common::{RegistrationResult, ResolveResult};
use di_scanning::prelude::*;
use std::sync::Arc;
use tracing::info;

/// 注册来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationSource {
    /// 运行时扫描全局类型目录
    Runtime,
    /// 构建期生成的注册代码
    Generated,
}

/// 时间戳服务，由 [`Clock`] 适配而来
pub trait Timestamp: Send + Sync {
    /// 格式化的时间戳
    fn timestamp(&self) -> String;
}

struct ClockTimestamp {
    clock: Arc<dyn Clock>,
}

impl Timestamp for ClockTimestamp {
    fn timestamp(&self) -> String {
        format!("t+{}", self.clock.now())
    }
}

/// 为投递记录加上审计标记
pub struct AuditedMailer {
    inner: Arc<dyn Mailer>,
}

impl Mailer for AuditedMailer {
    fn send(&self, to: &str, body: &str) -> String {
        format!("audited({})", self.inner.send(to, body))
    }
}

impl Decorator<dyn Mailer> for AuditedMailer {
    fn decorate(inner: Arc<dyn Mailer>, _: &dyn ServiceProvider) -> ResolveResult<Arc<dyn Mailer>> {
        Ok(Arc::new(Self { inner }) as Arc<dyn Mailer>)
    }
}

/// 依次调用所有通知服务
pub struct BroadcastNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, message: &str) -> Vec<String> {
        self.notifiers
            .iter()
            .flat_map(|notifier| notifier.notify(message))
            .collect()
    }
}

/// 运行时扫描，选择与 `scan.toml` 相同
pub fn scan_services(services: &mut ServiceCollection) -> RegistrationResult<()> {
    services.scan(|scan| {
        scan.from_crate_of::<SystemClock>()
            .add_classes_where(|classes| {
                classes
                    .in_namespace_of::<SystemClock>()
                    .without_attribute::<Experimental>()
            })
            .using_registration_strategy(Skip)
            .as_self_with_services()
            .with_singleton_lifetime()
            .add_classes_where(|classes| classes.in_namespace_of::<EmailNotifier>())
            .using_attributes();
    })?;
    Ok(())
}

/// 按注册来源组装服务集合
pub fn build_services(source: RegistrationSource) -> RegistrationResult<ServiceCollection> {
    let mut services = ServiceCollection::new();
    match source {
        RegistrationSource::Runtime => scan_services(&mut services)?,
        RegistrationSource::Generated => register_services(&mut services)?,
    }
    info!("注册来源 {:?}: {} 个注册", source, services.len());

    services
        .decorate::<dyn Mailer, AuditedMailer>()?
        .aggregate::<dyn Notifier, _>(|notifiers, _| {
            Ok(Arc::new(BroadcastNotifier { notifiers }) as Arc<dyn Notifier>)
        })?
        .adapt::<dyn Clock, dyn Timestamp, _>(|clock, _| {
            Ok(Arc::new(ClockTimestamp { clock }) as Arc<dyn Timestamp>)
        })?;
    Ok(services)
}
