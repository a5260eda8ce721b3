//! 注册策略
//!
//! 扫描结果写入服务集合时，决定如何处理已存在的注册。

use di_abstractions::{ServiceCollection, ServiceDescriptor};
use di_common::{RegistrationError, RegistrationResult};
use std::fmt;
use tracing::debug;

/// 注册策略 trait
pub trait RegistrationStrategy: fmt::Debug {
    /// 将描述符写入服务集合
    fn apply(
        &self,
        services: &mut ServiceCollection,
        descriptor: ServiceDescriptor,
    ) -> RegistrationResult<()>;
}

/// 总是追加
#[derive(Debug, Clone, Copy, Default)]
pub struct Append;

impl RegistrationStrategy for Append {
    fn apply(
        &self,
        services: &mut ServiceCollection,
        descriptor: ServiceDescriptor,
    ) -> RegistrationResult<()> {
        services.add(descriptor);
        Ok(())
    }
}

/// 服务类型已注册时跳过
#[derive(Debug, Clone, Copy, Default)]
pub struct Skip;

impl RegistrationStrategy for Skip {
    fn apply(
        &self,
        services: &mut ServiceCollection,
        descriptor: ServiceDescriptor,
    ) -> RegistrationResult<()> {
        let service_type = descriptor.service_type;
        if !services.try_add(descriptor) {
            debug!("服务已注册，跳过: {}", service_type);
        }
        Ok(())
    }
}

/// 服务类型已注册时报错
#[derive(Debug, Clone, Copy, Default)]
pub struct Throw;

impl RegistrationStrategy for Throw {
    fn apply(
        &self,
        services: &mut ServiceCollection,
        descriptor: ServiceDescriptor,
    ) -> RegistrationResult<()> {
        if services.contains_service(&descriptor.service_type) {
            return Err(RegistrationError::duplicate(descriptor.service_type.name));
        }
        services.add(descriptor);
        Ok(())
    }
}

/// 替换时匹配已有注册的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacementBehavior {
    /// 服务类型相同
    #[default]
    ServiceType,
    /// 实现类型相同
    ImplementationType,
    /// 服务类型或实现类型相同
    All,
}

/// 移除匹配的已有注册后追加
#[derive(Debug, Clone, Copy, Default)]
pub struct Replace {
    /// 匹配方式
    pub behavior: ReplacementBehavior,
}

impl Replace {
    /// 以指定匹配方式创建替换策略
    pub fn new(behavior: ReplacementBehavior) -> Self {
        Self { behavior }
    }

    fn matches(&self, existing: &ServiceDescriptor, descriptor: &ServiceDescriptor) -> bool {
        let same_service = existing.service_type == descriptor.service_type;
        let same_implementation = descriptor.implementation_type().is_some()
            && existing.implementation_type() == descriptor.implementation_type();

        match self.behavior {
            ReplacementBehavior::ServiceType => same_service,
            ReplacementBehavior::ImplementationType => same_implementation,
            ReplacementBehavior::All => same_service || same_implementation,
        }
    }
}

impl RegistrationStrategy for Replace {
    fn apply(
        &self,
        services: &mut ServiceCollection,
        descriptor: ServiceDescriptor,
    ) -> RegistrationResult<()> {
        let before = services.len();
        services.retain(|existing| !self.matches(existing, &descriptor));
        let removed = before - services.len();
        if removed > 0 {
            debug!("替换 {} 个已有注册: {}", removed, descriptor.service_type);
        }
        services.add(descriptor);
        Ok(())
    }
}
