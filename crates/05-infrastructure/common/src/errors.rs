//! 错误类型定义

use thiserror::Error;

/// 服务注册错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("服务类型已注册: {service_type}")]
    DuplicateTypeRegistration { service_type: String },

    #[error("未找到已注册的服务: {service_type}")]
    MissingTypeRegistration { service_type: String },

    #[error("类型 {implementation_type} 不能作为服务 {service_type} 注册")]
    NotAssignable {
        implementation_type: String,
        service_type: String,
    },

    #[error("类型 {implementation_type} 存在多个服务类型相同的描述属性")]
    DuplicateDescriptorAttribute { implementation_type: String },
}

impl RegistrationError {
    /// 创建重复注册错误
    pub fn duplicate(service_type: impl Into<String>) -> Self {
        Self::DuplicateTypeRegistration {
            service_type: service_type.into(),
        }
    }

    /// 创建缺失注册错误
    pub fn missing(service_type: impl Into<String>) -> Self {
        Self::MissingTypeRegistration {
            service_type: service_type.into(),
        }
    }

    /// 创建不可赋值错误
    pub fn not_assignable(
        implementation_type: impl Into<String>,
        service_type: impl Into<String>,
    ) -> Self {
        Self::NotAssignable {
            implementation_type: implementation_type.into(),
            service_type: service_type.into(),
        }
    }
}

/// 服务解析错误类型
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("服务未注册: {service_type}")]
    ServiceNotRegistered { service_type: String },

    #[error("类型转换失败, 期望: {expected}, 实际: {actual}")]
    DowncastFailed { expected: String, actual: String },

    #[error("服务创建失败: {service_type}, 原因: {source}")]
    CreationFailed {
        service_type: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("解析深度超过限制 {max_depth}: {service_type}")]
    ResolutionDepthExceeded {
        service_type: String,
        max_depth: usize,
    },
}

impl ResolveError {
    /// 创建未注册错误
    pub fn not_registered(service_type: impl Into<String>) -> Self {
        Self::ServiceNotRegistered {
            service_type: service_type.into(),
        }
    }

    /// 创建服务创建失败错误
    pub fn creation(
        service_type: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::CreationFailed {
            service_type: service_type.into(),
            source: source.into(),
        }
    }
}

/// 结果类型别名
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type ResolveResult<T> = Result<T, ResolveError>;
