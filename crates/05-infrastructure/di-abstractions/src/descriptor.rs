//! 服务描述符
//!
//! 描述一个注册：服务类型、生命周期以及实例的创建方式

use crate::factory::{injectable_factory, typed_factory, Injectable, InstanceFactory};
use crate::instance::Instance;
use crate::resolver::ServiceProvider;
use di_common::{Lifetime, ResolveResult, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 实例的创建方式
#[derive(Clone)]
pub enum Implementation {
    /// 由实现类型构造
    Type {
        /// 实现类型
        implementation_type: TypeInfo,
        /// 构造并转换为服务类型的工厂
        factory: InstanceFactory,
    },
    /// 由工厂函数创建
    Factory(InstanceFactory),
    /// 预先创建的实例
    Instance(Instance),
}

impl Implementation {
    /// 创建实例
    pub fn create(&self, provider: &dyn ServiceProvider) -> ResolveResult<Instance> {
        match self {
            Self::Type { factory, .. } | Self::Factory(factory) => factory(provider),
            Self::Instance(instance) => Ok(instance.clone()),
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type {
                implementation_type,
                ..
            } => f
                .debug_struct("Type")
                .field("implementation_type", &implementation_type.name)
                .finish_non_exhaustive(),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
            Self::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
        }
    }
}

/// 服务描述符
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// 服务类型
    pub service_type: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 创建方式
    pub implementation: Implementation,
}

impl ServiceDescriptor {
    /// 创建新的服务描述符
    pub fn new(service_type: TypeInfo, lifetime: Lifetime, implementation: Implementation) -> Self {
        Self {
            service_type,
            lifetime,
            implementation,
        }
    }

    /// 单例实例注册
    pub fn instance<S>(instance: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self::new(
            TypeInfo::of::<S>(),
            Lifetime::Singleton,
            Implementation::Instance(Instance::new::<S>(instance)),
        )
    }

    /// 工厂注册
    pub fn factory<S, F>(lifetime: Lifetime, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::new(
            TypeInfo::of::<S>(),
            lifetime,
            Implementation::Factory(typed_factory(factory)),
        )
    }

    /// 单例工厂注册
    pub fn singleton<S, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::factory(Lifetime::Singleton, factory)
    }

    /// 作用域工厂注册
    pub fn scoped<S, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::factory(Lifetime::Scoped, factory)
    }

    /// 瞬时工厂注册
    pub fn transient<S, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::factory(Lifetime::Transient, factory)
    }

    /// 实现类型注册：构造 `T` 后转换为服务 `S`
    pub fn implementation<S, T>(lifetime: Lifetime, cast: fn(Arc<T>) -> Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        Self::new(
            TypeInfo::of::<S>(),
            lifetime,
            Implementation::Type {
                implementation_type: TypeInfo::of::<T>(),
                factory: injectable_factory(cast),
            },
        )
    }

    /// 以自身类型注册
    pub fn of_type<T: Injectable>(lifetime: Lifetime) -> Self {
        Self::implementation::<T, T>(lifetime, |instance| instance)
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// 实现类型（仅类型注册存在）
    pub fn implementation_type(&self) -> Option<TypeInfo> {
        match &self.implementation {
            Implementation::Type {
                implementation_type,
                ..
            } => Some(*implementation_type),
            _ => None,
        }
    }

    /// 创建实例
    pub fn create_instance(&self, provider: &dyn ServiceProvider) -> ResolveResult<Instance> {
        self.implementation.create(provider)
    }
}
