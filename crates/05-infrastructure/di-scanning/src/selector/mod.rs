//! 扫描选择链
//!
//! [`TypeSourceSelector`] → [`ImplementationTypeSelector`] →
//! [`ServiceTypeSelector`] → [`LifetimeSelector`]
//!
//! 每一级都可以回到前一级继续选择（通过 [`ChainSources`]、[`ChainClasses`]、
//! [`ChainServices`]），所有选择在扫描结束时统一写入服务集合。

pub mod implementation;
pub mod lifetime;
pub mod service_type;
pub mod type_source;

pub use implementation::{ChainClasses, ImplementationTypeSelector};
pub use lifetime::LifetimeSelector;
pub use service_type::{ChainServices, ServiceTypeSelector};
pub use type_source::{ChainSources, TypeSourceSelector};

use crate::strategy::RegistrationStrategy;
use di_abstractions::TypeMetadata;
use di_common::{Lifetime, TypeInfo};
use std::sync::Arc;

/// 一次 `from_*` 选择出的类型
pub(crate) struct SourceSelection {
    pub(crate) types: Vec<Arc<TypeMetadata>>,
    pub(crate) classes: Vec<ClassSelection>,
}

/// 一次 `add_classes*` 选择出的实现类型
pub(crate) struct ClassSelection {
    pub(crate) types: Vec<Arc<TypeMetadata>>,
    pub(crate) registrations: Vec<RegistrationSelection>,
    pub(crate) strategy: Option<Box<dyn RegistrationStrategy>>,
}

impl ClassSelection {
    pub(crate) fn new(types: Vec<Arc<TypeMetadata>>) -> Self {
        Self {
            types,
            registrations: Vec::new(),
            strategy: None,
        }
    }
}

/// 一次 `as_*` 选择及其生命周期
pub(crate) struct RegistrationSelection {
    pub(crate) services: ServiceSelection,
    pub(crate) lifetime: LifetimeSelection,
}

/// 服务类型的选择方式
pub(crate) enum ServiceSelection {
    SelfType,
    Types(Vec<TypeInfo>),
    Selected(Box<dyn Fn(&TypeMetadata) -> Vec<TypeInfo>>),
    ImplementedServices(Box<dyn Fn(&TypeInfo) -> bool>),
    SelfWithServices(Box<dyn Fn(&TypeInfo) -> bool>),
    MatchingService(Box<dyn Fn(&TypeInfo) -> bool>),
    Attributes,
}

/// 生命周期的选择方式
pub(crate) enum LifetimeSelection {
    Fixed(Lifetime),
    Computed(Box<dyn Fn(&TypeMetadata) -> Lifetime>),
}

impl LifetimeSelection {
    pub(crate) fn resolve(&self, metadata: &TypeMetadata) -> Lifetime {
        match self {
            Self::Fixed(lifetime) => *lifetime,
            Self::Computed(select) => select(metadata),
        }
    }
}

impl Default for LifetimeSelection {
    fn default() -> Self {
        Self::Fixed(Lifetime::default())
    }
}
