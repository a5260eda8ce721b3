//! 生命周期选择

use super::implementation::{ChainClasses, ImplementationTypeSelector};
use super::service_type::{ChainServices, ServiceTypeSelector};
use super::type_source::{ChainSources, TypeSourceSelector};
use super::LifetimeSelection;
use di_abstractions::TypeMetadata;
use di_common::Lifetime;

/// 生命周期选择器，未指定时为瞬时
pub struct LifetimeSelector<'s> {
    selector: &'s mut TypeSourceSelector,
    source: usize,
    class: usize,
    registration: usize,
}

impl<'s> LifetimeSelector<'s> {
    pub(crate) fn new(
        selector: &'s mut TypeSourceSelector,
        source: usize,
        class: usize,
        registration: usize,
    ) -> Self {
        Self {
            selector,
            source,
            class,
            registration,
        }
    }

    fn select(self, lifetime: LifetimeSelection) -> ImplementationTypeSelector<'s> {
        let Self {
            selector,
            source,
            class,
            registration,
        } = self;
        selector.sources[source].classes[class].registrations[registration].lifetime = lifetime;
        ImplementationTypeSelector::new(selector, source)
    }

    /// 单例
    pub fn with_singleton_lifetime(self) -> ImplementationTypeSelector<'s> {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// 作用域
    pub fn with_scoped_lifetime(self) -> ImplementationTypeSelector<'s> {
        self.with_lifetime(Lifetime::Scoped)
    }

    /// 瞬时
    pub fn with_transient_lifetime(self) -> ImplementationTypeSelector<'s> {
        self.with_lifetime(Lifetime::Transient)
    }

    /// 指定生命周期
    pub fn with_lifetime(self, lifetime: Lifetime) -> ImplementationTypeSelector<'s> {
        self.select(LifetimeSelection::Fixed(lifetime))
    }

    /// 由函数为每个实现类型选择生命周期
    pub fn with_lifetime_fn<F>(self, select: F) -> ImplementationTypeSelector<'s>
    where
        F: Fn(&TypeMetadata) -> Lifetime + 'static,
    {
        self.select(LifetimeSelection::Computed(Box::new(select)))
    }
}

impl<'s> ChainSources<'s> for LifetimeSelector<'s> {
    fn into_source(self) -> &'s mut TypeSourceSelector {
        self.selector
    }
}

impl<'s> ChainClasses<'s> for LifetimeSelector<'s> {
    fn into_implementation(self) -> ImplementationTypeSelector<'s> {
        ImplementationTypeSelector::new(self.selector, self.source)
    }
}

impl<'s> ChainServices<'s> for LifetimeSelector<'s> {
    fn into_services(self) -> ServiceTypeSelector<'s> {
        ServiceTypeSelector::new(self.selector, self.source, self.class)
    }
}
