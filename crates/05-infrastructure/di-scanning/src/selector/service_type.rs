//! 服务类型选择

use super::implementation::{ChainClasses, ImplementationTypeSelector};
use super::lifetime::LifetimeSelector;
use super::type_source::{ChainSources, TypeSourceSelector};
use super::{ClassSelection, LifetimeSelection, RegistrationSelection, ServiceSelection};
use crate::strategy::{Append, RegistrationStrategy};
use di_abstractions::{DescriptorAttribute, ServiceCollection, ServiceDescriptor, TypeMetadata};
use di_common::{
    is_matching_service, Lifetime, RegistrationError, RegistrationResult, TypeInfo,
};
use std::collections::HashSet;
use tracing::debug;

/// 服务类型选择器
pub struct ServiceTypeSelector<'s> {
    selector: &'s mut TypeSourceSelector,
    source: usize,
    class: usize,
}

impl<'s> ServiceTypeSelector<'s> {
    pub(crate) fn new(selector: &'s mut TypeSourceSelector, source: usize, class: usize) -> Self {
        Self {
            selector,
            source,
            class,
        }
    }

    fn selection(&mut self) -> &mut ClassSelection {
        &mut self.selector.sources[self.source].classes[self.class]
    }

    fn push(mut self, services: ServiceSelection) -> LifetimeSelector<'s> {
        let selection = self.selection();
        selection.registrations.push(RegistrationSelection {
            services,
            lifetime: LifetimeSelection::default(),
        });
        let registration = selection.registrations.len() - 1;
        LifetimeSelector::new(self.selector, self.source, self.class, registration)
    }

    /// 注册为自身类型
    pub fn as_self(self) -> LifetimeSelector<'s> {
        self.push(ServiceSelection::SelfType)
    }

    /// 注册为服务 `S`
    pub fn as_service<S: ?Sized + 'static>(self) -> LifetimeSelector<'s> {
        self.as_types([TypeInfo::of::<S>()])
    }

    /// 注册为指定的服务类型
    pub fn as_types<I>(self, service_types: I) -> LifetimeSelector<'s>
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        self.push(ServiceSelection::Types(service_types.into_iter().collect()))
    }

    /// 由函数为每个实现类型选择服务类型
    pub fn as_selected<F>(self, select: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeMetadata) -> Vec<TypeInfo> + 'static,
    {
        self.push(ServiceSelection::Selected(Box::new(select)))
    }

    /// 注册为实现的所有服务
    pub fn as_implemented_services(self) -> LifetimeSelector<'s> {
        self.as_implemented_services_where(|_| true)
    }

    /// 注册为实现的满足条件的服务
    pub fn as_implemented_services_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.push(ServiceSelection::ImplementedServices(Box::new(predicate)))
    }

    /// 注册为自身，并将实现的所有服务转发到自身注册
    pub fn as_self_with_services(self) -> LifetimeSelector<'s> {
        self.as_self_with_services_where(|_| true)
    }

    /// 注册为自身，并将实现的满足条件的服务转发到自身注册
    pub fn as_self_with_services_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.push(ServiceSelection::SelfWithServices(Box::new(predicate)))
    }

    /// 注册为名称匹配的服务（`Foo` 对应 `Foo`、`FooImpl`、`DefaultFoo`）
    pub fn as_matching_service(self) -> LifetimeSelector<'s> {
        self.as_matching_service_where(|_| true)
    }

    /// 注册为名称匹配且满足条件的服务
    pub fn as_matching_service_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.push(ServiceSelection::MatchingService(Box::new(predicate)))
    }

    /// 按类型上的服务描述属性注册
    pub fn using_attributes(self) -> ServiceTypeSelector<'s> {
        let selector = self.push(ServiceSelection::Attributes);
        selector.into_services()
    }

    /// 设置注册策略
    pub fn using_registration_strategy<R>(mut self, strategy: R) -> ServiceTypeSelector<'s>
    where
        R: RegistrationStrategy + 'static,
    {
        self.selection().strategy = Some(Box::new(strategy));
        self
    }
}

impl<'s> ChainSources<'s> for ServiceTypeSelector<'s> {
    fn into_source(self) -> &'s mut TypeSourceSelector {
        self.selector
    }
}

impl<'s> ChainClasses<'s> for ServiceTypeSelector<'s> {
    fn into_implementation(self) -> ImplementationTypeSelector<'s> {
        ImplementationTypeSelector::new(self.selector, self.source)
    }
}

/// 从生命周期选择回到服务类型选择
pub trait ChainServices<'s>: Sized {
    /// 取得当前实现类型的服务类型选择器
    fn into_services(self) -> ServiceTypeSelector<'s>;

    /// 注册为自身类型
    fn as_self(self) -> LifetimeSelector<'s> {
        self.into_services().as_self()
    }

    /// 注册为服务 `S`
    fn as_service<S: ?Sized + 'static>(self) -> LifetimeSelector<'s> {
        self.into_services().as_service::<S>()
    }

    /// 注册为指定的服务类型
    fn as_types<I>(self, service_types: I) -> LifetimeSelector<'s>
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        self.into_services().as_types(service_types)
    }

    /// 由函数为每个实现类型选择服务类型
    fn as_selected<F>(self, select: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeMetadata) -> Vec<TypeInfo> + 'static,
    {
        self.into_services().as_selected(select)
    }

    /// 注册为实现的所有服务
    fn as_implemented_services(self) -> LifetimeSelector<'s> {
        self.into_services().as_implemented_services()
    }

    /// 注册为实现的满足条件的服务
    fn as_implemented_services_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.into_services().as_implemented_services_where(predicate)
    }

    /// 注册为自身，并将实现的所有服务转发到自身注册
    fn as_self_with_services(self) -> LifetimeSelector<'s> {
        self.into_services().as_self_with_services()
    }

    /// 注册为自身，并将实现的满足条件的服务转发到自身注册
    fn as_self_with_services_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.into_services().as_self_with_services_where(predicate)
    }

    /// 注册为名称匹配的服务
    fn as_matching_service(self) -> LifetimeSelector<'s> {
        self.into_services().as_matching_service()
    }

    /// 注册为名称匹配且满足条件的服务
    fn as_matching_service_where<F>(self, predicate: F) -> LifetimeSelector<'s>
    where
        F: Fn(&TypeInfo) -> bool + 'static,
    {
        self.into_services().as_matching_service_where(predicate)
    }

    /// 按类型上的服务描述属性注册
    fn using_attributes(self) -> ServiceTypeSelector<'s> {
        self.into_services().using_attributes()
    }

    /// 设置注册策略
    fn using_registration_strategy<R>(self, strategy: R) -> ServiceTypeSelector<'s>
    where
        R: RegistrationStrategy + 'static,
    {
        self.into_services().using_registration_strategy(strategy)
    }
}

impl ServiceSelection {
    /// 为实现类型生成描述符
    fn descriptors(
        &self,
        metadata: &TypeMetadata,
        lifetime: Lifetime,
    ) -> RegistrationResult<Vec<ServiceDescriptor>> {
        let self_type = metadata.type_info;
        match self {
            Self::SelfType => Ok(vec![metadata.describe(&self_type, lifetime)?]),
            Self::Types(service_types) => describe_all(metadata, service_types, lifetime),
            Self::Selected(select) => describe_all(metadata, &select(metadata), lifetime),
            Self::ImplementedServices(predicate) => {
                let service_types: Vec<TypeInfo> =
                    metadata.service_types().filter(|s| predicate(s)).collect();
                describe_all(metadata, &service_types, lifetime)
            }
            Self::SelfWithServices(predicate) => {
                let mut descriptors = vec![metadata.describe(&self_type, lifetime)?];
                for service_type in metadata.service_types().filter(|s| predicate(s)) {
                    descriptors.push(metadata.describe_forwarded(&service_type, lifetime)?);
                }
                Ok(descriptors)
            }
            Self::MatchingService(predicate) => {
                let service_types: Vec<TypeInfo> = metadata
                    .service_types()
                    .filter(|s| is_matching_service(metadata.short_name(), s.short_name()))
                    .filter(|s| predicate(s))
                    .collect();
                describe_all(metadata, &service_types, lifetime)
            }
            Self::Attributes => attribute_descriptors(metadata),
        }
    }
}

fn describe_all(
    metadata: &TypeMetadata,
    service_types: &[TypeInfo],
    lifetime: Lifetime,
) -> RegistrationResult<Vec<ServiceDescriptor>> {
    service_types
        .iter()
        .map(|service_type| metadata.describe(service_type, lifetime))
        .collect()
}

/// 按服务描述属性生成描述符
///
/// 未指定服务类型的属性注册为自身及实现的所有服务。
fn attribute_descriptors(metadata: &TypeMetadata) -> RegistrationResult<Vec<ServiceDescriptor>> {
    let mut seen: HashSet<Option<TypeInfo>> = HashSet::new();
    if metadata
        .descriptors
        .iter()
        .any(|attribute| !seen.insert(attribute.service_type))
    {
        return Err(RegistrationError::DuplicateDescriptorAttribute {
            implementation_type: metadata.type_info.name.to_string(),
        });
    }

    let mut descriptors = Vec::new();
    for DescriptorAttribute {
        service_type,
        lifetime,
    } in &metadata.descriptors
    {
        match service_type {
            Some(service_type) => descriptors.push(metadata.describe(service_type, *lifetime)?),
            None => {
                descriptors.push(metadata.describe(&metadata.type_info, *lifetime)?);
                for service_type in metadata.service_types() {
                    descriptors.push(metadata.describe(&service_type, *lifetime)?);
                }
            }
        }
    }
    Ok(descriptors)
}

impl ClassSelection {
    /// 按注册策略写入服务集合，返回写入的描述符数量
    pub(crate) fn populate(self, services: &mut ServiceCollection) -> RegistrationResult<usize> {
        let strategy: Box<dyn RegistrationStrategy> =
            self.strategy.unwrap_or_else(|| Box::new(Append));
        let registrations = if self.registrations.is_empty() {
            vec![RegistrationSelection {
                services: ServiceSelection::SelfType,
                lifetime: LifetimeSelection::default(),
            }]
        } else {
            self.registrations
        };

        let mut written = 0;
        for registration in &registrations {
            for metadata in &self.types {
                let lifetime = registration.lifetime.resolve(metadata);
                for descriptor in registration.services.descriptors(metadata, lifetime)? {
                    debug!(
                        "注册服务: {} -> {} ({})",
                        descriptor.service_type, metadata.type_info, descriptor.lifetime
                    );
                    strategy.apply(services, descriptor)?;
                    written += 1;
                }
            }
        }
        Ok(written)
    }
}
