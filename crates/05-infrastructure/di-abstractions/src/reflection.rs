//! 类型反射记录
//!
//! Rust 没有运行时反射，可扫描类型通过 [`TypeMetadata`] 显式描述自身：
//! 可转换到哪些服务、携带哪些属性值、声明了哪些服务描述属性。
//! 通常由 `#[injectable]` 宏生成。

use crate::descriptor::{Implementation, ServiceDescriptor};
use crate::factory::{injectable_factory, Injectable, InstanceFactory};
use crate::instance::Instance;
use crate::resolver::ServiceProvider;
use di_common::{
    GenericDefinition, Lifetime, RegistrationError, RegistrationResult, ResolveResult, TypeInfo,
};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 实例向上转换函数类型
pub type UpcastFn = Arc<dyn Fn(&Instance) -> ResolveResult<Instance> + Send + Sync>;

/// 服务绑定：实现类型可以作为某个服务类型使用
#[derive(Clone)]
pub struct ServiceBinding {
    /// 服务类型
    pub service_type: TypeInfo,
    upcast: UpcastFn,
}

impl ServiceBinding {
    /// 创建 `T` 到服务 `S` 的绑定
    pub fn of<T, S>(cast: fn(Arc<T>) -> Arc<S>) -> Self
    where
        T: Send + Sync + 'static,
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            service_type: TypeInfo::of::<S>(),
            upcast: Arc::new(move |instance: &Instance| -> ResolveResult<Instance> {
                Ok(Instance::new::<S>(cast(instance.downcast::<T>()?)))
            }),
        }
    }

    /// 自身绑定
    pub fn identity(type_info: TypeInfo) -> Self {
        Self {
            service_type: type_info,
            upcast: Arc::new(|instance: &Instance| -> ResolveResult<Instance> { Ok(instance.clone()) }),
        }
    }

    /// 将实现实例转换为服务实例
    pub fn upcast(&self, instance: &Instance) -> ResolveResult<Instance> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceBinding")
            .field("service_type", &self.service_type.name)
            .finish_non_exhaustive()
    }
}

/// 类型上的属性值
#[derive(Clone)]
pub struct AttributeValue {
    /// 属性类型
    pub type_info: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl AttributeValue {
    /// 创建属性值
    pub fn new<A: Any + Send + Sync>(value: A) -> Self {
        Self {
            type_info: TypeInfo::of::<A>(),
            value: Arc::new(value),
        }
    }

    /// 是否为属性类型 `A`
    pub fn is<A: Any + Send + Sync>(&self) -> bool {
        self.value.is::<A>()
    }

    /// 以属性类型 `A` 读取
    pub fn downcast_ref<A: Any + Send + Sync>(&self) -> Option<&A> {
        self.value.downcast_ref::<A>()
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValue")
            .field("type_info", &self.type_info.name)
            .finish_non_exhaustive()
    }
}

/// 服务描述属性
///
/// `service_type` 为空时表示注册为自身及其实现的所有服务。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorAttribute {
    /// 服务类型
    pub service_type: Option<TypeInfo>,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl DescriptorAttribute {
    /// 创建服务描述属性
    pub fn new(service_type: Option<TypeInfo>, lifetime: Lifetime) -> Self {
        Self {
            service_type,
            lifetime,
        }
    }
}

/// 可反射类型 trait
pub trait Reflect: Injectable {
    /// 获取类型反射记录
    fn type_metadata() -> TypeMetadata;
}

/// 类型反射记录
#[derive(Clone)]
pub struct TypeMetadata {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 是否为公开类型
    pub is_public: bool,
    /// 实现的服务（不含自身）
    pub services: Vec<ServiceBinding>,
    /// 属性值
    pub attributes: Vec<AttributeValue>,
    /// 服务描述属性
    pub descriptors: Vec<DescriptorAttribute>,
    constructor: InstanceFactory,
}

impl TypeMetadata {
    /// 创建反射记录构建器
    pub fn builder<T: Injectable>() -> TypeMetadataBuilder<T> {
        TypeMetadataBuilder::new()
    }

    /// 简短类型名称
    pub fn short_name(&self) -> &'static str {
        self.type_info.short_name()
    }

    /// 所在模块路径
    pub fn namespace(&self) -> &'static str {
        self.type_info.namespace()
    }

    /// 所在 crate
    pub fn crate_name(&self) -> &'static str {
        self.type_info.crate_name()
    }

    /// 构造实例（服务类型为自身）
    pub fn construct(&self, provider: &dyn ServiceProvider) -> ResolveResult<Instance> {
        (self.constructor)(provider)
    }

    /// 构造工厂
    pub fn constructor(&self) -> InstanceFactory {
        self.constructor.clone()
    }

    /// 实现的服务类型（不含自身）
    pub fn service_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.services.iter().map(|binding| binding.service_type)
    }

    /// 查找到服务类型的绑定，自身类型返回恒等绑定
    pub fn binding_for(&self, service_type: &TypeInfo) -> Option<ServiceBinding> {
        if *service_type == self.type_info {
            return Some(ServiceBinding::identity(self.type_info));
        }
        self.services
            .iter()
            .find(|binding| binding.service_type == *service_type)
            .cloned()
    }

    /// 是否可以作为服务类型使用
    pub fn is_assignable_to(&self, service_type: &TypeInfo) -> bool {
        *service_type == self.type_info
            || self.services.iter().any(|binding| binding.service_type == *service_type)
    }

    /// 自身或任一服务是否属于泛型定义
    pub fn is_assignable_to_generic(&self, definition: &GenericDefinition) -> bool {
        definition.matches(&self.type_info)
            || self.services.iter().any(|binding| definition.matches(&binding.service_type))
    }

    /// 是否携带属性类型
    pub fn has_attribute(&self, attribute_type: &TypeInfo) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.type_info == *attribute_type)
    }

    /// 读取属性类型 `A` 的所有值
    pub fn attributes_of<A: Any + Send + Sync>(&self) -> impl Iterator<Item = &A> + '_ {
        self.attributes.iter().filter_map(AttributeValue::downcast_ref::<A>)
    }

    /// 为服务类型生成描述符
    ///
    /// 每次解析都重新构造实现类型并转换为服务类型。
    pub fn describe(
        &self,
        service_type: &TypeInfo,
        lifetime: Lifetime,
    ) -> RegistrationResult<ServiceDescriptor> {
        let binding = self.binding_for(service_type).ok_or_else(|| {
            RegistrationError::not_assignable(self.type_info.name, service_type.name)
        })?;
        let constructor = self.constructor.clone();
        let factory: InstanceFactory = Arc::new(
            move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
                binding.upcast(&constructor(provider)?)
            },
        );

        Ok(ServiceDescriptor::new(
            *service_type,
            lifetime,
            Implementation::Type {
                implementation_type: self.type_info,
                factory,
            },
        ))
    }

    /// 为服务类型生成转发描述符：解析自身注册后转换为服务类型
    ///
    /// 自身注册为单例时，所有转发的服务共享同一实例。
    pub fn describe_forwarded(
        &self,
        service_type: &TypeInfo,
        lifetime: Lifetime,
    ) -> RegistrationResult<ServiceDescriptor> {
        let binding = self.binding_for(service_type).ok_or_else(|| {
            RegistrationError::not_assignable(self.type_info.name, service_type.name)
        })?;
        let self_type = self.type_info;
        let factory: InstanceFactory = Arc::new(
            move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
                binding.upcast(&provider.get_instance(&self_type)?)
            },
        );

        Ok(ServiceDescriptor::new(
            *service_type,
            lifetime,
            Implementation::Factory(factory),
        ))
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("type_info", &self.type_info.name)
            .field("is_public", &self.is_public)
            .field("services", &self.services)
            .field("attributes", &self.attributes)
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// 类型反射记录构建器
pub struct TypeMetadataBuilder<T: Injectable> {
    is_public: bool,
    services: Vec<ServiceBinding>,
    attributes: Vec<AttributeValue>,
    descriptors: Vec<DescriptorAttribute>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> TypeMetadataBuilder<T> {
    fn new() -> Self {
        Self {
            is_public: true,
            services: Vec::new(),
            attributes: Vec::new(),
            descriptors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 设置是否为公开类型
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// 声明实现的服务
    pub fn implements<S>(mut self, cast: fn(Arc<T>) -> Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let binding = ServiceBinding::of::<T, S>(cast);
        if !self.services.iter().any(|b| b.service_type == binding.service_type) {
            self.services.push(binding);
        }
        self
    }

    /// 添加属性值
    pub fn attribute<A: Any + Send + Sync>(mut self, value: A) -> Self {
        self.attributes.push(AttributeValue::new(value));
        self
    }

    /// 添加服务描述属性
    pub fn descriptor(mut self, service_type: Option<TypeInfo>, lifetime: Lifetime) -> Self {
        self.descriptors
            .push(DescriptorAttribute::new(service_type, lifetime));
        self
    }

    /// 添加服务 `S` 的描述属性
    pub fn descriptor_for<S: ?Sized + 'static>(self, lifetime: Lifetime) -> Self {
        self.descriptor(Some(TypeInfo::of::<S>()), lifetime)
    }

    /// 构建反射记录
    pub fn build(self) -> TypeMetadata {
        TypeMetadata {
            type_info: TypeInfo::of::<T>(),
            is_public: self.is_public,
            services: self.services,
            attributes: self.attributes,
            descriptors: self.descriptors,
            constructor: injectable_factory::<T, T>(|instance| instance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceProviderExt;

    trait Mailer: Send + Sync {
        fn send(&self) -> &'static str;
    }

    trait Audited: Send + Sync {}

    #[derive(Debug)]
    struct SmtpMailer;

    impl Mailer for SmtpMailer {
        fn send(&self) -> &'static str {
            "smtp"
        }
    }

    impl Injectable for SmtpMailer {
        fn construct(_: &dyn ServiceProvider) -> ResolveResult<Self> {
            Ok(Self)
        }
    }

    struct Transactional {
        timeout: u32,
    }

    struct NullProvider;

    impl ServiceProvider for NullProvider {
        fn get_instance(&self, service_type: &TypeInfo) -> ResolveResult<Instance> {
            Err(di_common::ResolveError::not_registered(service_type.name))
        }

        fn get_all_instances(&self, _: &TypeInfo) -> ResolveResult<Vec<Instance>> {
            Ok(Vec::new())
        }

        fn is_registered(&self, _: &TypeInfo) -> bool {
            false
        }
    }

    fn metadata() -> TypeMetadata {
        TypeMetadata::builder::<SmtpMailer>()
            .implements::<dyn Mailer>(|mailer| mailer as Arc<dyn Mailer>)
            .attribute(Transactional { timeout: 30 })
            .descriptor_for::<dyn Mailer>(Lifetime::Scoped)
            .build()
    }

    #[test]
    fn test_assignability() {
        let metadata = metadata();
        assert!(metadata.is_assignable_to(&TypeInfo::of::<SmtpMailer>()));
        assert!(metadata.is_assignable_to(&TypeInfo::of::<dyn Mailer>()));
        assert!(!metadata.is_assignable_to(&TypeInfo::of::<dyn Audited>()));
        assert_eq!(metadata.service_types().count(), 1);
    }

    #[test]
    fn test_attributes() {
        let metadata = metadata();
        assert!(metadata.has_attribute(&TypeInfo::of::<Transactional>()));
        let timeouts: Vec<u32> = metadata
            .attributes_of::<Transactional>()
            .map(|attribute| attribute.timeout)
            .collect();
        assert_eq!(timeouts, vec![30]);
    }

    #[test]
    fn test_describe_creates_service_instance() {
        let descriptor = metadata()
            .describe(&TypeInfo::of::<dyn Mailer>(), Lifetime::Singleton)
            .unwrap();
        assert_eq!(descriptor.implementation_type(), Some(TypeInfo::of::<SmtpMailer>()));

        let instance = descriptor.create_instance(&NullProvider).unwrap();
        assert_eq!(instance.downcast::<dyn Mailer>().unwrap().send(), "smtp");
    }

    #[test]
    fn test_describe_rejects_foreign_service() {
        let error = metadata()
            .describe(&TypeInfo::of::<dyn Audited>(), Lifetime::Singleton)
            .unwrap_err();
        assert!(matches!(error, RegistrationError::NotAssignable { .. }));
    }

    #[test]
    fn test_forwarded_descriptor_resolves_self_registration() {
        let descriptor = metadata()
            .describe_forwarded(&TypeInfo::of::<dyn Mailer>(), Lifetime::Singleton)
            .unwrap();
        assert_eq!(descriptor.implementation_type(), None);
        assert!(NullProvider.try_get::<SmtpMailer>().unwrap().is_none());
        assert!(descriptor.create_instance(&NullProvider).is_err());
    }
}
