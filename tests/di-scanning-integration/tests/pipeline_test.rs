//! 扫描、装饰、聚合与适配的端到端测试
//!
//! 类型通过 `#[injectable]` 在启动时登记到全局类型目录，
//! 注册结果由参考解析器解析验证。

use component_macros::{injectable, Injectable};
use di_abstractions::{
    Reflect, ServiceCollection, ServiceProvider, ServiceProviderExt, TypeCatalog, TypeMetadata,
};
use di_common::{GenericDefinition, Lifetime, RegistrationError, ResolveResult};
use di_impl::ServiceProviderImpl;
use di_scanning::prelude::*;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

pub trait Farewell: Send + Sync {
    fn farewell(&self) -> String;
}

pub trait Repository<T>: Send + Sync {
    fn describe(&self) -> String;
}

pub struct User;
pub struct Order;

/// 预览功能标记
pub struct Preview;

pub mod greeting {
    use super::*;

    #[injectable(implements(dyn Greeter))]
    #[derive(Injectable)]
    pub struct EnglishGreeter;

    impl Greeter for EnglishGreeter {
        fn greet(&self, name: &str) -> String {
            format!("hello {name}")
        }
    }

    #[injectable(implements(dyn Greeter))]
    #[derive(Injectable)]
    pub struct FrenchGreeter;

    impl Greeter for FrenchGreeter {
        fn greet(&self, name: &str) -> String {
            format!("bonjour {name}")
        }
    }

    #[injectable(implements(dyn Greeter), attribute(Preview))]
    #[derive(Injectable)]
    pub struct PirateGreeter;

    impl Greeter for PirateGreeter {
        fn greet(&self, name: &str) -> String {
            format!("ahoy {name}")
        }
    }

    #[injectable(implements(dyn Greeter), private)]
    #[derive(Injectable)]
    pub struct SecretGreeter;

    impl Greeter for SecretGreeter {
        fn greet(&self, name: &str) -> String {
            format!("psst {name}")
        }
    }
}

pub mod counting {
    use super::*;

    #[injectable(implements(dyn Greeter))]
    #[derive(Injectable)]
    pub struct CountingGreeter {
        calls: AtomicUsize,
    }

    impl Greeter for CountingGreeter {
        fn greet(&self, name: &str) -> String {
            let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            format!("hi {name} #{calls}")
        }
    }
}

pub mod storage {
    use super::*;

    #[derive(Injectable)]
    pub struct MemoryRepository<T: 'static> {
        marker: PhantomData<fn() -> T>,
    }

    impl<T: 'static> Repository<T> for MemoryRepository<T> {
        fn describe(&self) -> String {
            format!("memory<{}>", std::any::type_name::<T>().rsplit("::").next().unwrap_or_default())
        }
    }

    impl Reflect for MemoryRepository<User> {
        fn type_metadata() -> TypeMetadata {
            TypeMetadata::builder::<Self>()
                .implements::<dyn Repository<User>>(|repository| repository as Arc<dyn Repository<User>>)
                .build()
        }
    }

    impl Reflect for MemoryRepository<Order> {
        fn type_metadata() -> TypeMetadata {
            TypeMetadata::builder::<Self>()
                .implements::<dyn Repository<Order>>(|repository| repository as Arc<dyn Repository<Order>>)
                .build()
        }
    }
}

use counting::CountingGreeter;
use greeting::{EnglishGreeter, FrenchGreeter};
use storage::MemoryRepository;

struct Polite {
    inner: Arc<dyn Greeter>,
}

impl Greeter for Polite {
    fn greet(&self, name: &str) -> String {
        format!("please, {}", self.inner.greet(name))
    }
}

struct Chorus {
    voices: Vec<Arc<dyn Greeter>>,
}

impl Greeter for Chorus {
    fn greet(&self, name: &str) -> String {
        self.voices
            .iter()
            .map(|voice| voice.greet(name))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

struct GreetingFarewell {
    greeter: Arc<dyn Greeter>,
}

impl Farewell for GreetingFarewell {
    fn farewell(&self) -> String {
        format!("{} and goodbye", self.greeter.greet("all"))
    }
}

struct Fixed;

impl Greeter for Fixed {
    fn greet(&self, name: &str) -> String {
        format!("fixed {name}")
    }
}

/// 扫描问候模块中的公开问候实现
fn scan_greeters(services: &mut ServiceCollection) -> &mut ServiceCollection {
    services
        .scan(|scan| {
            scan.from_crate_of::<EnglishGreeter>()
                .add_classes_where(|classes| {
                    classes
                        .in_namespace_of::<EnglishGreeter>()
                        .assignable_to::<dyn Greeter>()
                        .without_attribute::<Preview>()
                })
                .as_implemented_services()
                .with_singleton_lifetime();
        })
        .unwrap()
}

fn sorted(mut lines: Vec<String>) -> Vec<String> {
    lines.sort();
    lines
}

#[test]
fn test_scan_global_catalog_with_filters() {
    let mut services = ServiceCollection::new();
    scan_greeters(&mut services);
    assert_eq!(services.len(), 2);

    let provider = ServiceProviderImpl::from_collection(&services);
    let greetings = provider
        .get_all::<dyn Greeter>()
        .unwrap()
        .iter()
        .map(|greeter| greeter.greet("ann"))
        .collect();
    assert_eq!(sorted(greetings), vec!["bonjour ann", "hello ann"]);
}

#[test]
fn test_non_public_classes_are_opt_in() {
    let mut services = ServiceCollection::new();
    services
        .scan(|scan| {
            scan.from_crate_of::<EnglishGreeter>()
                .add_classes_where_with(|classes| classes.in_namespace_of::<EnglishGreeter>(), false)
                .as_service::<dyn Greeter>();
        })
        .unwrap();

    assert_eq!(services.len(), 4);
    assert!(services.iter().all(|descriptor| descriptor.lifetime == Lifetime::Transient));
}

#[test]
fn test_self_with_services_shares_instance() {
    let mut services = ServiceCollection::new();
    services
        .scan(|scan| {
            scan.from_crate_of::<CountingGreeter>()
                .add_classes_where(|classes| classes.in_exact_namespace_of::<CountingGreeter>())
                .as_self_with_services()
                .with_singleton_lifetime();
        })
        .unwrap();

    let provider = ServiceProviderImpl::from_collection(&services);
    let concrete = provider.get::<CountingGreeter>().unwrap();
    let service = provider.get::<dyn Greeter>().unwrap();
    assert_eq!(concrete.greet("ann"), "hi ann #1");
    assert_eq!(service.greet("bob"), "hi bob #2");
}

#[test]
fn test_registration_strategies() {
    let mut skipped = ServiceCollection::new();
    skipped.add_instance::<dyn Greeter>(Arc::new(Fixed));
    skipped
        .scan(|scan| {
            scan.from_crate_of::<EnglishGreeter>()
                .add_classes_where(|classes| classes.in_namespace_of::<EnglishGreeter>())
                .using_registration_strategy(Skip)
                .as_service::<dyn Greeter>();
        })
        .unwrap();
    assert_eq!(skipped.len(), 1);

    let mut thrown = ServiceCollection::new();
    thrown.add_instance::<dyn Greeter>(Arc::new(Fixed));
    let result = thrown.scan(|scan| {
        scan.from_crate_of::<EnglishGreeter>()
            .add_classes_where(|classes| classes.in_namespace_of::<EnglishGreeter>())
            .using_registration_strategy(Throw)
            .as_service::<dyn Greeter>();
    });
    assert!(matches!(result, Err(RegistrationError::DuplicateTypeRegistration { .. })));

    let mut replaced = ServiceCollection::new();
    replaced.add_instance::<dyn Greeter>(Arc::new(Fixed));
    replaced
        .scan(|scan| {
            scan.from_crate_of::<EnglishGreeter>()
                .add_classes_where(|classes| classes.in_exact_namespace_of::<EnglishGreeter>())
                .using_registration_strategy(Replace::new(ReplacementBehavior::ServiceType))
                .as_service::<dyn Greeter>();
        })
        .unwrap();
    // 每次写入都会移除同一服务的已有注册，只保留最后一个
    assert_eq!(replaced.len(), 1);
    assert!(replaced.iter().all(|descriptor| descriptor.implementation_type().is_some()));
}

#[test]
fn test_decorate_then_aggregate() {
    let mut services = ServiceCollection::new();
    scan_greeters(&mut services)
        .decorate_with_inner::<dyn Greeter, _>(|inner| Arc::new(Polite { inner }) as Arc<dyn Greeter>)
        .unwrap()
        .aggregate::<dyn Greeter, _>(|voices, _| Ok(Arc::new(Chorus { voices }) as Arc<dyn Greeter>))
        .unwrap();

    assert_eq!(services.len(), 1);
    assert_eq!(services.get(0).map(|descriptor| descriptor.lifetime), Some(Lifetime::Singleton));

    let provider = ServiceProviderImpl::from_collection(&services);
    let chorus = provider.get::<dyn Greeter>().unwrap().greet("ann");
    let voices: Vec<String> = chorus.split(" / ").map(str::to_string).collect();
    assert_eq!(sorted(voices), vec!["please, bonjour ann", "please, hello ann"]);
}

#[test]
fn test_adapt_follows_source_lifetime() {
    let mut services = ServiceCollection::new();
    services
        .add_transient::<dyn Greeter, _>(|_| Ok(Arc::new(Fixed) as Arc<dyn Greeter>))
        .adapt::<dyn Greeter, dyn Farewell, _>(|greeter, _| {
            Ok(Arc::new(GreetingFarewell { greeter }) as Arc<dyn Farewell>)
        })
        .unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services.get(1).map(|descriptor| descriptor.lifetime), Some(Lifetime::Transient));

    let provider = ServiceProviderImpl::from_collection(&services);
    assert_eq!(
        provider.get::<dyn Farewell>().unwrap().farewell(),
        "fixed all and goodbye"
    );

    let mut empty = ServiceCollection::new();
    assert!(!empty.try_adapt::<dyn Greeter, dyn Farewell, _>(|greeter, _| {
        Ok(Arc::new(GreetingFarewell { greeter }) as Arc<dyn Farewell>)
    }));
    assert!(matches!(
        empty.adapt::<dyn Greeter, dyn Farewell, _>(|greeter, _| {
            Ok(Arc::new(GreetingFarewell { greeter }) as Arc<dyn Farewell>)
        }),
        Err(RegistrationError::MissingTypeRegistration { .. })
    ));
}

fn audited<T: 'static>(
    inner: Arc<dyn Repository<T>>,
    _: &dyn ServiceProvider,
) -> ResolveResult<Arc<dyn Repository<T>>> {
    let description = inner.describe();
    Ok(Arc::new(Audited { description, marker: PhantomData }) as Arc<dyn Repository<T>>)
}

struct Audited<T> {
    description: String,
    marker: PhantomData<fn() -> T>,
}

impl<T> Repository<T> for Audited<T> {
    fn describe(&self) -> String {
        format!("audited({})", self.description)
    }
}

#[test]
fn test_open_generic_decoration_of_scanned_repositories() {
    let mut catalog = TypeCatalog::new();
    catalog
        .add_reflected::<MemoryRepository<User>>()
        .add_reflected::<MemoryRepository<Order>>()
        .add_reflected::<FrenchGreeter>();

    let mut services = ServiceCollection::new();
    services
        .scan_catalog(&catalog, |scan| {
            scan.from_all_crates()
                .add_classes_where(|classes| {
                    classes.assignable_to_generic(GenericDefinition::of::<dyn Repository<()>>())
                })
                .as_implemented_services()
                .with_scoped_lifetime();
        })
        .unwrap()
        .decorate_open_generic(
            GenericDecoratorTable::new(GenericDefinition::of::<dyn Repository<()>>())
                .with::<dyn Repository<User>, _>(audited::<User>),
        )
        .unwrap();

    assert_eq!(services.len(), 2);

    let provider = ServiceProviderImpl::from_collection(&services).create_scope();
    assert_eq!(
        provider.get::<dyn Repository<User>>().unwrap().describe(),
        "audited(memory<User>)"
    );
    assert_eq!(
        provider.get::<dyn Repository<Order>>().unwrap().describe(),
        "memory<Order>"
    );
}
