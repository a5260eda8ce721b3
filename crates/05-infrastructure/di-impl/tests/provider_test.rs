//! 参考解析器的集成测试

use di_abstractions::{
    Injectable, ResolveError, ResolveResult, ServiceCollection, ServiceDescriptor,
    ServiceProvider, ServiceProviderExt,
};
use di_common::Lifetime;
use di_impl::{ProviderOptions, ServiceProviderImpl};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Greeter: std::fmt::Debug + Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Debug)]
struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Debug)]
struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

impl Injectable for English {
    fn construct(_: &dyn ServiceProvider) -> ResolveResult<Self> {
        Ok(Self)
    }
}

/// 依赖 Greeter 的服务
struct Reception {
    greeter: Arc<dyn Greeter>,
}

impl Injectable for Reception {
    fn construct(provider: &dyn ServiceProvider) -> ResolveResult<Self> {
        Ok(Self {
            greeter: provider.get::<dyn Greeter>()?,
        })
    }
}

#[test]
fn test_last_registration_wins() {
    let mut services = ServiceCollection::new();
    services
        .add_instance::<dyn Greeter>(Arc::new(English))
        .add_instance::<dyn Greeter>(Arc::new(French));

    let provider = ServiceProviderImpl::from_collection(&services);
    assert_eq!(provider.get::<dyn Greeter>().unwrap().greet(), "bonjour");

    let all: Vec<String> = provider
        .get_all::<dyn Greeter>()
        .unwrap()
        .iter()
        .map(|greeter| greeter.greet())
        .collect();
    assert_eq!(all, vec!["hello", "bonjour"]);
}

#[test]
fn test_singleton_is_shared_across_scopes() {
    let mut services = ServiceCollection::new();
    services.add_implementation::<dyn Greeter, English>(Lifetime::Singleton, |english| {
        english as Arc<dyn Greeter>
    });

    let provider = ServiceProviderImpl::from_collection(&services);
    let scope = provider.create_scope();

    let first = provider.get::<dyn Greeter>().unwrap();
    let second = scope.get::<dyn Greeter>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_scoped_instances_are_per_scope() {
    let mut services = ServiceCollection::new();
    services.add_type::<English>(Lifetime::Scoped);

    let provider = ServiceProviderImpl::from_collection(&services);
    let scope = provider.create_scope();
    let other = provider.create_scope();

    let a = scope.get::<English>().unwrap();
    let b = scope.get::<English>().unwrap();
    let c = other.get::<English>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_ne!(scope.scope().id, other.scope().id);
}

#[test]
fn test_transient_creates_each_time() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);

    let mut services = ServiceCollection::new();
    services.add_transient::<dyn Greeter, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(English) as Arc<dyn Greeter>)
    });

    let provider = ServiceProviderImpl::from_collection(&services);
    provider.get::<dyn Greeter>().unwrap();
    provider.get::<dyn Greeter>().unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dependencies_are_resolved() {
    let mut services = ServiceCollection::new();
    services
        .add_instance::<dyn Greeter>(Arc::new(French))
        .add_type::<Reception>(Lifetime::Transient);

    let provider = ServiceProviderImpl::from_collection(&services);
    assert_eq!(provider.get::<Reception>().unwrap().greeter.greet(), "bonjour");
}

#[test]
fn test_missing_service() {
    let provider = ServiceProviderImpl::from_collection(&ServiceCollection::new());

    assert!(matches!(
        provider.get::<dyn Greeter>(),
        Err(ResolveError::ServiceNotRegistered { .. })
    ));
    assert!(provider.try_get::<dyn Greeter>().unwrap().is_none());
    assert!(provider.get_all::<dyn Greeter>().unwrap().is_empty());
}

#[test]
fn test_cycle_hits_depth_limit() {
    let mut services = ServiceCollection::new();
    services.add(ServiceDescriptor::transient::<dyn Greeter, _>(
        |provider: &dyn ServiceProvider| provider.get::<dyn Greeter>(),
    ));

    let provider = ServiceProviderImpl::build(
        &services,
        ProviderOptions::default().with_max_resolution_depth(16),
    );

    let error = provider.get::<dyn Greeter>().unwrap_err();
    assert!(matches!(
        error,
        ResolveError::ResolutionDepthExceeded { max_depth: 16, .. }
    ));

    // 深度在失败后恢复
    let mut healthy = ServiceCollection::new();
    healthy.add_instance::<dyn Greeter>(Arc::new(English));
    let provider = ServiceProviderImpl::build(
        &healthy,
        ProviderOptions::default().with_max_resolution_depth(1),
    );
    assert_eq!(provider.get::<dyn Greeter>().unwrap().greet(), "hello");
}
