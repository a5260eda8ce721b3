//! 服务装饰
//!
//! 将匹配装饰策略的注册原位替换为新工厂：新工厂先按原注册创建实例，
//! 再交给装饰函数包装。生命周期保持不变，重复装饰会层层叠加。

pub mod generic;
pub mod strategy;

pub use generic::{GenericDecorator, GenericDecoratorTable, OpenGenericDecoration};
pub use strategy::{decorate_fn, ClosedTypeDecoration, DecorateFn, DecorationStrategy};

use di_abstractions::{
    Implementation, Instance, InstanceFactory, ServiceCollection, ServiceDescriptor,
    ServiceProvider,
};
use di_common::{RegistrationError, RegistrationResult, ResolveResult};
use std::sync::Arc;
use tracing::{debug, info};

/// 装饰器类型
///
/// ```ignore
/// struct LoggingMailer {
///     inner: Arc<dyn Mailer>,
/// }
///
/// impl Decorator<dyn Mailer> for LoggingMailer {
///     fn decorate(inner: Arc<dyn Mailer>, _: &dyn ServiceProvider) -> ResolveResult<Arc<dyn Mailer>> {
///         Ok(Arc::new(Self { inner }) as Arc<dyn Mailer>)
///     }
/// }
/// ```
pub trait Decorator<S>: 'static
where
    S: ?Sized + Send + Sync + 'static,
{
    /// 包装原服务实例
    fn decorate(inner: Arc<S>, provider: &dyn ServiceProvider) -> ResolveResult<Arc<S>>;
}

/// 按装饰策略替换所有匹配的注册，返回是否有注册被装饰
pub fn decorate_descriptors(
    services: &mut ServiceCollection,
    strategy: &dyn DecorationStrategy,
) -> bool {
    let mut decorated = 0;
    for index in 0..services.len() {
        let Some(original) = services.get(index).cloned() else {
            continue;
        };
        let Some(decorate) = strategy.decorator_for(&original.service_type) else {
            continue;
        };

        let service_type = original.service_type;
        let lifetime = original.lifetime;
        let factory: InstanceFactory = Arc::new(
            move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
                decorate(original.create_instance(provider)?, provider)
            },
        );

        debug!("装饰服务注册 #{}: {}", index, service_type);
        services.replace_at(
            index,
            ServiceDescriptor::new(service_type, lifetime, Implementation::Factory(factory)),
        );
        decorated += 1;
    }

    if decorated > 0 {
        info!("装饰 {} 完成，共 {} 个注册", strategy.target(), decorated);
    }
    decorated > 0
}

/// 服务集合的装饰扩展
pub trait DecorateExt {
    /// 按装饰策略装饰，返回是否有注册被装饰
    fn try_decorate_using(&mut self, strategy: &dyn DecorationStrategy) -> bool;

    /// 按装饰策略装饰，没有匹配的注册时报错
    fn decorate_using(&mut self, strategy: &dyn DecorationStrategy) -> RegistrationResult<&mut Self>;

    /// 使用装饰器类型 `D` 装饰服务 `S`
    fn decorate<S, D>(&mut self) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        D: Decorator<S>,
    {
        self.decorate_using(&ClosedTypeDecoration::new::<S, _>(D::decorate))
    }

    /// 使用装饰器类型 `D` 装饰服务 `S`，返回是否有注册被装饰
    fn try_decorate<S, D>(&mut self) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        D: Decorator<S>,
    {
        self.try_decorate_using(&ClosedTypeDecoration::new::<S, _>(D::decorate))
    }

    /// 使用装饰函数装饰服务 `S`
    fn decorate_with<S, F>(&mut self, decorate: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        self.decorate_using(&ClosedTypeDecoration::new::<S, _>(decorate))
    }

    /// 使用装饰函数装饰服务 `S`，返回是否有注册被装饰
    fn try_decorate_with<S, F>(&mut self, decorate: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        self.try_decorate_using(&ClosedTypeDecoration::new::<S, _>(decorate))
    }

    /// 使用只依赖原实例的装饰函数装饰服务 `S`
    fn decorate_with_inner<S, F>(&mut self, decorate: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>) -> Arc<S> + Send + Sync + 'static,
    {
        self.decorate_with::<S, _>(move |inner: Arc<S>, _: &dyn ServiceProvider| -> ResolveResult<Arc<S>> {
            Ok(decorate(inner))
        })
    }

    /// 使用只依赖原实例的装饰函数装饰服务 `S`，返回是否有注册被装饰
    fn try_decorate_with_inner<S, F>(&mut self, decorate: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>) -> Arc<S> + Send + Sync + 'static,
    {
        self.try_decorate_with::<S, _>(move |inner: Arc<S>, _: &dyn ServiceProvider| -> ResolveResult<Arc<S>> {
            Ok(decorate(inner))
        })
    }

    /// 装饰泛型定义下所有可封闭的服务
    fn decorate_open_generic<G>(&mut self, decorator: G) -> RegistrationResult<&mut Self>
    where
        G: GenericDecorator,
    {
        self.decorate_using(&OpenGenericDecoration::new(decorator))
    }

    /// 装饰泛型定义下所有可封闭的服务，返回是否有注册被装饰
    fn try_decorate_open_generic<G>(&mut self, decorator: G) -> bool
    where
        G: GenericDecorator,
    {
        self.try_decorate_using(&OpenGenericDecoration::new(decorator))
    }
}

impl DecorateExt for ServiceCollection {
    fn try_decorate_using(&mut self, strategy: &dyn DecorationStrategy) -> bool {
        decorate_descriptors(self, strategy)
    }

    fn decorate_using(&mut self, strategy: &dyn DecorationStrategy) -> RegistrationResult<&mut Self> {
        if decorate_descriptors(self, strategy) {
            Ok(self)
        } else {
            Err(RegistrationError::missing(strategy.target()))
        }
    }
}
