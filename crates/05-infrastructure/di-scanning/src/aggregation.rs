//! 服务聚合
//!
//! 将服务的所有注册合并为一个组合注册。组合注册放在第一个原注册的位置，
//! 生命周期取原注册中存活时间最短的一个；原实现在创建组合实例时按注册顺序创建。

use di_abstractions::{
    Implementation, Instance, InstanceFactory, ServiceCollection, ServiceDescriptor,
    ServiceProvider,
};
use di_common::{Lifetime, RegistrationError, RegistrationResult, ResolveResult, TypeInfo};
use std::sync::Arc;
use tracing::info;

/// 服务集合的聚合扩展
pub trait AggregateExt {
    /// 聚合服务 `S` 的所有注册，返回是否存在注册
    fn try_aggregate<S, F>(&mut self, compose: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Vec<Arc<S>>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static;

    /// 聚合服务 `S` 的所有注册，服务未注册时报错
    fn aggregate<S, F>(&mut self, compose: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Vec<Arc<S>>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static;
}

impl AggregateExt for ServiceCollection {
    fn try_aggregate<S, F>(&mut self, compose: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Vec<Arc<S>>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        let service_type = TypeInfo::of::<S>();
        let positions = self.positions_of(&service_type);
        let Some(&first) = positions.first() else {
            return false;
        };

        let originals: Vec<ServiceDescriptor> = positions
            .iter()
            .filter_map(|position| self.get(*position).cloned())
            .collect();
        let lifetime = originals
            .iter()
            .map(|descriptor| descriptor.lifetime)
            .fold(Lifetime::Singleton, Lifetime::shortest);
        let count = originals.len();

        let factory: InstanceFactory = Arc::new(
            move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
                let parts = originals
                    .iter()
                    .map(|descriptor| descriptor.create_instance(provider)?.downcast::<S>())
                    .collect::<ResolveResult<Vec<Arc<S>>>>()?;
                compose(parts, provider).map(Instance::new::<S>)
            },
        );

        self.remove_all(&service_type);
        self.insert(
            first,
            ServiceDescriptor::new(service_type, lifetime, Implementation::Factory(factory)),
        );
        info!("聚合 {} 个注册: {} ({})", count, service_type, lifetime);
        true
    }

    fn aggregate<S, F>(&mut self, compose: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Vec<Arc<S>>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        if self.try_aggregate::<S, F>(compose) {
            Ok(self)
        } else {
            Err(RegistrationError::missing(TypeInfo::of::<S>().name))
        }
    }
}
