//! 服务适配
//!
//! 追加一个目标服务注册，解析时取得当前的源服务并转换为目标服务。
//! 生命周期与源服务的最后一个注册相同。

use di_abstractions::{ServiceCollection, ServiceDescriptor, ServiceProvider, ServiceProviderExt};
use di_common::{RegistrationError, RegistrationResult, ResolveResult, TypeInfo};
use std::sync::Arc;
use tracing::info;

/// 服务集合的适配扩展
pub trait AdaptExt {
    /// 将服务 `S` 适配为服务 `T`，返回 `S` 是否已注册
    fn try_adapt<S, T, F>(&mut self, adapt: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<T>> + Send + Sync + 'static;

    /// 将服务 `S` 适配为服务 `T`，`S` 未注册时报错
    fn adapt<S, T, F>(&mut self, adapt: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<T>> + Send + Sync + 'static;
}

impl AdaptExt for ServiceCollection {
    fn try_adapt<S, T, F>(&mut self, adapt: F) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<T>> + Send + Sync + 'static,
    {
        let source = TypeInfo::of::<S>();
        let Some(lifetime) = self
            .positions_of(&source)
            .last()
            .and_then(|position| self.get(*position))
            .map(|descriptor| descriptor.lifetime)
        else {
            return false;
        };

        self.add(ServiceDescriptor::factory::<T, _>(
            lifetime,
            move |provider: &dyn ServiceProvider| -> ResolveResult<Arc<T>> {
                adapt(provider.get::<S>()?, provider)
            },
        ));
        info!("适配服务: {} -> {} ({})", source, TypeInfo::of::<T>(), lifetime);
        true
    }

    fn adapt<S, T, F>(&mut self, adapt: F) -> RegistrationResult<&mut Self>
    where
        S: ?Sized + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<T>> + Send + Sync + 'static,
    {
        if self.try_adapt::<S, T, F>(adapt) {
            Ok(self)
        } else {
            Err(RegistrationError::missing(TypeInfo::of::<S>().name))
        }
    }
}
