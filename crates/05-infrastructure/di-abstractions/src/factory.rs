//! 实例工厂抽象接口

use crate::instance::Instance;
use crate::resolver::ServiceProvider;
use di_common::ResolveResult;
use std::sync::Arc;

/// 可注入类型 trait
///
/// 容器通过 `construct` 创建实例，依赖从解析器中取得。
/// 通常由 `#[derive(Injectable)]` 生成。
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 使用解析器构建实例
    fn construct(provider: &dyn ServiceProvider) -> ResolveResult<Self>;
}

/// 实例工厂函数类型
pub type InstanceFactory =
    Arc<dyn Fn(&dyn ServiceProvider) -> ResolveResult<Instance> + Send + Sync>;

/// 包装强类型工厂
pub fn typed_factory<S, F>(factory: F) -> InstanceFactory
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
{
    Arc::new(move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
        factory(provider).map(Instance::new::<S>)
    })
}

/// 为 `T` 生成构造工厂，构造后转换为服务类型 `S`
pub fn injectable_factory<S, T>(cast: fn(Arc<T>) -> Arc<S>) -> InstanceFactory
where
    S: ?Sized + Send + Sync + 'static,
    T: Injectable,
{
    Arc::new(move |provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
        let instance = Arc::new(T::construct(provider)?);
        Ok(Instance::new::<S>(cast(instance)))
    })
}
