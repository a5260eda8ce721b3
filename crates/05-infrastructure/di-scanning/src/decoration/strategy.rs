//! 装饰策略

use di_abstractions::{Instance, ServiceProvider};
use di_common::{ResolveResult, TypeInfo};
use std::sync::Arc;

/// 类型擦除的装饰函数
pub type DecorateFn =
    Arc<dyn Fn(Instance, &dyn ServiceProvider) -> ResolveResult<Instance> + Send + Sync>;

/// 将强类型装饰函数转换为 [`DecorateFn`]
pub fn decorate_fn<S, F>(decorate: F) -> DecorateFn
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
{
    Arc::new(
        move |instance: Instance, provider: &dyn ServiceProvider| -> ResolveResult<Instance> {
            let inner = instance.downcast::<S>()?;
            decorate(inner, provider).map(Instance::new::<S>)
        },
    )
}

/// 装饰策略 trait
pub trait DecorationStrategy {
    /// 装饰目标的名称，用于日志与错误信息
    fn target(&self) -> String;

    /// 获取服务类型的装饰函数，返回 `None` 表示不装饰
    fn decorator_for(&self, service_type: &TypeInfo) -> Option<DecorateFn>;
}

/// 封闭类型装饰策略：只装饰一个确定的服务类型
#[derive(Clone)]
pub struct ClosedTypeDecoration {
    service_type: TypeInfo,
    decorate: DecorateFn,
}

impl ClosedTypeDecoration {
    /// 为服务 `S` 创建装饰策略
    pub fn new<S, F>(decorate: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::from_fn(TypeInfo::of::<S>(), decorate_fn(decorate))
    }

    /// 由类型擦除的装饰函数创建
    pub fn from_fn(service_type: TypeInfo, decorate: DecorateFn) -> Self {
        Self {
            service_type,
            decorate,
        }
    }
}

impl DecorationStrategy for ClosedTypeDecoration {
    fn target(&self) -> String {
        self.service_type.name.to_string()
    }

    fn decorator_for(&self, service_type: &TypeInfo) -> Option<DecorateFn> {
        (*service_type == self.service_type).then(|| self.decorate.clone())
    }
}
