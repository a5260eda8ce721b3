//! 服务解析器抽象接口
//!
//! 装饰、聚合与适配生成的工厂通过此接口取得原始服务

use crate::instance::Instance;
use di_common::{ResolveResult, TypeInfo};
use std::sync::Arc;

/// 服务解析器 trait
pub trait ServiceProvider: Send + Sync {
    /// 解析服务类型的最后一个注册
    fn get_instance(&self, service_type: &TypeInfo) -> ResolveResult<Instance>;

    /// 按注册顺序解析服务类型的所有注册
    fn get_all_instances(&self, service_type: &TypeInfo) -> ResolveResult<Vec<Instance>>;

    /// 检查服务类型是否已注册
    fn is_registered(&self, service_type: &TypeInfo) -> bool;
}

/// 强类型解析扩展
pub trait ServiceProviderExt {
    /// 解析服务
    fn get<S>(&self) -> ResolveResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static;

    /// 解析服务，未注册时返回 `None`
    fn try_get<S>(&self) -> ResolveResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static;

    /// 解析服务的所有注册
    fn get_all<S>(&self) -> ResolveResult<Vec<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static;
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {
    fn get<S>(&self) -> ResolveResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.get_instance(&TypeInfo::of::<S>())?.downcast::<S>()
    }

    fn try_get<S>(&self) -> ResolveResult<Option<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let service_type = TypeInfo::of::<S>();
        if !self.is_registered(&service_type) {
            return Ok(None);
        }
        self.get_instance(&service_type)?.downcast::<S>().map(Some)
    }

    fn get_all<S>(&self) -> ResolveResult<Vec<Arc<S>>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.get_all_instances(&TypeInfo::of::<S>())?
            .iter()
            .map(Instance::downcast::<S>)
            .collect()
    }
}
