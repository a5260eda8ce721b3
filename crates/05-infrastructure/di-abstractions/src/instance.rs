//! 类型擦除的服务实例

use di_common::{ResolveError, ResolveResult, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 服务实例
///
/// 内部保存 `Arc<S>`，`S` 可以是具体类型也可以是 `dyn Trait`。
#[derive(Clone)]
pub struct Instance {
    service_type: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// 以服务类型 `S` 包装实例
    pub fn new<S>(service: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        Self {
            service_type: TypeInfo::of::<S>(),
            value: Arc::new(service),
        }
    }

    /// 实例对应的服务类型
    pub fn service_type(&self) -> TypeInfo {
        self.service_type
    }

    /// 检查实例是否为服务类型 `S`
    pub fn is<S>(&self) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.value.is::<Arc<S>>()
    }

    /// 转换为服务类型 `S`
    pub fn downcast<S>(&self) -> ResolveResult<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.value
            .downcast_ref::<Arc<S>>()
            .cloned()
            .ok_or_else(|| ResolveError::DowncastFailed {
                expected: std::any::type_name::<S>().to_string(),
                actual: self.service_type.name.to_string(),
            })
    }

    /// 两个实例是否指向同一份存储
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("service_type", &self.service_type.name)
            .finish_non_exhaustive()
    }
}
