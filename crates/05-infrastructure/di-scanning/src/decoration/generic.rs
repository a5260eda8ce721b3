//! 开放泛型装饰
//!
//! Rust 运行时只存在封闭泛型。开放泛型装饰器声明一个泛型定义，
//! 对属于该定义的每个已注册服务类型尝试封闭；封闭失败（相当于泛型约束
//! 不满足）的注册保持不变。

use super::strategy::{decorate_fn, DecorateFn, DecorationStrategy};
use di_abstractions::ServiceProvider;
use di_common::{GenericDefinition, ResolveResult, TypeInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 开放泛型装饰器
pub trait GenericDecorator {
    /// 要装饰的泛型定义
    fn definition(&self) -> GenericDefinition;

    /// 为封闭服务类型生成装饰函数，约束不满足时返回 `None`
    fn close(&self, service_type: &TypeInfo) -> Option<DecorateFn>;
}

/// 开放泛型装饰策略
pub struct OpenGenericDecoration<G> {
    decorator: G,
    definition: GenericDefinition,
}

impl<G: GenericDecorator> OpenGenericDecoration<G> {
    /// 创建开放泛型装饰策略
    pub fn new(decorator: G) -> Self {
        let definition = decorator.definition();
        Self {
            decorator,
            definition,
        }
    }
}

impl<G: GenericDecorator> DecorationStrategy for OpenGenericDecoration<G> {
    fn target(&self) -> String {
        self.definition.to_string()
    }

    fn decorator_for(&self, service_type: &TypeInfo) -> Option<DecorateFn> {
        if !self.definition.matches(service_type) {
            return None;
        }
        let decorate = self.decorator.close(service_type);
        if decorate.is_none() {
            debug!("无法封闭 {}，跳过: {}", self.definition, service_type);
        }
        decorate
    }
}

/// 按封闭类型登记装饰函数的开放泛型装饰器
///
/// ```ignore
/// let table = GenericDecoratorTable::new(GenericDefinition::of::<dyn Repository<()>>())
///     .with::<dyn Repository<User>, _>(|inner, _| Ok(Arc::new(Audited::new(inner)) as Arc<dyn Repository<User>>))
///     .with::<dyn Repository<Order>, _>(|inner, _| Ok(Arc::new(Audited::new(inner)) as Arc<dyn Repository<Order>>));
/// services.decorate_open_generic(table)?;
/// ```
#[derive(Clone)]
pub struct GenericDecoratorTable {
    definition: GenericDefinition,
    closed: HashMap<TypeInfo, DecorateFn>,
}

impl GenericDecoratorTable {
    /// 为泛型定义创建空表
    pub fn new(definition: GenericDefinition) -> Self {
        Self {
            definition,
            closed: HashMap::new(),
        }
    }

    /// 登记封闭服务 `S` 的装饰函数
    pub fn with<S, F>(mut self, decorate: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<S>, &dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        let service_type = TypeInfo::of::<S>();
        if !self.definition.matches(&service_type) {
            warn!("{} 不属于泛型定义 {}", service_type, self.definition);
        }
        self.closed.insert(service_type, decorate_fn(decorate));
        self
    }

    /// 已登记的封闭类型数量
    pub fn len(&self) -> usize {
        self.closed.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }
}

impl GenericDecorator for GenericDecoratorTable {
    fn definition(&self) -> GenericDefinition {
        self.definition.clone()
    }

    fn close(&self, service_type: &TypeInfo) -> Option<DecorateFn> {
        self.closed.get(service_type).cloned()
    }
}
