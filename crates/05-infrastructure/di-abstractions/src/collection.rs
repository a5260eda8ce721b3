//! 服务集合
//!
//! 容器消费的有序描述符列表。同一服务类型可以注册多次，
//! 解析单个服务时以最后一个注册为准。

use crate::descriptor::ServiceDescriptor;
use crate::factory::Injectable;
use crate::resolver::ServiceProvider;
use di_common::{Lifetime, ResolveResult, TypeInfo};
use std::sync::Arc;

/// 服务集合
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加描述符
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// 服务类型未注册时追加，返回是否追加
    pub fn try_add(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains_service(&descriptor.service_type) {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    /// 在指定位置插入描述符
    pub fn insert(&mut self, index: usize, descriptor: ServiceDescriptor) {
        self.descriptors.insert(index, descriptor);
    }

    /// 移除指定位置的描述符
    pub fn remove_at(&mut self, index: usize) -> ServiceDescriptor {
        self.descriptors.remove(index)
    }

    /// 替换指定位置的描述符，返回原描述符
    pub fn replace_at(&mut self, index: usize, descriptor: ServiceDescriptor) -> ServiceDescriptor {
        std::mem::replace(&mut self.descriptors[index], descriptor)
    }

    /// 保留满足条件的描述符
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&ServiceDescriptor) -> bool,
    {
        self.descriptors.retain(predicate);
    }

    /// 移除服务类型的所有注册，返回移除数量
    pub fn remove_all(&mut self, service_type: &TypeInfo) -> usize {
        let before = self.descriptors.len();
        self.descriptors
            .retain(|descriptor| descriptor.service_type != *service_type);
        before - self.descriptors.len()
    }

    /// 检查服务类型是否已注册
    pub fn contains_service(&self, service_type: &TypeInfo) -> bool {
        self.descriptors
            .iter()
            .any(|descriptor| descriptor.service_type == *service_type)
    }

    /// 检查服务 `S` 是否已注册
    pub fn contains<S: ?Sized + 'static>(&self) -> bool {
        self.contains_service(&TypeInfo::of::<S>())
    }

    /// 查找第一个满足条件的位置
    pub fn position<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&ServiceDescriptor) -> bool,
    {
        self.descriptors.iter().position(predicate)
    }

    /// 服务类型所有注册的位置
    pub fn positions_of(&self, service_type: &TypeInfo) -> Vec<usize> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.service_type == *service_type)
            .map(|(index, _)| index)
            .collect()
    }

    /// 获取指定位置的描述符
    pub fn get(&self, index: usize) -> Option<&ServiceDescriptor> {
        self.descriptors.get(index)
    }

    /// 所有描述符
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// 遍历描述符
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 注册单例实例
    pub fn add_instance<S>(&mut self, instance: Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::instance(instance))
    }

    /// 注册单例工厂
    pub fn add_singleton<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::singleton(factory))
    }

    /// 注册作用域工厂
    pub fn add_scoped<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::scoped(factory))
    }

    /// 注册瞬时工厂
    pub fn add_transient<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceProvider) -> ResolveResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::transient(factory))
    }

    /// 以自身类型注册可注入类型
    pub fn add_type<T: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self {
        self.add(ServiceDescriptor::of_type::<T>(lifetime))
    }

    /// 以服务 `S` 注册实现 `T`
    pub fn add_implementation<S, T>(&mut self, lifetime: Lifetime, cast: fn(Arc<T>) -> Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        self.add(ServiceDescriptor::implementation(lifetime, cast))
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl Extend<ServiceDescriptor> for ServiceCollection {
    fn extend<I: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: I) {
        self.descriptors.extend(iter);
    }
}
