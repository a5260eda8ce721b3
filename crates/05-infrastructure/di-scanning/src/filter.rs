//! 实现类型筛选器
//!
//! 条件之间为“与”关系。命名空间匹配按模块边界做前缀匹配，
//! `exact` 系列要求模块路径完全相同。

use di_abstractions::TypeMetadata;
use di_common::{is_in_exact_namespace, is_in_namespace, GenericDefinition, TypeInfo};
use std::any::Any;

type TypePredicate = Box<dyn Fn(&TypeMetadata) -> bool>;

/// 实现类型筛选器
#[derive(Default)]
pub struct TypeFilter {
    predicates: Vec<TypePredicate>,
}

impl TypeFilter {
    /// 创建不含条件的筛选器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加任意条件
    pub fn where_type<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TypeMetadata) -> bool + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// 可作为服务 `S` 使用
    pub fn assignable_to<S: ?Sized + 'static>(self) -> Self {
        self.assignable_to_type(TypeInfo::of::<S>())
    }

    /// 可作为指定服务类型使用
    pub fn assignable_to_type(self, service_type: TypeInfo) -> Self {
        self.where_type(move |metadata| metadata.is_assignable_to(&service_type))
    }

    /// 自身或任一服务属于泛型定义
    pub fn assignable_to_generic(self, definition: GenericDefinition) -> Self {
        self.where_type(move |metadata| metadata.is_assignable_to_generic(&definition))
    }

    /// 可作为任一服务类型使用
    pub fn assignable_to_any<I>(self, service_types: I) -> Self
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        let service_types: Vec<TypeInfo> = service_types.into_iter().collect();
        self.where_type(move |metadata| {
            service_types
                .iter()
                .any(|service_type| metadata.is_assignable_to(service_type))
        })
    }

    /// 携带属性 `A`
    pub fn with_attribute<A: Any + Send + Sync>(self) -> Self {
        self.with_attribute_where::<A, _>(|_| true)
    }

    /// 携带满足条件的属性 `A`
    pub fn with_attribute_where<A, F>(self, predicate: F) -> Self
    where
        A: Any + Send + Sync,
        F: Fn(&A) -> bool + 'static,
    {
        self.where_type(move |metadata| metadata.attributes_of::<A>().any(|a| predicate(a)))
    }

    /// 不携带属性 `A`
    pub fn without_attribute<A: Any + Send + Sync>(self) -> Self {
        self.without_attribute_where::<A, _>(|_| true)
    }

    /// 不携带满足条件的属性 `A`
    pub fn without_attribute_where<A, F>(self, predicate: F) -> Self
    where
        A: Any + Send + Sync,
        F: Fn(&A) -> bool + 'static,
    {
        self.where_type(move |metadata| !metadata.attributes_of::<A>().any(|a| predicate(a)))
    }

    /// 位于 `T` 所在模块或其子模块
    pub fn in_namespace_of<T: ?Sized + 'static>(self) -> Self {
        self.in_namespaces([TypeInfo::of::<T>().namespace()])
    }

    /// 位于任一模块或其子模块
    pub fn in_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = collect_namespaces(namespaces);
        self.where_type(move |metadata| {
            namespaces
                .iter()
                .any(|namespace| is_in_namespace(metadata.namespace(), namespace))
        })
    }

    /// 恰好位于 `T` 所在模块
    pub fn in_exact_namespace_of<T: ?Sized + 'static>(self) -> Self {
        self.in_exact_namespaces([TypeInfo::of::<T>().namespace()])
    }

    /// 恰好位于任一模块
    pub fn in_exact_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = collect_namespaces(namespaces);
        self.where_type(move |metadata| {
            namespaces
                .iter()
                .any(|namespace| is_in_exact_namespace(metadata.namespace(), namespace))
        })
    }

    /// 不在 `T` 所在模块及其子模块
    pub fn not_in_namespace_of<T: ?Sized + 'static>(self) -> Self {
        self.not_in_namespaces([TypeInfo::of::<T>().namespace()])
    }

    /// 不在任一模块及其子模块
    pub fn not_in_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = collect_namespaces(namespaces);
        self.where_type(move |metadata| {
            !namespaces
                .iter()
                .any(|namespace| is_in_namespace(metadata.namespace(), namespace))
        })
    }

    /// 检查类型是否满足所有条件
    pub fn matches(&self, metadata: &TypeMetadata) -> bool {
        self.predicates.iter().all(|predicate| predicate(metadata))
    }
}

fn collect_namespaces<I, S>(namespaces: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    namespaces.into_iter().map(Into::into).collect()
}
