//! 类型目录
//!
//! 扫描的类型来源。`#[injectable]` 宏在程序启动时把类型登记到全局目录，
//! 也可以手动构建目录用于测试或隔离扫描。

use crate::reflection::{Reflect, TypeMetadata};
use di_common::TypeInfo;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// 全局类型目录
static GLOBAL_TYPE_CATALOG: once_cell::sync::Lazy<parking_lot::RwLock<TypeCatalog>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(TypeCatalog::new()));

/// 登记类型到全局目录
pub fn register_type(metadata: TypeMetadata) {
    GLOBAL_TYPE_CATALOG.write().add(metadata);
}

/// 获取全局目录快照
pub fn global_catalog() -> TypeCatalog {
    GLOBAL_TYPE_CATALOG.read().clone()
}

/// 类型目录
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<Arc<TypeMetadata>>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加类型，同一类型重复添加时覆盖旧记录
    pub fn add(&mut self, metadata: TypeMetadata) -> &mut Self {
        let metadata = Arc::new(metadata);
        match self
            .types
            .iter()
            .position(|existing| existing.type_info == metadata.type_info)
        {
            Some(index) => self.types[index] = metadata,
            None => {
                debug!("登记类型: {}", metadata.type_info);
                self.types.push(metadata);
            }
        }
        self
    }

    /// 添加可反射类型
    pub fn add_reflected<T: Reflect>(&mut self) -> &mut Self {
        self.add(T::type_metadata())
    }

    /// 查找类型
    pub fn get(&self, type_info: &TypeInfo) -> Option<Arc<TypeMetadata>> {
        self.types
            .iter()
            .find(|metadata| metadata.type_info == *type_info)
            .cloned()
    }

    /// 所有类型
    pub fn all(&self) -> Vec<Arc<TypeMetadata>> {
        self.types.clone()
    }

    /// 目录中出现的 crate 名称
    pub fn crates(&self) -> BTreeSet<&'static str> {
        self.types.iter().map(|metadata| metadata.crate_name()).collect()
    }

    /// 指定 crate 中的类型
    pub fn from_crate(&self, crate_name: &str) -> Vec<Arc<TypeMetadata>> {
        self.from_crates_where(|name| name == crate_name)
    }

    /// 与 `T` 位于同一 crate 的类型
    pub fn from_crate_of<T: ?Sized + 'static>(&self) -> Vec<Arc<TypeMetadata>> {
        self.from_crate(TypeInfo::of::<T>().crate_name())
    }

    /// 多个 crate 中的类型
    pub fn from_crates<I, S>(&self, crate_names: I) -> Vec<Arc<TypeMetadata>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: BTreeSet<String> = crate_names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        self.from_crates_where(|name| names.contains(name))
    }

    /// 满足条件的 crate 中的类型
    pub fn from_crates_where<F>(&self, predicate: F) -> Vec<Arc<TypeMetadata>>
    where
        F: Fn(&str) -> bool,
    {
        self.types
            .iter()
            .filter(|metadata| predicate(metadata.crate_name()))
            .cloned()
            .collect()
    }

    /// 类型数量
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 遍历类型
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<TypeMetadata>> {
        self.types.iter()
    }
}
