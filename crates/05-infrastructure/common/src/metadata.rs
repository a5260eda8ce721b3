//! 元数据定义
//!
//! 提供类型与泛型定义的元数据信息

use crate::conventions::{namespace_of, split_type_name};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性只由 [`TypeId`] 决定，`name` 仅用于展示和命名空间计算。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称（`std::any::type_name` 的结果）
    pub name: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 不含泛型参数与 `dyn` 前缀的类型路径
    pub fn path(&self) -> &'static str {
        split_type_name(self.name).path
    }

    /// 获取简短的类型名称（不包含模块路径与泛型参数）
    pub fn short_name(&self) -> &'static str {
        let path = self.path();
        path.rsplit("::").next().unwrap_or(path)
    }

    /// 类型所在的模块路径
    pub fn namespace(&self) -> &'static str {
        namespace_of(self.path())
    }

    /// 类型所在的 crate 名称
    pub fn crate_name(&self) -> &'static str {
        let path = self.path();
        path.split("::").next().unwrap_or(path)
    }

    /// 是否为 trait object
    pub fn is_trait_object(&self) -> bool {
        self.name.starts_with("dyn ")
    }

    /// 获取泛型定义，非泛型类型返回 `None`
    pub fn generic_definition(&self) -> Option<GenericDefinition> {
        let parts = split_type_name(self.name);
        if parts.arguments.is_empty() {
            return None;
        }
        Some(GenericDefinition::new(parts.path, parts.arguments.len()))
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 泛型定义
///
/// Rust 在运行时只存在封闭泛型，开放泛型以“路径 + 参数个数”表示，
/// 例如 `dyn app::Repository<app::User>` 的定义为 `app::Repository` / 1。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericDefinition {
    /// 不含泛型参数的类型路径
    pub path: String,
    /// 泛型参数个数
    pub arity: usize,
}

impl GenericDefinition {
    /// 创建新的泛型定义
    pub fn new(path: impl Into<String>, arity: usize) -> Self {
        Self {
            path: path.into(),
            arity,
        }
    }

    /// 从一个封闭样例类型获取其泛型定义
    ///
    /// ```
    /// use di_common::GenericDefinition;
    ///
    /// struct Envelope<T>(T);
    ///
    /// let definition = GenericDefinition::of::<Envelope<()>>();
    /// assert_eq!(definition.arity, 1);
    /// assert!(definition.path.ends_with("Envelope"));
    /// ```
    pub fn of<T: ?Sized + 'static>() -> Self {
        let parts = split_type_name(std::any::type_name::<T>());
        Self::new(parts.path, parts.arguments.len())
    }

    /// 是否为泛型
    pub fn is_generic(&self) -> bool {
        self.arity > 0
    }

    /// 检查封闭类型是否属于此泛型定义
    pub fn matches(&self, type_info: &TypeInfo) -> bool {
        type_info.generic_definition().as_ref() == Some(self)
    }
}

impl fmt::Display for GenericDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placeholders = vec!["_"; self.arity].join(", ");
        write!(f, "{}<{}>", self.path, placeholders)
    }
}
