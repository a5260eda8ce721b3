//! 源码模型
//!
//! 解析得到的类型与运行时 `TypeMetadata` 一一对应：限定路径以 crate 名开头，
//! 与 `std::any::type_name` 的结果一致，因此命名空间筛选在两端得到相同结果。

use di_common::{is_in_exact_namespace, is_in_namespace, namespace_of, Lifetime};
use std::fmt;
use std::path::PathBuf;

/// 类型引用
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// 限定路径（`scan_demo::infra::SystemClock`），不含泛型参数
    pub path: String,
    /// 生成代码中使用的路径（`crate::infra::SystemClock`）
    pub code_path: String,
    /// 泛型参数的代码形式
    pub arguments: Vec<String>,
    /// 是否为 trait object 服务（`dyn Trait`）
    pub object: bool,
}

impl TypeRef {
    /// 简短名称
    pub fn short_name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// 所在模块路径
    pub fn namespace(&self) -> &str {
        namespace_of(&self.path)
    }

    /// 泛型参数个数
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// 生成代码使用的完整类型
    pub fn to_code(&self) -> String {
        let mut code = String::new();
        if self.object {
            code.push_str("dyn ");
        }
        code.push_str(&self.code_path);
        if !self.arguments.is_empty() {
            code.push('<');
            code.push_str(&self.arguments.join(", "));
            code.push('>');
        }
        code
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.object {
            f.write_str("dyn ")?;
        }
        f.write_str(&self.path)?;
        if !self.arguments.is_empty() {
            write!(f, "<{}>", self.arguments.join(", "))?;
        }
        Ok(())
    }
}

/// `descriptor(...)` 声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// 服务类型，缺省为自身及所有服务
    pub service: Option<TypeRef>,
    /// 生命周期
    pub lifetime: Lifetime,
}

/// 源码中的结构体
#[derive(Debug, Clone)]
pub struct SourceType {
    /// 类型引用
    pub type_ref: TypeRef,
    /// 所在文件
    pub file: PathBuf,
    /// 是否为公开类型
    pub is_public: bool,
    /// 是否带泛型参数
    pub is_generic: bool,
    /// 是否实现了 `Injectable`
    pub is_injectable: bool,
    /// 实现的服务
    pub services: Vec<TypeRef>,
    /// 属性值的类型路径（限定路径）
    pub attributes: Vec<String>,
    /// 服务描述属性
    pub descriptors: Vec<SourceDescriptor>,
}

impl SourceType {
    /// 简短名称
    pub fn short_name(&self) -> &str {
        self.type_ref.short_name()
    }

    /// 所在模块路径
    pub fn namespace(&self) -> &str {
        self.type_ref.namespace()
    }

    /// 添加服务，已存在时忽略
    pub fn add_service(&mut self, service: TypeRef) {
        if !self.services.contains(&service) {
            self.services.push(service);
        }
    }

    /// 是否可以作为服务使用（自身或实现的服务）
    pub fn is_assignable_to(&self, service: &TypeRef) -> bool {
        *service == self.type_ref || self.services.contains(service)
    }

    /// 查找满足条件的自身或服务
    pub fn find_service<F>(&self, predicate: F) -> Option<&TypeRef>
    where
        F: Fn(&TypeRef) -> bool,
    {
        std::iter::once(&self.type_ref)
            .chain(self.services.iter())
            .find(|candidate| predicate(candidate))
    }

    /// 是否携带属性类型
    pub fn has_attribute(&self, path: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute == path)
    }

    /// 是否位于模块或其子模块
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        is_in_namespace(self.namespace(), namespace)
    }

    /// 是否恰好位于模块
    pub fn is_in_exact_namespace(&self, namespace: &str) -> bool {
        is_in_exact_namespace(self.namespace(), namespace)
    }
}

/// 解析得到的 crate
#[derive(Debug, Clone, Default)]
pub struct SourceCrate {
    /// crate 名称（下划线形式）
    pub name: String,
    /// 按模块树顺序排列的结构体
    pub types: Vec<SourceType>,
}

impl SourceCrate {
    /// 按限定路径查找类型
    pub fn get(&self, path: &str) -> Option<&SourceType> {
        self.types.iter().find(|ty| ty.type_ref.path == path)
    }

    /// 将 `crate::` 开头的路径转换为限定路径，并去掉 `dyn` 前缀
    pub fn qualify(&self, path: &str) -> String {
        let path = path.trim();
        let path = path.strip_prefix("dyn ").unwrap_or(path).trim();
        match path.strip_prefix("crate::") {
            Some(rest) => format!("{}::{rest}", self.name),
            None if path == "crate" => self.name.clone(),
            None => path.to_string(),
        }
    }

    /// 将限定路径转换为代码形式（本 crate 的路径以 `crate::` 开头）
    pub fn to_code_path(&self, path: &str) -> String {
        let prefix = format!("{}::", self.name);
        match path.strip_prefix(&prefix) {
            Some(rest) => format!("crate::{rest}"),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(path: &str, arguments: &[&str]) -> TypeRef {
        TypeRef {
            path: format!("demo::{path}"),
            code_path: format!("crate::{path}"),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            object: true,
        }
    }

    #[test]
    fn test_type_ref_rendering() {
        let repository = service("store::Repository", &["crate::model::User"]);
        assert_eq!(repository.short_name(), "Repository");
        assert_eq!(repository.namespace(), "demo::store");
        assert_eq!(repository.to_code(), "dyn crate::store::Repository<crate::model::User>");
        assert_eq!(
            repository.to_string(),
            "dyn demo::store::Repository<crate::model::User>"
        );
    }

    #[test]
    fn test_qualify_paths() {
        let source = SourceCrate {
            name: "demo".to_string(),
            types: Vec::new(),
        };
        assert_eq!(source.qualify("dyn crate::infra::Clock"), "demo::infra::Clock");
        assert_eq!(source.qualify("demo::infra"), "demo::infra");
        assert_eq!(source.to_code_path("demo::infra::Clock"), "crate::infra::Clock");
        assert_eq!(source.to_code_path("std::fmt::Debug"), "std::fmt::Debug");
    }
}
