//! 约定规范定义
//!
//! 提供类型名称拆分、命名空间匹配和服务命名约定。运行时扫描与编译期
//! 代码生成共用这些规则，保证两者的筛选结果一致。

/// 类型名称的组成部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNameParts<'a> {
    /// 不含泛型参数的路径
    pub path: &'a str,
    /// 顶层泛型参数
    pub arguments: Vec<&'a str>,
}

/// 拆分类型名称
///
/// 去掉 `dyn ` 前缀和附加约束（`+ Send + Sync`），再拆出顶层泛型参数。
///
/// ```
/// use di_common::split_type_name;
///
/// let parts = split_type_name("dyn app::Repository<app::User, alloc::vec::Vec<u8>> + Send");
/// assert_eq!(parts.path, "app::Repository");
/// assert_eq!(parts.arguments, vec!["app::User", "alloc::vec::Vec<u8>"]);
/// ```
pub fn split_type_name(name: &str) -> TypeNameParts<'_> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_prefix("dyn ").unwrap_or(trimmed);
    let head = split_top_level(trimmed, '+')
        .into_iter()
        .next()
        .unwrap_or(trimmed)
        .trim();

    let Some(open) = head.find('<') else {
        return TypeNameParts {
            path: head,
            arguments: Vec::new(),
        };
    };

    let close = head.rfind('>').unwrap_or(head.len());
    let inner = if close > open { &head[open + 1..close] } else { "" };
    let arguments = split_top_level(inner, ',')
        .into_iter()
        .map(str::trim)
        .filter(|argument| !argument.is_empty())
        .collect();

    TypeNameParts {
        path: head[..open].trim(),
        arguments,
    }
}

/// 按分隔符拆分，忽略尖括号、圆括号与方括号内部的分隔符
fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in input.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// 获取路径所在的命名空间（去掉最后一段）
pub fn namespace_of(path: &str) -> &str {
    path.rsplit_once("::").map_or("", |(namespace, _)| namespace)
}

/// 检查命名空间是否位于目标命名空间之内（包括子模块）
///
/// 匹配必须落在 `::` 边界上：`app::order` 不属于 `app::ord`。
pub fn is_in_namespace(namespace: &str, target: &str) -> bool {
    namespace == target
        || (namespace.starts_with(target) && namespace[target.len()..].starts_with("::"))
}

/// 检查命名空间是否与目标命名空间完全相同
pub fn is_in_exact_namespace(namespace: &str, target: &str) -> bool {
    namespace == target
}

/// 检查服务名称是否与实现名称匹配
///
/// 约定：服务 `Foo` 匹配实现 `Foo`、`FooImpl` 与 `DefaultFoo`。
pub fn is_matching_service(implementation_name: &str, service_name: &str) -> bool {
    if service_name.is_empty() {
        return false;
    }
    implementation_name == service_name
        || implementation_name.strip_suffix("Impl") == Some(service_name)
        || implementation_name.strip_prefix("Default") == Some(service_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_path() {
        let parts = split_type_name("app::services::Mailer");
        assert_eq!(parts.path, "app::services::Mailer");
        assert!(parts.arguments.is_empty());
    }

    #[test]
    fn test_split_nested_generics() {
        let parts = split_type_name("app::Cache<alloc::sync::Arc<dyn app::Store + Send>, (u8, u16)>");
        assert_eq!(parts.path, "app::Cache");
        assert_eq!(
            parts.arguments,
            vec!["alloc::sync::Arc<dyn app::Store + Send>", "(u8, u16)"]
        );
    }

    #[test]
    fn test_namespace_membership() {
        assert!(is_in_namespace("app::orders", "app"));
        assert!(is_in_namespace("app::orders", "app::orders"));
        assert!(is_in_namespace("app::orders::internal", "app::orders"));
        assert!(!is_in_namespace("app::ordersx", "app::orders"));
        assert!(!is_in_namespace("app", "app::orders"));

        assert!(is_in_exact_namespace("app::orders", "app::orders"));
        assert!(!is_in_exact_namespace("app::orders::internal", "app::orders"));
    }

    #[test]
    fn test_namespace_of() {
        assert_eq!(namespace_of("app::orders::OrderService"), "app::orders");
        assert_eq!(namespace_of("OrderService"), "");
    }

    #[test]
    fn test_matching_service() {
        assert!(is_matching_service("Mailer", "Mailer"));
        assert!(is_matching_service("MailerImpl", "Mailer"));
        assert!(is_matching_service("DefaultMailer", "Mailer"));
        assert!(!is_matching_service("SmtpMailer", "Mailer"));
        assert!(!is_matching_service("Mailer", ""));
    }
}
