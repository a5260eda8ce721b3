//! 服务生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 整个应用生命周期内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Transient
    }
}

impl Lifetime {
    /// 返回两个生命周期中存活时间较短的一个
    ///
    /// 组合服务依赖多个实现时使用，避免长生命周期实例捕获短生命周期实例。
    pub fn shortest(self, other: Self) -> Self {
        self.max(other)
    }

    /// 小写名称，与配置文件中的写法一致
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务作用域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: uuid::Uuid,
    pub name: String,
}

impl Scope {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", self.name, name.into()))
    }
}
