//! 扫描计划
//!
//! 与运行时选择链使用相同的词汇：筛选条件、服务选择、生命周期与注册策略。
//! 类型与模块路径可以写成 `crate::a::B` 或以 crate 名开头的限定路径。
//!
//! ```toml
//! [[rules]]
//! strategy = { kind = "skip" }
//!
//! [rules.filter]
//! in_namespaces = ["crate::infra"]
//! assignable_to = ["crate::Clock"]
//!
//! [[rules.registrations]]
//! services = { kind = "implemented_services" }
//! lifetime = "singleton"
//! ```

use crate::error::{ScanError, ScanResult};
use di_common::Lifetime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 扫描计划
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanPlan {
    /// 按顺序执行的规则
    pub rules: Vec<ScanRule>,
}

impl ScanPlan {
    /// 创建空计划
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ScanResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> ScanResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// 添加规则
    pub fn rule(mut self, rule: ScanRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// 一条扫描规则，对应一次 `add_classes*` 选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanRule {
    /// 只选择公开类型
    pub public_only: bool,
    /// 类型筛选条件
    pub filter: FilterSpec,
    /// 服务选择及其生命周期，为空时注册为自身（瞬时）
    pub registrations: Vec<RegistrationSpec>,
    /// 注册策略
    pub strategy: StrategySpec,
}

impl Default for ScanRule {
    fn default() -> Self {
        Self {
            public_only: true,
            filter: FilterSpec::default(),
            registrations: Vec::new(),
            strategy: StrategySpec::default(),
        }
    }
}

impl ScanRule {
    /// 创建默认规则
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否只选择公开类型
    pub fn public_only(mut self, public_only: bool) -> Self {
        self.public_only = public_only;
        self
    }

    /// 可作为服务使用
    pub fn assignable_to(mut self, service: impl Into<String>) -> Self {
        self.filter.assignable_to.push(service.into());
        self
    }

    /// 可作为任一服务使用
    pub fn assignable_to_any<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter
            .assignable_to_any
            .push(services.into_iter().map(Into::into).collect());
        self
    }

    /// 自身或任一服务属于泛型定义
    pub fn assignable_to_generic(mut self, definition: impl Into<String>) -> Self {
        self.filter.assignable_to_generic.push(definition.into());
        self
    }

    /// 携带属性类型
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.filter.with_attribute.push(attribute.into());
        self
    }

    /// 不携带属性类型
    pub fn without_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.filter.without_attribute.push(attribute.into());
        self
    }

    /// 位于模块或其子模块
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.filter.in_namespaces.push(namespace.into());
        self
    }

    /// 恰好位于模块
    pub fn in_exact_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.filter.in_exact_namespaces.push(namespace.into());
        self
    }

    /// 不在模块及其子模块
    pub fn not_in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.filter.not_in_namespaces.push(namespace.into());
        self
    }

    /// 添加服务选择
    pub fn register(mut self, services: ServiceSpec, lifetime: Lifetime) -> Self {
        self.registrations.push(RegistrationSpec { services, lifetime });
        self
    }

    /// 设置注册策略
    pub fn strategy(mut self, strategy: StrategySpec) -> Self {
        self.strategy = strategy;
        self
    }
}

/// 类型筛选条件，各条件之间为“与”关系
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    /// 可作为每个服务使用
    pub assignable_to: Vec<String>,
    /// 每组中至少可作为一个服务使用
    pub assignable_to_any: Vec<Vec<String>>,
    /// 自身或任一服务属于每个泛型定义（`crate::Repository` 或 `crate::Repository<_>`）
    pub assignable_to_generic: Vec<String>,
    /// 携带每个属性类型
    pub with_attribute: Vec<String>,
    /// 不携带任一属性类型
    pub without_attribute: Vec<String>,
    /// 位于任一模块或其子模块
    pub in_namespaces: Vec<String>,
    /// 恰好位于任一模块
    pub in_exact_namespaces: Vec<String>,
    /// 不在任一模块及其子模块
    pub not_in_namespaces: Vec<String>,
}

/// 服务选择与生命周期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationSpec {
    /// 服务选择方式
    pub services: ServiceSpec,
    /// 生命周期
    #[serde(default)]
    pub lifetime: Lifetime,
}

/// 服务选择方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceSpec {
    /// 自身
    #[serde(rename = "self")]
    SelfType,
    /// 指定的服务类型
    Types {
        /// 服务类型
        types: Vec<String>,
    },
    /// 实现的所有服务
    ImplementedServices {
        /// 排除的服务类型
        #[serde(default)]
        exclude: Vec<String>,
    },
    /// 自身，以及转发到自身注册的所有服务
    SelfWithServices {
        /// 排除的服务类型
        #[serde(default)]
        exclude: Vec<String>,
    },
    /// 名称匹配的服务（`Foo` 匹配 `FooImpl`、`DefaultFoo`）
    MatchingService {
        /// 排除的服务类型
        #[serde(default)]
        exclude: Vec<String>,
    },
    /// 按 `descriptor(...)` 声明
    Attributes,
}

/// 注册策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    /// 总是追加
    #[default]
    Append,
    /// 已注册时跳过
    Skip,
    /// 已注册时报错
    Throw,
    /// 移除匹配的注册后追加
    Replace {
        /// 匹配方式
        #[serde(default)]
        behavior: ReplaceBehaviorSpec,
    },
}

/// 替换策略的匹配方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceBehaviorSpec {
    /// 服务类型相同
    #[default]
    ServiceType,
    /// 实现类型相同
    ImplementationType,
    /// 服务类型或实现类型相同
    All,
}
