//! 解析器配置

use serde::Deserialize;

/// 默认最大解析深度
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 100;

/// 解析器配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// 最大解析深度，用于发现循环依赖
    pub max_resolution_depth: usize,
    /// 根作用域名称
    pub root_scope_name: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            root_scope_name: "root".to_string(),
        }
    }
}

impl ProviderOptions {
    /// 设置最大解析深度
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}
