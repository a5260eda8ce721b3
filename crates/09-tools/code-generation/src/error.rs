//! 代码生成错误类型

use di_common::RegistrationError;
use std::path::PathBuf;
use thiserror::Error;

/// 源码扫描错误类型
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("读取文件失败: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("解析源文件失败: {path}: {source}")]
    Parse {
        path: PathBuf,
        source: syn::Error,
    },

    #[error("找不到 crate 根文件 (lib.rs 或 main.rs): {path}")]
    MissingRoot { path: PathBuf },

    #[error("扫描计划格式错误: {0}")]
    Plan(#[from] toml::de::Error),

    #[error("缺少环境变量: {name}")]
    MissingEnv { name: &'static str },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ScanError {
    /// 创建文件读写错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 创建源文件解析错误
    pub fn parse(path: impl Into<PathBuf>, source: syn::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// 结果类型别名
pub type ScanResult<T> = Result<T, ScanError>;
