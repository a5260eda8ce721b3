//! 构建脚本接口
//!
//! ```ignore
//! // build.rs
//! fn main() -> Result<(), di_codegen::ScanError> {
//!     di_codegen::Generator::from_env()?
//!         .plan_file("scan.toml")?
//!         .write_to_out_dir("registrations.rs")?;
//!     Ok(())
//! }
//! ```
//!
//! ```ignore
//! // src/lib.rs
//! include!(concat!(env!("OUT_DIR"), "/registrations.rs"));
//! ```

use crate::emitter::emit;
use crate::error::{ScanError, ScanResult};
use crate::model::SourceCrate;
use crate::parser::SourceParser;
use crate::plan::{ScanPlan, ScanRule};
use crate::selection::{select, Registration};
use std::path::{Path, PathBuf};
use tracing::info;

/// 生成结果
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    /// 生成的源码
    pub source: String,
    /// 生成的注册
    pub registrations: Vec<Registration>,
}

/// 注册代码生成器
#[derive(Debug, Clone)]
pub struct Generator {
    parser: SourceParser,
    plan: ScanPlan,
    plan_files: Vec<PathBuf>,
}

impl Generator {
    /// 为 crate 源码目录创建生成器
    pub fn new(crate_name: impl AsRef<str>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            parser: SourceParser::new(crate_name, source_dir),
            plan: ScanPlan::new(),
            plan_files: Vec::new(),
        }
    }

    /// 在构建脚本中使用 `CARGO_PKG_NAME` 与 `CARGO_MANIFEST_DIR/src` 创建生成器
    pub fn from_env() -> ScanResult<Self> {
        let name = std::env::var("CARGO_PKG_NAME").map_err(|_| ScanError::MissingEnv {
            name: "CARGO_PKG_NAME",
        })?;
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| ScanError::MissingEnv {
            name: "CARGO_MANIFEST_DIR",
        })?;
        Ok(Self::new(name, Path::new(&manifest_dir).join("src")))
    }

    /// 合并扫描计划
    pub fn plan(mut self, plan: ScanPlan) -> Self {
        self.plan.rules.extend(plan.rules);
        self
    }

    /// 从 TOML 文件合并扫描计划
    pub fn plan_file(mut self, path: impl AsRef<Path>) -> ScanResult<Self> {
        let path = path.as_ref();
        let plan = ScanPlan::from_file(path)?;
        self.plan_files.push(path.to_path_buf());
        Ok(self.plan(plan))
    }

    /// 添加规则
    pub fn rule(mut self, rule: ScanRule) -> Self {
        self.plan.rules.push(rule);
        self
    }

    /// 当前扫描计划
    pub fn scan_plan(&self) -> &ScanPlan {
        &self.plan
    }

    /// 解析源码
    pub fn parse(&self) -> ScanResult<SourceCrate> {
        self.parser.parse()
    }

    /// 生成注册代码
    pub fn generate(&self) -> ScanResult<GeneratedCode> {
        let source = self.parse()?;
        let registrations = select(&source, &self.plan)?;
        let code = emit(&registrations).map_err(|e| ScanError::parse(self.parser.source_dir(), e))?;
        info!(
            "生成注册代码: {} ({} 条规则, {} 个注册)",
            source.name,
            self.plan.rules.len(),
            registrations.len()
        );
        Ok(GeneratedCode {
            source: code,
            registrations,
        })
    }

    /// 生成注册代码并写入文件，内容未变化时不重写
    pub fn write_to(&self, path: impl AsRef<Path>) -> ScanResult<GeneratedCode> {
        let path = path.as_ref();
        let generated = self.generate()?;
        let unchanged = std::fs::read_to_string(path).is_ok_and(|existing| existing == generated.source);
        if !unchanged {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ScanError::io(parent, e))?;
            }
            std::fs::write(path, &generated.source).map_err(|e| ScanError::io(path, e))?;
        }
        Ok(generated)
    }

    /// 在构建脚本中写入 `OUT_DIR`，并输出 `rerun-if-changed` 指令
    pub fn write_to_out_dir(&self, file_name: &str) -> ScanResult<PathBuf> {
        let out_dir = std::env::var("OUT_DIR").map_err(|_| ScanError::MissingEnv { name: "OUT_DIR" })?;
        let path = Path::new(&out_dir).join(file_name);
        self.write_to(&path)?;

        println!("cargo:rerun-if-changed={}", self.parser.source_dir().display());
        for plan_file in &self.plan_files {
            println!("cargo:rerun-if-changed={}", plan_file.display());
        }
        Ok(path)
    }
}
