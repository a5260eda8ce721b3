//! # di-codegen
//!
//! 命令行入口：扫描 crate 源码并输出注册代码。

use anyhow::Context;
use clap::Parser;
use di_codegen::{Generator, ScanPlan};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "di-codegen")]
#[command(about = "扫描 crate 源码并生成服务注册代码")]
struct Args {
    /// crate 目录（包含 Cargo.toml 与 src/）
    #[arg(short, long, default_value = ".")]
    manifest_dir: PathBuf,

    /// crate 名称，缺省时读取 Cargo.toml 的 package.name
    #[arg(long)]
    crate_name: Option<String>,

    /// 扫描计划文件
    #[arg(short, long, default_value = "scan.toml")]
    plan: PathBuf,

    /// 输出文件，缺省时输出到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 只列出注册，不生成代码
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let crate_name = match args.crate_name {
        Some(name) => name,
        None => package_name(&args.manifest_dir)?,
    };
    let plan_path = args.manifest_dir.join(&args.plan);
    let plan = ScanPlan::from_file(&plan_path)
        .with_context(|| format!("加载扫描计划失败: {}", plan_path.display()))?;

    let generator = Generator::new(&crate_name, args.manifest_dir.join("src")).plan(plan);
    info!("扫描 crate: {}", crate_name);

    if args.list {
        for registration in generator.generate()?.registrations {
            println!(
                "{} -> {} ({:?}, {})",
                registration.service, registration.implementation, registration.kind, registration.lifetime
            );
        }
        return Ok(());
    }

    match args.output {
        Some(output) => {
            let generated = generator.write_to(&output)?;
            info!("已写入 {} 个注册: {}", generated.registrations.len(), output.display());
        }
        None => print!("{}", generator.generate()?.source),
    }
    Ok(())
}

/// 读取 Cargo.toml 中的 package.name
fn package_name(manifest_dir: &std::path::Path) -> anyhow::Result<String> {
    let manifest_path = manifest_dir.join("Cargo.toml");
    let content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("读取失败: {}", manifest_path.display()))?;
    let manifest: toml::Value = toml::from_str(&content)
        .with_context(|| format!("解析失败: {}", manifest_path.display()))?;
    manifest
        .get("package")
        .and_then(|package| package.get("name"))
        .and_then(toml::Value::as_str)
        .map(str::to_string)
        .with_context(|| format!("缺少 package.name: {}", manifest_path.display()))
}
