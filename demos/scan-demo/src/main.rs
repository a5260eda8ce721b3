//! # 扫描演示程序
//!
//! 选择注册来源，组装服务并发送一条通知。

use anyhow::Result;
use clap::{Parser, ValueEnum};
use di_abstractions::ServiceProviderExt;
use di_impl::ServiceProviderImpl;
use scan_demo::app::{build_services, RegistrationSource, Timestamp};
use scan_demo::Notifier;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "scan-demo")]
#[command(about = "Lorn DI 扫描演示")]
struct Args {
    /// 注册来源
    #[arg(long, value_enum, default_value_t = Source::Runtime)]
    source: Source,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 通知内容
    #[arg(default_value = "hello")]
    message: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// 运行时扫描
    Runtime,
    /// 构建期生成
    Generated,
}

impl From<Source> for RegistrationSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Runtime => Self::Runtime,
            Source::Generated => Self::Generated,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("启动扫描演示");

    let services = build_services(args.source.into())?;
    for descriptor in services.iter() {
        info!(
            "{} -> {} ({})",
            descriptor.service_type,
            descriptor
                .implementation_type()
                .map_or_else(|| "<factory>".to_string(), |ty| ty.to_string()),
            descriptor.lifetime
        );
    }

    let provider = ServiceProviderImpl::from_collection(&services);
    let scope = provider.create_scope();
    for line in scope.get::<dyn Notifier>()?.notify(&args.message) {
        println!("{line}");
    }
    println!("{}", provider.get::<dyn Timestamp>()?.timestamp());

    info!("演示结束");
    Ok(())
}
