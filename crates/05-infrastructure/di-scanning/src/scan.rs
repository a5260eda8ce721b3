//! 扫描入口

use crate::selector::TypeSourceSelector;
use di_abstractions::{global_catalog, ServiceCollection, TypeCatalog};
use di_common::RegistrationResult;
use tracing::info;

/// 服务集合的扫描扩展
pub trait ScanExt {
    /// 扫描全局类型目录
    fn scan<F>(&mut self, action: F) -> RegistrationResult<&mut Self>
    where
        F: FnOnce(&mut TypeSourceSelector);

    /// 扫描指定类型目录
    fn scan_catalog<F>(&mut self, catalog: &TypeCatalog, action: F) -> RegistrationResult<&mut Self>
    where
        F: FnOnce(&mut TypeSourceSelector);
}

impl ScanExt for ServiceCollection {
    fn scan<F>(&mut self, action: F) -> RegistrationResult<&mut Self>
    where
        F: FnOnce(&mut TypeSourceSelector),
    {
        self.scan_catalog(&global_catalog(), action)
    }

    fn scan_catalog<F>(&mut self, catalog: &TypeCatalog, action: F) -> RegistrationResult<&mut Self>
    where
        F: FnOnce(&mut TypeSourceSelector),
    {
        let mut selector = TypeSourceSelector::new(catalog.clone());
        action(&mut selector);

        let written = selector.populate(self)?;
        info!("扫描完成，写入 {} 个服务注册", written);
        Ok(self)
    }
}
