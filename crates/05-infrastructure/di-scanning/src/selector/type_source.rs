//! 类型来源选择

use super::implementation::ImplementationTypeSelector;
use super::{ClassSelection, SourceSelection};
use crate::filter::TypeFilter;
use crate::selector::implementation::select_classes;
use di_abstractions::{ServiceCollection, TypeCatalog, TypeMetadata};
use di_common::{RegistrationResult, TypeInfo};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// 类型来源选择器，扫描的起点
pub struct TypeSourceSelector {
    catalog: TypeCatalog,
    pub(crate) sources: Vec<SourceSelection>,
}

impl TypeSourceSelector {
    /// 在类型目录上创建选择器
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            sources: Vec::new(),
        }
    }

    /// 选择指定 crate 中的类型
    pub fn from_crate(&mut self, crate_name: &str) -> ImplementationTypeSelector<'_> {
        let types = self.catalog.from_crate(crate_name);
        self.push_source(types)
    }

    /// 选择 `T` 所在 crate 中的类型
    pub fn from_crate_of<T: ?Sized + 'static>(&mut self) -> ImplementationTypeSelector<'_> {
        let types = self.catalog.from_crate_of::<T>();
        self.push_source(types)
    }

    /// 选择给定类型所在 crate 中的类型
    pub fn from_crates_of<I>(&mut self, types: I) -> ImplementationTypeSelector<'_>
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        let crate_names: BTreeSet<&'static str> =
            types.into_iter().map(|type_info| type_info.crate_name()).collect();
        let types = self.catalog.from_crates(crate_names);
        self.push_source(types)
    }

    /// 选择多个 crate 中的类型
    pub fn from_crates<I, S>(&mut self, crate_names: I) -> ImplementationTypeSelector<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = self.catalog.from_crates(crate_names);
        self.push_source(types)
    }

    /// 选择满足条件的 crate 中的类型
    pub fn from_crates_where<F>(&mut self, predicate: F) -> ImplementationTypeSelector<'_>
    where
        F: Fn(&str) -> bool,
    {
        let types = self.catalog.from_crates_where(predicate);
        self.push_source(types)
    }

    /// 选择目录中的所有类型
    pub fn from_all_crates(&mut self) -> ImplementationTypeSelector<'_> {
        let types = self.catalog.all();
        self.push_source(types)
    }

    /// 直接指定候选类型
    pub fn add_types<I>(&mut self, types: I) -> ImplementationTypeSelector<'_>
    where
        I: IntoIterator<Item = Arc<TypeMetadata>>,
    {
        let types = types.into_iter().collect();
        self.push_source(types)
    }

    fn push_source(&mut self, types: Vec<Arc<TypeMetadata>>) -> ImplementationTypeSelector<'_> {
        debug!("选择类型来源: {} 个候选类型", types.len());
        self.sources.push(SourceSelection {
            types,
            classes: Vec::new(),
        });
        let source = self.sources.len() - 1;
        ImplementationTypeSelector::new(self, source)
    }

    /// 将所有选择写入服务集合，返回写入的描述符数量
    pub(crate) fn populate(self, services: &mut ServiceCollection) -> RegistrationResult<usize> {
        let mut written = 0;
        for source in self.sources {
            let classes = if source.classes.is_empty() {
                vec![ClassSelection::new(select_classes(
                    &source.types,
                    &TypeFilter::new(),
                    true,
                ))]
            } else {
                source.classes
            };

            for class in classes {
                written += class.populate(services)?;
            }
        }
        Ok(written)
    }
}

/// 从后续选择器回到类型来源选择
pub trait ChainSources<'s>: Sized {
    /// 取得类型来源选择器
    fn into_source(self) -> &'s mut TypeSourceSelector;

    /// 选择指定 crate 中的类型
    fn from_crate(self, crate_name: &str) -> ImplementationTypeSelector<'s> {
        self.into_source().from_crate(crate_name)
    }

    /// 选择 `T` 所在 crate 中的类型
    fn from_crate_of<T: ?Sized + 'static>(self) -> ImplementationTypeSelector<'s> {
        self.into_source().from_crate_of::<T>()
    }

    /// 选择给定类型所在 crate 中的类型
    fn from_crates_of<I>(self, types: I) -> ImplementationTypeSelector<'s>
    where
        I: IntoIterator<Item = TypeInfo>,
    {
        self.into_source().from_crates_of(types)
    }

    /// 选择多个 crate 中的类型
    fn from_crates<I, S>(self, crate_names: I) -> ImplementationTypeSelector<'s>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.into_source().from_crates(crate_names)
    }

    /// 选择满足条件的 crate 中的类型
    fn from_crates_where<F>(self, predicate: F) -> ImplementationTypeSelector<'s>
    where
        F: Fn(&str) -> bool,
    {
        self.into_source().from_crates_where(predicate)
    }

    /// 选择目录中的所有类型
    fn from_all_crates(self) -> ImplementationTypeSelector<'s> {
        self.into_source().from_all_crates()
    }

    /// 直接指定候选类型
    fn add_types<I>(self, types: I) -> ImplementationTypeSelector<'s>
    where
        I: IntoIterator<Item = Arc<TypeMetadata>>,
    {
        self.into_source().add_types(types)
    }
}
