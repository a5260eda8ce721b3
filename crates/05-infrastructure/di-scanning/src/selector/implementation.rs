//! 实现类型选择

use super::service_type::ServiceTypeSelector;
use super::type_source::{ChainSources, TypeSourceSelector};
use super::ClassSelection;
use crate::filter::TypeFilter;
use di_abstractions::TypeMetadata;
use std::sync::Arc;
use tracing::debug;

/// 筛选候选类型中的实现类型
pub(crate) fn select_classes(
    types: &[Arc<TypeMetadata>],
    filter: &TypeFilter,
    public_only: bool,
) -> Vec<Arc<TypeMetadata>> {
    types
        .iter()
        .filter(|metadata| !public_only || metadata.is_public)
        .filter(|metadata| filter.matches(metadata))
        .cloned()
        .collect()
}

/// 实现类型选择器
pub struct ImplementationTypeSelector<'s> {
    selector: &'s mut TypeSourceSelector,
    source: usize,
}

impl<'s> ImplementationTypeSelector<'s> {
    pub(crate) fn new(selector: &'s mut TypeSourceSelector, source: usize) -> Self {
        Self { selector, source }
    }

    /// 选择所有公开类型
    pub fn add_classes(self) -> ServiceTypeSelector<'s> {
        self.add_classes_where_with(|filter| filter, true)
    }

    /// 选择所有类型，`public_only` 为 `false` 时包含非公开类型
    pub fn add_classes_with(self, public_only: bool) -> ServiceTypeSelector<'s> {
        self.add_classes_where_with(|filter| filter, public_only)
    }

    /// 选择满足筛选条件的公开类型
    pub fn add_classes_where<F>(self, configure: F) -> ServiceTypeSelector<'s>
    where
        F: FnOnce(TypeFilter) -> TypeFilter,
    {
        self.add_classes_where_with(configure, true)
    }

    /// 选择满足筛选条件的类型
    pub fn add_classes_where_with<F>(self, configure: F, public_only: bool) -> ServiceTypeSelector<'s>
    where
        F: FnOnce(TypeFilter) -> TypeFilter,
    {
        let Self { selector, source } = self;
        let filter = configure(TypeFilter::new());
        let selection = &mut selector.sources[source];
        let types = select_classes(&selection.types, &filter, public_only);
        debug!("选择实现类型: {} / {}", types.len(), selection.types.len());

        selection.classes.push(ClassSelection::new(types));
        let class = selection.classes.len() - 1;
        ServiceTypeSelector::new(selector, source, class)
    }
}

impl<'s> ChainSources<'s> for ImplementationTypeSelector<'s> {
    fn into_source(self) -> &'s mut TypeSourceSelector {
        self.selector
    }
}

/// 从后续选择器回到实现类型选择
pub trait ChainClasses<'s>: Sized {
    /// 取得当前类型来源的实现类型选择器
    fn into_implementation(self) -> ImplementationTypeSelector<'s>;

    /// 选择所有公开类型
    fn add_classes(self) -> ServiceTypeSelector<'s> {
        self.into_implementation().add_classes()
    }

    /// 选择所有类型，`public_only` 为 `false` 时包含非公开类型
    fn add_classes_with(self, public_only: bool) -> ServiceTypeSelector<'s> {
        self.into_implementation().add_classes_with(public_only)
    }

    /// 选择满足筛选条件的公开类型
    fn add_classes_where<F>(self, configure: F) -> ServiceTypeSelector<'s>
    where
        F: FnOnce(TypeFilter) -> TypeFilter,
    {
        self.into_implementation().add_classes_where(configure)
    }

    /// 选择满足筛选条件的类型
    fn add_classes_where_with<F>(self, configure: F, public_only: bool) -> ServiceTypeSelector<'s>
    where
        F: FnOnce(TypeFilter) -> TypeFilter,
    {
        self.into_implementation()
            .add_classes_where_with(configure, public_only)
    }
}
