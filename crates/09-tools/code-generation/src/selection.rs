//! 按扫描计划选择注册
//!
//! 语义与运行时选择链相同：规则内先按服务选择、再按类型展开；
//! 未声明服务选择时注册为自身（瞬时）。泛型类型与未实现 `Injectable` 的类型跳过。

use crate::model::{SourceCrate, SourceType, TypeRef};
use crate::plan::{FilterSpec, ScanPlan, ScanRule, ServiceSpec, StrategySpec};
use di_common::{is_matching_service, split_type_name, Lifetime, RegistrationError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// 注册的创建方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    /// 构造实现类型后转换为服务类型
    Direct,
    /// 解析实现类型自身的注册后转换为服务类型
    Forwarded,
}

/// 一条待生成的注册
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// 实现类型
    pub implementation: TypeRef,
    /// 服务类型（自身注册时与实现类型相同）
    pub service: TypeRef,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 创建方式
    pub kind: RegistrationKind,
    /// 注册策略
    pub strategy: StrategySpec,
}

/// 按计划选择所有注册
pub fn select(source: &SourceCrate, plan: &ScanPlan) -> Result<Vec<Registration>, RegistrationError> {
    let mut registrations = Vec::new();
    for rule in &plan.rules {
        registrations.extend(select_rule(source, rule)?);
    }
    Ok(registrations)
}

/// 按单条规则选择注册
pub fn select_rule(source: &SourceCrate, rule: &ScanRule) -> Result<Vec<Registration>, RegistrationError> {
    let matcher = Matcher { source };
    let classes: Vec<&SourceType> = source
        .types
        .iter()
        .filter(|ty| !rule.public_only || ty.is_public)
        .filter(|ty| matcher.filter(&rule.filter, ty))
        .filter(|ty| {
            if ty.is_generic {
                debug!("跳过泛型类型: {}", ty.type_ref);
                return false;
            }
            if !ty.is_injectable {
                warn!("类型未实现 Injectable，跳过: {}", ty.type_ref);
                return false;
            }
            true
        })
        .collect();

    let default_selection = [crate::plan::RegistrationSpec {
        services: ServiceSpec::SelfType,
        lifetime: Lifetime::default(),
    }];
    let selections = if rule.registrations.is_empty() {
        &default_selection[..]
    } else {
        &rule.registrations[..]
    };

    let mut registrations = Vec::new();
    for selection in selections {
        for class in &classes {
            for (service, lifetime, kind) in
                matcher.services(class, &selection.services, selection.lifetime)?
            {
                debug!("选择注册: {} -> {} ({})", service, class.type_ref, lifetime);
                registrations.push(Registration {
                    implementation: class.type_ref.clone(),
                    service,
                    lifetime,
                    kind,
                    strategy: rule.strategy,
                });
            }
        }
    }
    Ok(registrations)
}

struct Matcher<'a> {
    source: &'a SourceCrate,
}

impl Matcher<'_> {
    /// 类型引用是否与计划中的类型名相同
    fn is_same_type(&self, candidate: &TypeRef, name: &str) -> bool {
        let qualified = self.source.qualify(name);
        let parts = split_type_name(&qualified);
        parts.path == candidate.path
            && parts.arguments.len() == candidate.arguments.len()
            && parts
                .arguments
                .iter()
                .zip(&candidate.arguments)
                .all(|(expected, actual)| {
                    self.source.to_code_path(&self.source.qualify(expected)) == *actual
                })
    }

    fn is_assignable_to(&self, ty: &SourceType, name: &str) -> bool {
        ty.find_service(|candidate| self.is_same_type(candidate, name))
            .is_some()
    }

    fn is_assignable_to_generic(&self, ty: &SourceType, definition: &str) -> bool {
        let qualified = self.source.qualify(definition);
        let parts = split_type_name(&qualified);
        ty.find_service(|candidate| {
            candidate.path == parts.path
                && if parts.arguments.is_empty() {
                    candidate.arity() > 0
                } else {
                    candidate.arity() == parts.arguments.len()
                }
        })
        .is_some()
    }

    fn filter(&self, filter: &FilterSpec, ty: &SourceType) -> bool {
        let qualify = |name: &String| self.source.qualify(name);

        filter.assignable_to.iter().all(|name| self.is_assignable_to(ty, name))
            && filter
                .assignable_to_any
                .iter()
                .all(|group| group.iter().any(|name| self.is_assignable_to(ty, name)))
            && filter
                .assignable_to_generic
                .iter()
                .all(|definition| self.is_assignable_to_generic(ty, definition))
            && filter
                .with_attribute
                .iter()
                .all(|attribute| ty.has_attribute(&qualify(attribute)))
            && !filter
                .without_attribute
                .iter()
                .any(|attribute| ty.has_attribute(&qualify(attribute)))
            && (filter.in_namespaces.is_empty()
                || filter
                    .in_namespaces
                    .iter()
                    .any(|namespace| ty.is_in_namespace(&qualify(namespace))))
            && (filter.in_exact_namespaces.is_empty()
                || filter
                    .in_exact_namespaces
                    .iter()
                    .any(|namespace| ty.is_in_exact_namespace(&qualify(namespace))))
            && !filter
                .not_in_namespaces
                .iter()
                .any(|namespace| ty.is_in_namespace(&qualify(namespace)))
    }

    fn is_excluded(&self, service: &TypeRef, exclude: &[String]) -> bool {
        exclude.iter().any(|name| self.is_same_type(service, name))
    }

    /// 为实现类型展开服务选择
    fn services(
        &self,
        ty: &SourceType,
        selection: &ServiceSpec,
        lifetime: Lifetime,
    ) -> Result<Vec<(TypeRef, Lifetime, RegistrationKind)>, RegistrationError> {
        let direct = |service: &TypeRef| (service.clone(), lifetime, RegistrationKind::Direct);
        let self_type = &ty.type_ref;

        Ok(match selection {
            ServiceSpec::SelfType => vec![direct(self_type)],
            ServiceSpec::Types { types } => types
                .iter()
                .map(|name| {
                    ty.find_service(|candidate| self.is_same_type(candidate, name))
                        .map(direct)
                        .ok_or_else(|| {
                            RegistrationError::not_assignable(
                                self_type.path.as_str(),
                                self.source.qualify(name),
                            )
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            ServiceSpec::ImplementedServices { exclude } => ty
                .services
                .iter()
                .filter(|service| !self.is_excluded(service, exclude))
                .map(direct)
                .collect(),
            ServiceSpec::SelfWithServices { exclude } => std::iter::once(direct(self_type))
                .chain(
                    ty.services
                        .iter()
                        .filter(|service| !self.is_excluded(service, exclude))
                        .map(|service| (service.clone(), lifetime, RegistrationKind::Forwarded)),
                )
                .collect(),
            ServiceSpec::MatchingService { exclude } => ty
                .services
                .iter()
                .filter(|service| is_matching_service(ty.short_name(), service.short_name()))
                .filter(|service| !self.is_excluded(service, exclude))
                .map(direct)
                .collect(),
            ServiceSpec::Attributes => attribute_services(ty)?,
        })
    }
}

/// 按 `descriptor(...)` 声明展开服务
fn attribute_services(
    ty: &SourceType,
) -> Result<Vec<(TypeRef, Lifetime, RegistrationKind)>, RegistrationError> {
    let mut seen: HashSet<Option<&TypeRef>> = HashSet::new();
    if ty
        .descriptors
        .iter()
        .any(|descriptor| !seen.insert(descriptor.service.as_ref()))
    {
        return Err(RegistrationError::DuplicateDescriptorAttribute {
            implementation_type: ty.type_ref.path.clone(),
        });
    }

    let mut services = Vec::new();
    for descriptor in &ty.descriptors {
        match &descriptor.service {
            Some(service) => {
                if !ty.is_assignable_to(service) {
                    return Err(RegistrationError::not_assignable(
                        ty.type_ref.path.as_str(),
                        service.to_string(),
                    ));
                }
                services.push((service.clone(), descriptor.lifetime, RegistrationKind::Direct));
            }
            None => {
                services.push((ty.type_ref.clone(), descriptor.lifetime, RegistrationKind::Direct));
                for service in &ty.services {
                    services.push((service.clone(), descriptor.lifetime, RegistrationKind::Direct));
                }
            }
        }
    }
    Ok(services)
}
