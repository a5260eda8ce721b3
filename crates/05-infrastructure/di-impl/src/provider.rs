//! 参考服务解析器

use crate::options::ProviderOptions;
use di_abstractions::{Instance, ServiceCollection, ServiceDescriptor, ServiceProvider};
use di_common::{Lifetime, ResolveError, ResolveResult, Scope, TypeInfo};
use parking_lot::RwLock;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

thread_local! {
    static RESOLUTION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// 解析深度守卫，离开作用域时恢复深度
struct DepthGuard;

impl DepthGuard {
    fn enter(service_type: &TypeInfo, max_depth: usize) -> ResolveResult<Self> {
        RESOLUTION_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > max_depth {
                return Err(ResolveError::ResolutionDepthExceeded {
                    service_type: service_type.name.to_string(),
                    max_depth,
                });
            }
            depth.set(next);
            Ok(Self)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLUTION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// 根解析器与所有作用域共享的注册信息
struct Registrations {
    descriptors: Vec<ServiceDescriptor>,
    index: HashMap<TypeInfo, Vec<usize>>,
    singletons: RwLock<HashMap<usize, Instance>>,
    options: ProviderOptions,
}

/// 服务解析器实现
#[derive(Clone)]
pub struct ServiceProviderImpl {
    registrations: Arc<Registrations>,
    scoped: Arc<RwLock<HashMap<usize, Instance>>>,
    scope: Scope,
}

impl ServiceProviderImpl {
    /// 由服务集合构建根解析器
    pub fn build(collection: &ServiceCollection, options: ProviderOptions) -> Self {
        let descriptors: Vec<ServiceDescriptor> = collection.iter().cloned().collect();
        let mut index: HashMap<TypeInfo, Vec<usize>> = HashMap::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            index
                .entry(descriptor.service_type)
                .or_default()
                .push(position);
        }

        info!(
            "构建服务解析器完成，共 {} 个注册，{} 个服务类型",
            descriptors.len(),
            index.len()
        );

        let scope = Scope::new(options.root_scope_name.clone());
        Self {
            registrations: Arc::new(Registrations {
                descriptors,
                index,
                singletons: RwLock::new(HashMap::new()),
                options,
            }),
            scoped: Arc::new(RwLock::new(HashMap::new())),
            scope,
        }
    }

    /// 使用默认配置构建根解析器
    pub fn from_collection(collection: &ServiceCollection) -> Self {
        Self::build(collection, ProviderOptions::default())
    }

    /// 创建子作用域，单例缓存共享，作用域缓存独立
    pub fn create_scope(&self) -> Self {
        let scope = self.scope.child("scope");
        debug!("创建作用域: {}", scope.name);
        Self {
            registrations: Arc::clone(&self.registrations),
            scoped: Arc::new(RwLock::new(HashMap::new())),
            scope,
        }
    }

    /// 当前作用域
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// 配置
    pub fn options(&self) -> &ProviderOptions {
        &self.registrations.options
    }

    fn resolve_at(&self, position: usize) -> ResolveResult<Instance> {
        let descriptor = &self.registrations.descriptors[position];
        let _guard = DepthGuard::enter(
            &descriptor.service_type,
            self.registrations.options.max_resolution_depth,
        )?;

        match descriptor.lifetime {
            Lifetime::Singleton => {
                self.cached(&self.registrations.singletons, position, descriptor)
            }
            Lifetime::Scoped => self.cached(&self.scoped, position, descriptor),
            Lifetime::Transient => descriptor.create_instance(self),
        }
    }

    /// 从缓存读取，未命中时在锁外创建，再以先写入者为准
    fn cached(
        &self,
        cache: &RwLock<HashMap<usize, Instance>>,
        position: usize,
        descriptor: &ServiceDescriptor,
    ) -> ResolveResult<Instance> {
        if let Some(instance) = cache.read().get(&position) {
            return Ok(instance.clone());
        }

        let created = descriptor.create_instance(self)?;
        debug!(
            "创建 {} 实例: {}",
            descriptor.lifetime, descriptor.service_type
        );
        Ok(cache.write().entry(position).or_insert(created).clone())
    }
}

impl ServiceProvider for ServiceProviderImpl {
    fn get_instance(&self, service_type: &TypeInfo) -> ResolveResult<Instance> {
        let position = self
            .registrations
            .index
            .get(service_type)
            .and_then(|positions| positions.last().copied())
            .ok_or_else(|| ResolveError::not_registered(service_type.name))?;
        self.resolve_at(position)
    }

    fn get_all_instances(&self, service_type: &TypeInfo) -> ResolveResult<Vec<Instance>> {
        self.registrations
            .index
            .get(service_type)
            .map(|positions| {
                positions
                    .iter()
                    .map(|position| self.resolve_at(*position))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn is_registered(&self, service_type: &TypeInfo) -> bool {
        self.registrations.index.contains_key(service_type)
    }
}

impl std::fmt::Debug for ServiceProviderImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProviderImpl")
            .field("scope", &self.scope.name)
            .field("registrations", &self.registrations.descriptors.len())
            .finish_non_exhaustive()
    }
}
