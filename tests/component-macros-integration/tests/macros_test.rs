//! 宏生成代码的集成测试

use component_macros::{injectable, Injectable};
use di_abstractions::{global_catalog, Reflect, ServiceCollection, ServiceProviderExt, TypeInfo};
use di_common::{Lifetime, RegistrationError};
use di_impl::ServiceProviderImpl;
use di_scanning::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str) -> String;
}

/// 未注册的服务
pub trait AuditLog: Send + Sync {}

/// 属性值
#[derive(Debug, PartialEq, Eq)]
pub struct Channel(pub &'static str);

pub mod services {
    use super::*;

    #[injectable(implements(dyn Clock), descriptor(service = dyn Clock, lifetime = singleton))]
    #[derive(Injectable)]
    pub struct TickClock {
        ticks: AtomicUsize,
    }

    impl Clock for TickClock {
        fn now(&self) -> u64 {
            self.ticks.fetch_add(1, Ordering::SeqCst) as u64
        }
    }

    #[injectable(
        implements(dyn Mailer),
        attribute(Channel("smtp")),
        descriptor(lifetime = scoped)
    )]
    #[derive(Injectable)]
    pub struct SmtpMailer {
        clock: Arc<dyn Clock>,
        audit: Option<Arc<dyn AuditLog>>,
        #[inject(default)]
        sent: AtomicUsize,
    }

    impl Mailer for SmtpMailer {
        fn send(&self, to: &str) -> String {
            self.sent.fetch_add(1, Ordering::SeqCst);
            let route = if self.audit.is_some() { "audited" } else { "direct" };
            format!("{to}@{} via {route}", self.clock.now())
        }
    }

    #[injectable(implements(dyn Mailer))]
    #[derive(Injectable)]
    pub(crate) struct InternalMailer;

    impl Mailer for InternalMailer {
        fn send(&self, to: &str) -> String {
            format!("internal {to}")
        }
    }

    #[injectable(implements(dyn Mailer), descriptor(service = dyn Mailer, lifetime = scoped), descriptor(service = dyn Mailer, lifetime = transient))]
    #[derive(Injectable)]
    pub struct Misconfigured;

    impl Mailer for Misconfigured {
        fn send(&self, to: &str) -> String {
            format!("broken {to}")
        }
    }
}

use services::{Misconfigured, SmtpMailer, TickClock};

#[test]
fn test_types_are_registered_at_startup() {
    let catalog = global_catalog();

    let smtp = catalog.get(&TypeInfo::of::<SmtpMailer>()).unwrap();
    assert!(smtp.is_public);
    assert!(smtp.is_assignable_to(&TypeInfo::of::<dyn Mailer>()));
    assert_eq!(smtp.attributes_of::<Channel>().collect::<Vec<_>>(), vec![&Channel("smtp")]);
    assert_eq!(smtp.descriptors.len(), 1);
    assert_eq!(smtp.descriptors[0].service_type, None);
    assert_eq!(smtp.descriptors[0].lifetime, Lifetime::Scoped);

    let internal = catalog
        .get(&TypeInfo::of::<services::InternalMailer>())
        .unwrap();
    assert!(!internal.is_public);
    assert_eq!(catalog.from_crate_of::<TickClock>().len(), 4);
}

#[test]
fn test_reflect_matches_catalog_entry() {
    let metadata = TickClock::type_metadata();
    assert_eq!(metadata.type_info, TypeInfo::of::<TickClock>());
    assert_eq!(metadata.service_types().collect::<Vec<_>>(), vec![TypeInfo::of::<dyn Clock>()]);
    assert_eq!(metadata.namespace(), TypeInfo::of::<SmtpMailer>().namespace());
}

#[test]
fn test_scan_using_attributes_and_resolve_dependencies() {
    let mut collection = ServiceCollection::new();
    collection
        .scan(|scan| {
            scan.from_crate_of::<TickClock>()
                .add_classes_where(|classes| {
                    classes.where_type(|metadata| metadata.type_info != TypeInfo::of::<Misconfigured>())
                })
                .using_attributes();
        })
        .unwrap();

    // TickClock: dyn Clock；SmtpMailer: 自身与 dyn Mailer
    assert_eq!(collection.len(), 3);

    let provider = ServiceProviderImpl::from_collection(&collection);
    let scope = provider.create_scope();
    let mailer = scope.get::<dyn Mailer>().unwrap();
    assert_eq!(mailer.send("ann"), "ann@0 via direct");
    assert_eq!(mailer.send("bob"), "bob@1 via direct");

    // 单例时钟在作用域之间共享
    let other = provider.create_scope().get::<dyn Mailer>().unwrap();
    assert_eq!(other.send("cy"), "cy@2 via direct");
}

#[test]
fn test_duplicate_descriptor_attribute_is_rejected() {
    let mut collection = ServiceCollection::new();
    let result = collection.scan(|scan| {
        scan.from_crate_of::<Misconfigured>()
            .add_classes_where(|classes| classes.in_namespace_of::<Misconfigured>())
            .using_attributes();
    });
    assert!(matches!(
        result,
        Err(RegistrationError::DuplicateDescriptorAttribute { .. })
    ));
}
