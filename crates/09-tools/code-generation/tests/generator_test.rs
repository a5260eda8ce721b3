//! 代码生成器测试：在临时目录中构建 crate 源码树

use di_codegen::{
    Generator, RegistrationKind, ScanError, ScanPlan, ScanRule, ServiceSpec, SourceParser,
};
use di_common::Lifetime;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LIB: &str = r#"
pub mod infra;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub trait Mailer: Send + Sync {}

pub trait Named {
    fn name(&self) -> String;
}

#[cfg(test)]
mod tests {
    #[injectable]
    #[derive(Injectable)]
    pub struct Hidden;
}
"#;

const INFRA: &str = r#"
pub mod mail;

use super::*;
use component_macros::{injectable, Injectable};

#[injectable(implements(dyn Clock))]
#[derive(Injectable)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        0
    }
}

impl Mailer for SystemClock {}

impl crate::Named for SystemClock {
    fn name(&self) -> String {
        "system".to_string()
    }
}

#[derive(Injectable)]
pub struct Helper;

impl Clock for Helper {
    fn now(&self) -> u64 {
        2
    }
}

#[injectable]
pub struct Plain;

#[derive(Injectable)]
pub struct Repository<T>(T);
"#;

const MAIL: &str = r#"
use super::super::Mailer;
use component_macros::{injectable, Injectable};

#[injectable(implements(dyn crate::Clock, dyn Mailer), descriptor(service = dyn Mailer, lifetime = scoped))]
#[derive(Injectable)]
pub struct MailerImpl;

impl Mailer for MailerImpl {}

impl crate::Clock for MailerImpl {
    fn now(&self) -> u64 {
        1
    }
}

#[injectable(implements(dyn Mailer))]
#[derive(Injectable)]
struct InternalRelay;

impl Mailer for InternalRelay {}
"#;

const ORPHAN: &str = r#"
#[injectable]
#[derive(Injectable)]
pub struct Orphan;
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn source_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    write(&src, "lib.rs", LIB);
    write(&src, "infra/mod.rs", INFRA);
    write(&src, "infra/mail.rs", MAIL);
    write(&src, "orphan.rs", ORPHAN);
    dir
}

#[test]
fn test_parse_module_tree() {
    let dir = source_tree();
    let source = SourceParser::new("demo-app", dir.path().join("src"))
        .parse()
        .unwrap();

    assert_eq!(source.name, "demo_app");
    let mut paths: Vec<&str> = source.types.iter().map(|ty| ty.type_ref.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(
        paths,
        vec![
            "demo_app::infra::Plain",
            "demo_app::infra::SystemClock",
            "demo_app::infra::mail::InternalRelay",
            "demo_app::infra::mail::MailerImpl",
        ]
    );

    let clock = source.get("demo_app::infra::SystemClock").unwrap();
    assert!(clock.is_public && clock.is_injectable);
    let services: Vec<String> = clock.services.iter().map(ToString::to_string).collect();
    assert_eq!(services, vec!["dyn demo_app::Clock"]);

    let mailer = source.get("demo_app::infra::mail::MailerImpl").unwrap();
    let services: Vec<String> = mailer.services.iter().map(ToString::to_string).collect();
    assert_eq!(services, vec!["dyn demo_app::Clock", "dyn demo_app::Mailer"]);
    assert_eq!(mailer.descriptors.len(), 1);
    assert_eq!(mailer.descriptors[0].lifetime, Lifetime::Scoped);
    assert_eq!(mailer.descriptors[0].service.as_ref(), mailer.services.get(1));

    assert!(!source.get("demo_app::infra::mail::InternalRelay").unwrap().is_public);
    assert!(!source.get("demo_app::infra::Plain").unwrap().is_injectable);
    assert!(source.get("demo_app::infra::Helper").is_none());
    assert!(source.get("demo_app::infra::Repository").is_none());
}

#[test]
fn test_glob_imports_resolve_services() {
    let dir = source_tree();
    let generated = Generator::new("demo_app", dir.path().join("src"))
        .rule(
            ScanRule::new()
                .assignable_to("crate::Clock")
                .register(ServiceSpec::Types { types: vec!["crate::Clock".into()] }, Lifetime::Singleton),
        )
        .generate()
        .unwrap();

    let mut implementations: Vec<&str> = generated
        .registrations
        .iter()
        .map(|r| r.implementation.short_name())
        .collect();
    implementations.sort_unstable();
    assert_eq!(implementations, vec!["MailerImpl", "SystemClock"]);
    assert!(generated
        .source
        .contains("implementation :: < dyn crate :: Clock , crate :: infra :: SystemClock >"));
    assert!(!generated.source.contains("< dyn Clock"));
}

#[test]
fn test_services_come_only_from_implements() {
    let dir = source_tree();
    let generated = Generator::new("demo_app", dir.path().join("src"))
        .rule(ScanRule::new().register(
            ServiceSpec::ImplementedServices { exclude: Vec::new() },
            Lifetime::Transient,
        ))
        .generate()
        .unwrap();

    let mut summary: Vec<String> = generated
        .registrations
        .iter()
        .map(|r| format!("{} -> {}", r.service.short_name(), r.implementation.short_name()))
        .collect();
    summary.sort_unstable();
    assert_eq!(
        summary,
        vec!["Clock -> MailerImpl", "Clock -> SystemClock", "Mailer -> MailerImpl"]
    );
}

#[test]
fn test_unsupported_service_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "lib.rs",
        r#"
        pub trait Clock: Send + Sync {}

        #[injectable(descriptor(service = &'static dyn Clock))]
        #[derive(Injectable)]
        pub struct SystemClock;
        "#,
    );
    assert!(matches!(
        SourceParser::new("demo", dir.path()).parse(),
        Err(ScanError::Parse { .. })
    ));
}

#[test]
fn test_generate_from_toml_plan() {
    let dir = source_tree();
    let plan = ScanPlan::from_toml_str(
        r#"
        [[rules]]
        filter = { assignable_to = ["crate::Mailer"] }
        strategy = { kind = "skip" }
        registrations = [{ services = { kind = "implemented_services" }, lifetime = "singleton" }]
        "#,
    )
    .unwrap();

    let generated = Generator::new("demo-app", dir.path().join("src"))
        .plan(plan)
        .generate()
        .unwrap();

    assert_eq!(generated.registrations.len(), 2);
    assert!(generated
        .registrations
        .iter()
        .all(|r| r.implementation.short_name() == "MailerImpl" && r.lifetime == Lifetime::Singleton));
    assert!(generated.source.contains("pub fn register_services"));
    assert!(generated.source.contains(":: di_scanning :: Skip"));
    assert!(generated
        .source
        .contains("implementation :: < dyn crate :: Mailer , crate :: infra :: mail :: MailerImpl >"));
    assert!(syn::parse_file(&generated.source).is_ok());
}

#[test]
fn test_generate_from_rust_plan() {
    let dir = source_tree();
    let generated = Generator::new("demo_app", dir.path().join("src"))
        .rule(
            ScanRule::new()
                .public_only(false)
                .in_namespace("crate::infra::mail")
                .register(ServiceSpec::SelfWithServices { exclude: vec!["crate::Clock".into()] }, Lifetime::Singleton),
        )
        .rule(ScanRule::new().register(ServiceSpec::Attributes, Lifetime::Transient))
        .generate()
        .unwrap();

    let summary: Vec<(String, RegistrationKind, Lifetime)> = generated
        .registrations
        .iter()
        .map(|r| (format!("{} -> {}", r.service.short_name(), r.implementation.short_name()), r.kind, r.lifetime))
        .collect();
    assert!(summary.contains(&("MailerImpl -> MailerImpl".to_string(), RegistrationKind::Direct, Lifetime::Singleton)));
    assert!(summary.contains(&("Mailer -> MailerImpl".to_string(), RegistrationKind::Forwarded, Lifetime::Singleton)));
    assert!(summary.contains(&("Mailer -> InternalRelay".to_string(), RegistrationKind::Forwarded, Lifetime::Singleton)));
    assert!(summary.contains(&("Mailer -> MailerImpl".to_string(), RegistrationKind::Direct, Lifetime::Scoped)));
    assert!(!summary.iter().any(|(name, _, _)| name.starts_with("Clock")));
    assert_eq!(summary.len(), 5);
}

#[test]
fn test_write_to_file() {
    let dir = source_tree();
    let output = dir.path().join("out").join("registrations.rs");
    let generator = Generator::new("demo_app", dir.path().join("src")).rule(ScanRule::new());

    let generated = generator.write_to(&output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), generated.source);
    assert_eq!(generated.registrations.len(), 2);

    let again = generator.write_to(&output).unwrap();
    assert_eq!(again.source, generated.source);
}

#[test]
fn test_missing_root_and_parse_errors() {
    let empty = tempfile::tempdir().unwrap();
    assert!(matches!(
        SourceParser::new("empty", empty.path()).parse(),
        Err(ScanError::MissingRoot { .. })
    ));

    let broken = tempfile::tempdir().unwrap();
    write(broken.path(), "lib.rs", "pub struct Broken {");
    assert!(matches!(
        SourceParser::new("broken", broken.path()).parse(),
        Err(ScanError::Parse { .. })
    ));
}
