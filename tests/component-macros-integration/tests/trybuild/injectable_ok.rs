use component_macros::{injectable, Injectable};
use di_abstractions::{Lifetime, Reflect, TypeInfo};

pub trait Mailer: Send + Sync {}

pub struct Beta;

#[injectable(
    implements(dyn Mailer),
    attribute(Beta),
    descriptor(service = dyn Mailer, lifetime = singleton),
    descriptor(lifetime = transient)
)]
#[derive(Injectable)]
pub struct SmtpMailer;

impl Mailer for SmtpMailer {}

fn main() {
    let metadata = SmtpMailer::type_metadata();
    assert!(metadata.is_public);
    assert!(metadata.is_assignable_to(&TypeInfo::of::<dyn Mailer>()));
    assert!(metadata.has_attribute(&TypeInfo::of::<Beta>()));
    assert_eq!(metadata.descriptors.len(), 2);
    assert_eq!(metadata.descriptors[0].lifetime, Lifetime::Singleton);
}
