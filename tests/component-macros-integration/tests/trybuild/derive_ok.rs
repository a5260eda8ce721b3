use component_macros::Injectable;
use di_abstractions::{Injectable as _, ServiceCollection, ServiceProviderExt};
use di_impl::ServiceProviderImpl;
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct Fixed;

impl Clock for Fixed {
    fn now(&self) -> u64 {
        7
    }
}

#[derive(Injectable)]
struct Unit;

#[derive(Injectable)]
struct Pair(Arc<dyn Clock>, u32);

#[derive(Injectable)]
struct Reception {
    clock: Arc<dyn Clock>,
    backup: Option<Arc<dyn Clock>>,
    all: Vec<Arc<dyn Clock>>,
    #[inject(default)]
    label: String,
}

fn main() {
    let mut services = ServiceCollection::new();
    services.add_instance::<dyn Clock>(Arc::new(Fixed));
    let provider = ServiceProviderImpl::from_collection(&services);

    let _ = Unit::construct(&provider).map(|_| ());
    let pair = Pair::construct(&provider).map_err(|e| e.to_string()).unwrap();
    assert_eq!((pair.0.now(), pair.1), (7, 0));

    let reception = Reception::construct(&provider).unwrap();
    assert_eq!(reception.clock.now(), 7);
    assert!(reception.backup.is_some());
    assert_eq!(reception.all.len(), 1);
    assert!(reception.label.is_empty());
    assert!(provider.try_get::<Reception>().unwrap().is_none());
}
