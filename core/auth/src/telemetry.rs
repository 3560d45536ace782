//! Telemetry related to request authorization.
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::CounterVec;
use prometheus::Opts;

/// Total number of authorization requests by claim kind.
pub static AUTHORIZE_COUNT: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "warden_authorize_count",
            "Total number of authorization requests",
        ),
        &["claim"],
    )
    .expect("failed to initialise AUTHORIZE_COUNT counter")
});

/// Number of authorization requests that failed, by claim kind and error kind.
pub static AUTHORIZE_ERR: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "warden_authorize_error",
            "Number of authorization requests that failed",
        ),
        &["claim", "kind"],
    )
    .expect("failed to initialise AUTHORIZE_ERR counter")
});

/// Ensure metrics are registered only once.
static METRICS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// The first time this method is called it will register the authorization metrics.
pub fn register_metrics(reg: &prometheus::Registry) -> Result<()> {
    // Skip registration if already done before.
    if METRICS_REGISTERED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    let collectors: [Box<dyn prometheus::core::Collector>; 2] = [
        Box::new(AUTHORIZE_COUNT.clone()),
        Box::new(AUTHORIZE_ERR.clone()),
    ];
    for collector in collectors {
        reg.register(collector)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn register_metrics_once() {
        let first = prometheus::Registry::new();
        let second = prometheus::Registry::new();
        super::register_metrics(&first).unwrap();
        super::register_metrics(&second).unwrap();
        super::AUTHORIZE_COUNT.with_label_values(&["none"]).inc();
        let families = first.gather();
        let names: Vec<&str> = families.iter().map(|family| family.get_name()).collect();
        assert!(names.contains(&"warden_authorize_count"));
    }
}
