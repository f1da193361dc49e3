use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tender_core::{MetricsBackend, OfferOutcome};
use tender_model::TaskState;

/// Scheduler counters on their own registry. Clones share the counters.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    offers: IntCounterVec,
    launched: IntCounter,
    status: IntCounterVec,
    driver_errors: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register the counters on an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let offers = IntCounterVec::new(
            Opts::new("tender_offers_total", "Offers handled, by outcome"),
            &["outcome"],
        )?;
        let launched = IntCounter::new("tender_tasks_launched_total", "Tasks launched")?;
        let status = IntCounterVec::new(
            Opts::new("tender_task_status_total", "Task status updates, by state"),
            &["state"],
        )?;
        let driver_errors = IntCounterVec::new(
            Opts::new("tender_driver_errors_total", "Failed driver calls, by operation"),
            &["op"],
        )?;

        registry.register(Box::new(offers.clone()))?;
        registry.register(Box::new(launched.clone()))?;
        registry.register(Box::new(status.clone()))?;
        registry.register(Box::new(driver_errors.clone()))?;

        Ok(Self {
            registry,
            offers,
            launched,
            status,
            driver_errors,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve on `/metrics`.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_offer(&self, outcome: OfferOutcome) {
        self.offers.with_label_values(&[outcome.as_str()]).inc();
    }

    fn record_launch(&self) {
        self.launched.inc();
    }

    fn record_status(&self, state: TaskState) {
        self.status.with_label_values(&[state.as_str()]).inc();
    }

    fn record_driver_error(&self, op: &'static str) {
        self.driver_errors.with_label_values(&[op]).inc();
    }
}
