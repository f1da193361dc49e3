//! Task lifecycle controller.
//!
//! [`OfferScheduler`] answers the two callbacks the resource manager drives: offer batches
//! and task status updates. The session dispatches one call at a time (see [`crate::session`]),
//! but capacity does not rely on that: a slot is reserved in the registry under its write lock
//! before the launch call goes out, and given back if the driver fails it.

mod policy;
pub use policy::SchedulerPolicy;

use std::sync::Arc;

use tender_model::{Filters, Offer, OfferId, ResourceRequirement, StatusReport, TaskRecord, TaskState};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    builder::{TaskBuilder, TaskTemplate},
    driver::{DriverError, DriverStatus, SchedulerDriver},
    error::CoreError,
    metrics::{self, MetricsHandle, OfferOutcome},
    planner::{Decision, FirstFitPlanner, Reservation, ResourcePlanner},
    state::TaskRegistry,
};

/// What the session should do after a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Continue,
    /// The session was aborted; the driver reported this status.
    Abort(DriverStatus),
}

pub struct OfferScheduler {
    requirement: ResourceRequirement,
    planner: Arc<dyn ResourcePlanner>,
    builder: TaskBuilder,
    registry: TaskRegistry,
    policy: SchedulerPolicy,
    metrics: MetricsHandle,
}

impl OfferScheduler {
    pub fn new(requirement: ResourceRequirement, template: TaskTemplate) -> Self {
        Self {
            requirement,
            planner: Arc::new(FirstFitPlanner),
            builder: TaskBuilder::new(template),
            registry: TaskRegistry::new(),
            policy: SchedulerPolicy::default(),
            metrics: metrics::noop(),
        }
    }

    pub fn with_planner(mut self, planner: Arc<dyn ResourcePlanner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_policy(mut self, policy: SchedulerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Share an existing registry, e.g. one already handed to the HTTP API.
    pub fn with_registry(mut self, registry: TaskRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn requirement(&self) -> &ResourceRequirement {
        &self.requirement
    }

    pub fn policy(&self) -> &SchedulerPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Whether any task has ever been launched.
    pub fn launched(&self) -> bool {
        !self.registry.is_empty()
    }

    fn at_capacity(&self) -> bool {
        self.registry.len() >= self.policy.max_tasks
    }

    /// Handle one batch of offers, in order.
    ///
    /// Every offer is either declined or has exactly one task launched on it. Driver errors
    /// stop the batch and are returned to the caller.
    #[instrument(level = "debug", skip_all, fields(offers = offers.len()))]
    pub async fn resource_offers(
        &self,
        driver: &dyn SchedulerDriver,
        offers: Vec<Offer>,
    ) -> Result<(), CoreError> {
        self.reconcile_unacknowledged(driver).await?;

        for offer in offers {
            if self.at_capacity() {
                debug!(offer = %offer.id, "launch capacity used; declining offer");
                self.metrics.record_offer(OfferOutcome::Busy);
                self.decline(driver, &offer.id, self.policy.busy_refusal.as_secs_f64())
                    .await?;
                continue;
            }

            let tally = self.planner.tally(&offer);
            info!(
                offer = %offer.id,
                host = %offer.hostname,
                planner = self.planner.name(),
                cpus = tally.cpus,
                mem = tally.mem,
                port = ?tally.port.map(|p| p.begin),
                "received offer"
            );

            match self.planner.decide(&tally, &self.requirement) {
                Decision::Decline(reason) => {
                    info!(offer = %offer.id, %reason, "declining offer");
                    self.metrics.record_offer(OfferOutcome::Declined(reason));
                    self.decline(driver, &offer.id, self.policy.decline_refusal.as_secs_f64())
                        .await?;
                }
                Decision::Accept(reservation) => {
                    if self.launch(driver, &offer, &reservation).await? {
                        self.metrics.record_offer(OfferOutcome::Launched);
                    } else {
                        debug!(offer = %offer.id, "capacity taken during evaluation; declining offer");
                        self.metrics.record_offer(OfferOutcome::Busy);
                        self.decline(driver, &offer.id, self.policy.busy_refusal.as_secs_f64())
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle a status update for a launched task.
    ///
    /// LOST, KILLED and FAILED abort the session; every other state is recorded and ignored.
    #[instrument(level = "debug", skip_all, fields(task = %report.task_id, state = %report.state))]
    pub async fn status_update(
        &self,
        driver: &dyn SchedulerDriver,
        report: StatusReport,
    ) -> Result<StatusAction, CoreError> {
        info!(task = %report.task_id, state = %report.state, "status update");
        self.metrics.record_status(report.state);

        if !self
            .registry
            .update_state(&report.task_id, report.state, report.message.clone())
        {
            warn!(task = %report.task_id, "status update for untracked task");
        }

        match report.state {
            TaskState::Running => info!(task = %report.task_id, "task is running"),
            TaskState::Finished => info!(task = %report.task_id, "task is finished"),
            state if state.is_fault() => {
                error!(
                    task = %report.task_id,
                    %state,
                    message = report.message.as_deref().unwrap_or(""),
                    "aborting: task is in unexpected state"
                );
                let status = driver.abort().await.map_err(|e| self.driver_error("abort", e))?;
                return Ok(StatusAction::Abort(status));
            }
            state => debug!(task = %report.task_id, %state, "no action for state"),
        }
        Ok(StatusAction::Continue)
    }

    /// Reserve a slot for a new task and launch it. Returns `false` if no slot was left.
    async fn launch(
        &self,
        driver: &dyn SchedulerDriver,
        offer: &Offer,
        reservation: &Reservation,
    ) -> Result<bool, CoreError> {
        let task = self.builder.build(offer, reservation);
        let task_id = task.id.clone();

        let record = TaskRecord::staging(
            task_id.clone(),
            offer.id.clone(),
            offer.hostname.clone(),
            false,
        );
        if !self.registry.reserve(record, self.policy.max_tasks) {
            return Ok(false);
        }
        info!(task = %task.name, offer = %offer.id, "prepared task for launch");

        let launched = driver
            .launch_tasks(
                std::slice::from_ref(&offer.id),
                vec![task],
                Filters::refuse(self.policy.launch_refusal.as_secs_f64()),
            )
            .await;
        let ack = match launched {
            Ok(ack) => ack,
            Err(e) => {
                self.registry.release(&task_id);
                return Err(self.driver_error("launch", e));
            }
        };

        if ack.confirmed() {
            self.registry.mark_acknowledged(&task_id);
            info!(task = %task_id, offer = %offer.id, "task launched");
        } else {
            warn!(
                task = %task_id,
                status = ack.status.as_str(),
                "launch not confirmed; task will be reconciled"
            );
        }
        self.metrics.record_launch();
        Ok(true)
    }

    async fn decline(
        &self,
        driver: &dyn SchedulerDriver,
        offer_id: &OfferId,
        refuse_seconds: f64,
    ) -> Result<(), CoreError> {
        driver
            .decline_offer(offer_id, Filters::refuse(refuse_seconds))
            .await
            .map_err(|e| self.driver_error("decline", e))
    }

    async fn reconcile_unacknowledged(&self, driver: &dyn SchedulerDriver) -> Result<(), CoreError> {
        let pending = self.registry.list_unacknowledged();
        if pending.is_empty() {
            return Ok(());
        }

        debug!(tasks = pending.len(), "reconciling unconfirmed launches");
        driver
            .reconcile_tasks(&pending)
            .await
            .map_err(|e| self.driver_error("reconcile", e))
    }

    fn driver_error(&self, op: &'static str, err: DriverError) -> CoreError {
        error!(op, error = %err, "driver call failed");
        self.metrics.record_driver_error(op);
        CoreError::Driver(err)
    }
}

#[cfg(test)]
mod tests {
    use tender_model::{CPUS, MEM, PORTS, Resource, TaskId, ValueRange};

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        planner::OfferTally,
        testing::{Call, RecordingDriver},
    };

    /// First-fit planner that counts how often it is asked.
    #[derive(Default)]
    struct CountingPlanner {
        tallies: AtomicUsize,
    }

    impl ResourcePlanner for CountingPlanner {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn tally(&self, offer: &Offer) -> OfferTally {
            self.tallies.fetch_add(1, Ordering::SeqCst);
            FirstFitPlanner.tally(offer)
        }
    }

    fn scheduler() -> OfferScheduler {
        OfferScheduler::new(
            ResourceRequirement::new(0.5, 128.0).unwrap(),
            TaskTemplate::default(),
        )
    }

    fn offer(id: &str, cpus: f64, mem: f64) -> Offer {
        Offer::new(id, "agent-1", "host-a")
            .with_resource(Resource::scalar(CPUS, cpus))
            .with_resource(Resource::scalar(MEM, mem))
            .with_resource(Resource::ranges(
                PORTS,
                vec![ValueRange::new(31000, 31010).unwrap()],
            ))
    }

    #[tokio::test]
    async fn sufficient_offer_launches_one_task() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();

        let launches = driver.launches();
        assert_eq!(launches.len(), 1);
        let (offer_ids, tasks, filters) = &launches[0];
        assert_eq!(offer_ids, &vec![OfferId::from("o1")]);
        assert_eq!(filters.refuse_seconds, 10.0);

        let task = &tasks[0];
        assert_eq!(task.hostname, "host-a");
        assert_eq!(task.scalar(CPUS), Some(0.5));
        assert_eq!(task.scalar(MEM), Some(128.0));
        assert_eq!(task.ranges(PORTS), Some(&[ValueRange::single(31000)][..]));

        assert!(sched.launched());
        let rec = sched.registry().get(&task.id).unwrap();
        assert!(rec.acknowledged);
        assert_eq!(rec.offer_id.as_str(), "o1");
    }

    #[tokio::test]
    async fn insufficient_cpu_is_declined_with_long_refusal() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        sched
            .resource_offers(&driver, vec![offer("o1", 0.2, 256.0)])
            .await
            .unwrap();

        assert_eq!(
            driver.calls(),
            vec![Call::Decline(OfferId::from("o1"), 10.0)]
        );
        assert!(!sched.launched());
    }

    #[tokio::test]
    async fn offer_without_ports_is_declined() {
        let sched = scheduler();
        let driver = RecordingDriver::new();
        let offer = Offer::new("o1", "agent-1", "host-a")
            .with_resource(Resource::scalar(CPUS, 8.0))
            .with_resource(Resource::scalar(MEM, 4096.0));

        sched.resource_offers(&driver, vec![offer]).await.unwrap();

        assert_eq!(driver.calls(), vec![Call::Decline(OfferId::from("o1"), 10.0)]);
    }

    #[tokio::test]
    async fn rest_of_batch_is_declined_after_launch() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        sched
            .resource_offers(
                &driver,
                vec![offer("o1", 0.1, 256.0), offer("o2", 1.0, 256.0), offer("o3", 4.0, 4096.0)],
            )
            .await
            .unwrap();

        let calls = driver.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::Decline(OfferId::from("o1"), 10.0));
        assert!(matches!(&calls[1], Call::Launch(ids) if ids == &vec![OfferId::from("o2")]));
        assert_eq!(calls[2], Call::Decline(OfferId::from("o3"), 1.0));
    }

    #[tokio::test]
    async fn later_batches_are_declined_fast_after_launch() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();
        sched
            .resource_offers(&driver, vec![offer("o2", 2.0, 512.0), offer("o3", 2.0, 512.0)])
            .await
            .unwrap();

        assert_eq!(driver.launches().len(), 1);
        let calls = driver.calls();
        assert_eq!(calls[1], Call::Decline(OfferId::from("o2"), 1.0));
        assert_eq!(calls[2], Call::Decline(OfferId::from("o3"), 1.0));
    }

    #[tokio::test]
    async fn busy_offers_skip_the_planner() {
        let planner = Arc::new(CountingPlanner::default());
        let sched = scheduler().with_planner(planner.clone());
        let driver = RecordingDriver::new();

        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();
        assert_eq!(planner.tallies.load(Ordering::SeqCst), 1);

        sched
            .resource_offers(&driver, vec![offer("o2", 2.0, 512.0), offer("o3", 2.0, 512.0)])
            .await
            .unwrap();
        assert_eq!(planner.tallies.load(Ordering::SeqCst), 1);
        assert_eq!(driver.launches().len(), 1);
    }

    #[tokio::test]
    async fn overlapping_batches_launch_once() {
        let sched = scheduler();
        let driver = RecordingDriver::new().yielding_launch();

        let (first, second) = tokio::join!(
            sched.resource_offers(&driver, vec![offer("o1", 1.0, 256.0)]),
            sched.resource_offers(&driver, vec![offer("o2", 1.0, 256.0)]),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(driver.launches().len(), 1);
        assert_eq!(sched.registry().len(), 1);
        assert!(driver.calls().contains(&Call::Decline(OfferId::from("o2"), 1.0)));
    }

    #[tokio::test]
    async fn capacity_taken_after_evaluation_declines_fast() {
        let sched = scheduler();
        let driver = RecordingDriver::new();
        let reservation = Reservation {
            cpus: 0.5,
            mem: 128.0,
            port: ValueRange::single(31000),
        };
        let held = offer("o1", 1.0, 256.0);
        assert!(sched.launch(&driver, &held, &reservation).await.unwrap());

        assert!(!sched.launch(&driver, &offer("o2", 1.0, 256.0), &reservation).await.unwrap());
        assert_eq!(driver.launches().len(), 1);
    }

    #[tokio::test]
    async fn finished_task_keeps_capacity_used() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();
        let id = driver.launches()[0].1[0].id.clone();

        let action = sched
            .status_update(&driver, StatusReport::new(id, TaskState::Finished))
            .await
            .unwrap();
        assert_eq!(action, StatusAction::Continue);

        sched
            .resource_offers(&driver, vec![offer("o2", 1.0, 256.0)])
            .await
            .unwrap();
        assert_eq!(driver.launches().len(), 1);
    }

    #[tokio::test]
    async fn larger_capacity_launches_one_task_per_offer() {
        let sched = scheduler().with_policy(SchedulerPolicy {
            max_tasks: 2,
            ..Default::default()
        });
        let driver = RecordingDriver::new();

        sched
            .resource_offers(
                &driver,
                vec![offer("o1", 1.0, 256.0), offer("o2", 1.0, 256.0), offer("o3", 1.0, 256.0)],
            )
            .await
            .unwrap();

        assert_eq!(driver.launches().len(), 2);
        assert_eq!(sched.registry().len(), 2);
        assert_eq!(driver.calls()[2], Call::Decline(OfferId::from("o3"), 1.0));
    }

    #[tokio::test]
    async fn launch_failure_is_returned_and_nothing_is_tracked() {
        let sched = scheduler();
        let driver = RecordingDriver::new().failing_launch();

        let err = sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0), offer("o2", 1.0, 256.0)])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Driver(DriverError::Unreachable(_))));
        assert!(!sched.launched());
        assert!(sched.registry().list_unacknowledged().is_empty());
        // the batch stops at the failed launch
        assert_eq!(driver.calls().len(), 1);
    }

    #[tokio::test]
    async fn unconfirmed_launch_holds_capacity_and_is_reconciled() {
        let sched = scheduler();
        let driver = RecordingDriver::new().with_launch_status(DriverStatus::NotStarted);

        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();
        let id = driver.launches()[0].1[0].id.clone();
        assert!(!sched.registry().get(&id).unwrap().acknowledged);

        sched
            .resource_offers(&driver, vec![offer("o2", 1.0, 256.0)])
            .await
            .unwrap();

        let calls = driver.calls();
        assert_eq!(calls[1], Call::Reconcile(vec![id.clone()]));
        assert_eq!(calls[2], Call::Decline(OfferId::from("o2"), 1.0));
        assert_eq!(driver.launches().len(), 1);

        sched
            .status_update(&driver, StatusReport::new(id.clone(), TaskState::Running))
            .await
            .unwrap();
        assert!(sched.registry().get(&id).unwrap().acknowledged);

        sched.resource_offers(&driver, vec![]).await.unwrap();
        assert_eq!(driver.calls().len(), 3);
    }

    #[tokio::test]
    async fn running_and_finished_take_no_driver_action() {
        let sched = scheduler();
        let driver = RecordingDriver::new();

        for state in [TaskState::Running, TaskState::Finished, TaskState::Staging, TaskState::Unknown] {
            let action = sched
                .status_update(&driver, StatusReport::new("t-1", state))
                .await
                .unwrap();
            assert_eq!(action, StatusAction::Continue);
        }
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn fault_states_abort_exactly_once() {
        for state in [TaskState::Lost, TaskState::Killed, TaskState::Failed] {
            let sched = scheduler();
            let driver = RecordingDriver::new();

            let action = sched
                .status_update(
                    &driver,
                    StatusReport::new(TaskId::from("x"), state).with_message("boom"),
                )
                .await
                .unwrap();

            assert_eq!(action, StatusAction::Abort(DriverStatus::Aborted));
            assert_eq!(driver.calls(), vec![Call::Abort]);
        }
    }

    #[tokio::test]
    async fn failure_of_tracked_task_is_recorded() {
        let sched = scheduler();
        let driver = RecordingDriver::new();
        sched
            .resource_offers(&driver, vec![offer("o1", 1.0, 256.0)])
            .await
            .unwrap();
        let id = driver.launches()[0].1[0].id.clone();

        sched
            .status_update(
                &driver,
                StatusReport::new(id.clone(), TaskState::Failed).with_message("exit 1"),
            )
            .await
            .unwrap();

        let rec = sched.registry().get(&id).unwrap();
        assert_eq!(rec.state, TaskState::Failed);
        assert_eq!(rec.message.as_deref(), Some("exit 1"));
    }
}
