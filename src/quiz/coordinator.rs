use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::quiz::report::{
    FallbackPolicy, ReportError, ReportGenerator, ReportOrigin, ReportRequest, SettledReport,
};
use crate::quiz::scoring::ScoreSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Settled(SettledReport),
}

/// Snapshot of a coordinator. `generation` changes on every reset so a
/// response started for an earlier run can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorState {
    pub generation: u64,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Settled(SettledReport),
    /// A fetch is already running or finished for this run.
    AlreadyRequested,
    /// The run was restarted while the fetch was in flight.
    Stale,
    IncompleteSummary,
}

/// Drives at most one report fetch per quiz run: `Idle -> Fetching -> Settled`.
pub struct ReportCoordinator {
    generator: Arc<dyn ReportGenerator>,
    policy: FallbackPolicy,
    deadline: Duration,
    state: watch::Sender<CoordinatorState>,
}

impl ReportCoordinator {
    pub fn new(
        generator: Arc<dyn ReportGenerator>,
        policy: FallbackPolicy,
        deadline: Duration,
    ) -> Self {
        let (state, _) = watch::channel(CoordinatorState {
            generation: 0,
            phase: Phase::Idle,
        });
        Self {
            generator,
            policy,
            deadline,
            state,
        }
    }

    /// Identifies the current run. Capture it when the run enters
    /// diagnosis and hand it to [`request_report`](Self::request_report).
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    /// Forgets the current run and returns the new generation. A fetch still
    /// in flight will be discarded when it returns.
    pub fn reset(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = Phase::Idle;
            generation = state.generation;
        });
        generation
    }

    /// The settled report of `generation`, if that run is still current.
    pub fn settled(&self, generation: u64) -> Option<SettledReport> {
        let state = self.state.borrow();
        match &state.phase {
            Phase::Settled(settled) if state.generation == generation => Some(settled.clone()),
            _ => None,
        }
    }

    /// Fetches the report for run `generation`. Only an idle coordinator
    /// still on that generation is claimed; a caller from an earlier run
    /// gets `Stale` and leaves the state untouched.
    pub async fn request_report(
        &self,
        generation: u64,
        summary: &ScoreSummary,
        request: ReportRequest,
    ) -> RequestOutcome {
        if !summary.is_complete() {
            warn!("Report requested for an incomplete summary, ignoring");
            return RequestOutcome::IncompleteSummary;
        }

        // Claimed before the first await, so a second caller sees Fetching.
        let mut current = generation;
        let claimed = self.state.send_if_modified(|state| {
            current = state.generation;
            if state.generation != generation || state.phase != Phase::Idle {
                return false;
            }
            state.phase = Phase::Fetching;
            true
        });
        if current != generation {
            debug!(
                "Report requested for generation {} but the run is at {}",
                generation, current
            );
            return RequestOutcome::Stale;
        }
        if !claimed {
            debug!("Report already requested for this run");
            return RequestOutcome::AlreadyRequested;
        }

        info!(
            "Requesting report (generation {}, total score {})",
            generation, summary.total
        );
        let result = match tokio::time::timeout(self.deadline, self.generator.generate(&request)).await
        {
            Ok(result) => result.and_then(|report| report.validate()),
            Err(_) => Err(ReportError::Timeout(self.deadline)),
        };

        let settled = match result {
            Ok(report) => SettledReport {
                report,
                origin: ReportOrigin::Generated,
            },
            Err(err) => {
                warn!("Report generation failed, using fallback: {}", err);
                SettledReport {
                    report: self.policy.report(summary),
                    origin: ReportOrigin::Fallback(err.to_string()),
                }
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if state.generation != generation || state.phase != Phase::Fetching {
                return false;
            }
            state.phase = Phase::Settled(settled.clone());
            true
        });
        if !applied {
            debug!("Discarding report from stale generation {}", generation);
            return RequestOutcome::Stale;
        }

        info!(
            "Report settled with persona '{}' (fallback: {})",
            settled.report.selected_persona_id,
            settled.is_fallback()
        );
        RequestOutcome::Settled(settled)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::quiz::catalog::Catalog;
    use crate::quiz::persona::PersonaTable;
    use crate::quiz::report::Report;
    use crate::quiz::scoring::summarize;
    use crate::quiz::AnswerSet;

    /// Counts calls, optionally waits for a gate, then replies with a fixed
    /// report or fails.
    pub(crate) struct ScriptedGenerator {
        pub calls: AtomicUsize,
        pub gate: Option<Arc<Notify>>,
        pub reply: Option<Report>,
    }

    impl ScriptedGenerator {
        pub fn replying(persona: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                reply: Some(report_with(persona)),
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                reply: None,
            }
        }

        pub fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    #[async_trait]
    impl ReportGenerator for ScriptedGenerator {
        async fn generate(&self, _request: &ReportRequest) -> Result<Report, ReportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply
                .clone()
                .ok_or_else(|| ReportError::Backend("connection refused".to_string()))
        }
    }

    struct NeverReplies;

    #[async_trait]
    impl ReportGenerator for NeverReplies {
        async fn generate(&self, _request: &ReportRequest) -> Result<Report, ReportError> {
            std::future::pending::<()>().await;
            Err(ReportError::EmptyResponse)
        }
    }

    pub(crate) fn report_with(persona: &str) -> Report {
        Report {
            selected_persona_id: persona.to_string(),
            persona_explanation: "explanation".to_string(),
            persona_overview: "overview".to_string(),
            appearance_analysis: "appearance".to_string(),
            social_analysis: "social".to_string(),
            interaction_analysis: "interaction".to_string(),
            mindset_analysis: "mindset".to_string(),
            coach_general_advice: "advice".to_string(),
        }
    }

    fn answered(value: Option<u8>) -> (ScoreSummary, ReportRequest) {
        let catalog = Catalog::builtin();
        let mut answers = AnswerSet::default();
        if let Some(value) = value {
            for question in catalog.questions() {
                answers.insert(question.id, value);
            }
        }
        let summary = summarize(&answers, &catalog);
        let request = ReportRequest::new(&summary, &answers, &catalog);
        (summary, request)
    }

    fn coordinator(generator: Arc<dyn ReportGenerator>) -> Arc<ReportCoordinator> {
        Arc::new(ReportCoordinator::new(
            generator,
            FallbackPolicy::default(),
            Duration::from_secs(30),
        ))
    }

    async fn wait_for_fetching(coordinator: &ReportCoordinator) {
        let mut rx = coordinator.subscribe();
        rx.wait_for(|s| s.phase == Phase::Fetching).await.unwrap();
    }

    #[tokio::test]
    async fn full_marks_resolve_to_the_charmer() {
        let generator = Arc::new(ScriptedGenerator::replying("charmer"));
        let coordinator = coordinator(generator.clone());
        let (summary, request) = answered(Some(3));
        assert_eq!(summary.total, 48);

        let outcome = coordinator.request_report(0, &summary, request).await;
        let RequestOutcome::Settled(settled) = outcome else {
            panic!("expected a settled report, got {outcome:?}");
        };
        assert_eq!(settled.origin, ReportOrigin::Generated);
        assert_eq!(
            PersonaTable::builtin().unwrap().resolve(&settled.report.selected_persona_id).id,
            "charmer"
        );
        assert_eq!(coordinator.phase(), Phase::Settled(settled));
    }

    #[tokio::test]
    async fn second_request_while_fetching_is_ignored() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(ScriptedGenerator::replying("sage").gated(gate.clone()));
        let coordinator = coordinator(generator.clone());
        let (summary, request) = answered(Some(2));

        let first = {
            let coordinator = coordinator.clone();
            let summary = summary.clone();
            let request = request.clone();
            tokio::spawn(async move { coordinator.request_report(0, &summary, request).await })
        };
        wait_for_fetching(&coordinator).await;

        let second = coordinator.request_report(0, &summary, request.clone()).await;
        assert_eq!(second, RequestOutcome::AlreadyRequested);

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, RequestOutcome::Settled(_)));

        let third = coordinator.request_report(0, &summary, request).await;
        assert_eq!(third, RequestOutcome::AlreadyRequested);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_settles_on_fallback() {
        let coordinator = coordinator(Arc::new(ScriptedGenerator::failing()));
        let (summary, request) = answered(Some(1));

        let RequestOutcome::Settled(settled) = coordinator.request_report(0, &summary, request).await
        else {
            panic!("expected a settled report");
        };
        assert!(settled.is_fallback());
        assert!(PersonaTable::builtin().unwrap()
            .ids()
            .contains(&settled.report.selected_persona_id.as_str()));
        assert!(matches!(coordinator.phase(), Phase::Settled(_)));
    }

    #[tokio::test]
    async fn blank_generated_persona_falls_back() {
        let coordinator = coordinator(Arc::new(ScriptedGenerator::replying("   ")));
        let (summary, request) = answered(None);

        let RequestOutcome::Settled(settled) = coordinator.request_report(0, &summary, request).await
        else {
            panic!("expected a settled report");
        };
        assert!(settled.is_fallback());
        assert_eq!(settled.report.selected_persona_id, "neighbor");
    }

    #[tokio::test]
    async fn empty_summary_fallback_is_the_low_score_persona() {
        let coordinator = coordinator(Arc::new(ScriptedGenerator::failing()));
        let (summary, request) = answered(None);
        assert_eq!(summary.total, 0);

        let RequestOutcome::Settled(settled) = coordinator.request_report(0, &summary, request).await
        else {
            panic!("expected a settled report");
        };
        let persona = PersonaTable::builtin().unwrap().resolve(&settled.report.selected_persona_id).id;
        assert_eq!(persona, FallbackPolicy::default().neutral_persona_id);
    }

    #[tokio::test]
    async fn incomplete_summary_changes_nothing() {
        let generator = Arc::new(ScriptedGenerator::replying("charmer"));
        let coordinator = coordinator(generator.clone());
        let (mut summary, request) = answered(Some(3));
        summary.dimensions.pop();

        let outcome = coordinator.request_report(0, &summary, request).await;
        assert_eq!(outcome, RequestOutcome::IncompleteSummary);
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn late_reply_after_reset_is_discarded() {
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(ScriptedGenerator::replying("statue").gated(gate.clone()));
        let coordinator = coordinator(generator.clone());
        let (summary, request) = answered(Some(2));

        let stale = {
            let coordinator = coordinator.clone();
            let summary = summary.clone();
            let request = request.clone();
            tokio::spawn(async move { coordinator.request_report(0, &summary, request).await })
        };
        wait_for_fetching(&coordinator).await;

        assert_eq!(coordinator.reset(), 1);
        assert_eq!(coordinator.generation(), 1);
        gate.notify_one();

        assert_eq!(stale.await.unwrap(), RequestOutcome::Stale);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_generator_times_out_into_fallback() {
        let coordinator = Arc::new(ReportCoordinator::new(
            Arc::new(NeverReplies),
            FallbackPolicy::default(),
            Duration::from_secs(5),
        ));
        let (summary, request) = answered(Some(3));

        let RequestOutcome::Settled(settled) = coordinator.request_report(0, &summary, request).await
        else {
            panic!("expected a settled report");
        };
        assert_eq!(
            settled.origin,
            ReportOrigin::Fallback(ReportError::Timeout(Duration::from_secs(5)).to_string())
        );
        assert_eq!(settled.report.selected_persona_id, "charmer");
    }

    #[tokio::test]
    async fn reset_after_settle_returns_to_idle() {
        let coordinator = coordinator(Arc::new(ScriptedGenerator::replying("hustler")));
        let (summary, request) = answered(Some(2));
        coordinator.request_report(0, &summary, request.clone()).await;
        assert!(coordinator.settled(0).is_some());

        let generation = coordinator.reset();
        assert_eq!(generation, 1);
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert_eq!(coordinator.settled(0), None);

        assert_eq!(
            coordinator.request_report(0, &summary, request.clone()).await,
            RequestOutcome::Stale
        );
        let RequestOutcome::Settled(settled) =
            coordinator.request_report(generation, &summary, request).await
        else {
            panic!("expected a settled report");
        };
        assert_eq!(coordinator.settled(generation), Some(settled));
    }

    #[tokio::test]
    async fn restart_before_the_old_run_claims_leaves_the_new_run_alone() {
        let generator = Arc::new(ScriptedGenerator::replying("sage"));
        let coordinator = coordinator(generator.clone());
        let (old_summary, old_request) = answered(Some(3));
        let (new_summary, new_request) = answered(Some(1));

        let old_run = coordinator.generation();
        let new_run = coordinator.reset();

        let outcome = coordinator
            .request_report(old_run, &old_summary, old_request)
            .await;
        assert_eq!(outcome, RequestOutcome::Stale);
        assert_eq!(
            coordinator.subscribe().borrow().clone(),
            CoordinatorState {
                generation: new_run,
                phase: Phase::Idle
            }
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        let outcome = coordinator
            .request_report(new_run, &new_summary, new_request)
            .await;
        assert!(matches!(outcome, RequestOutcome::Settled(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }
}
