//! Orchestrated execution: gate, paced attempts, backoff

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use locator_registry::SelectorRegistry;
use page_adapter::{ElementHandle, ElementState, NavWait, PageDriver};
use preflight_gate::RiskEngine;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use webpilot_core_types::{ActionId, ActionKind};

use crate::errors::ActionError;
use crate::pacing::DelayRange;
use crate::types::{ActionOutcome, OrchestratorConfig, RetryContext, RetryStatus};

/// Action orchestrator
///
/// Wraps a user-supplied unit of work with the admission gate, human-pacing
/// delays, and exponential-backoff retries. One orchestrator is bound to one
/// browser session; callers must not run two `execute` calls concurrently
/// against the same session (see [`crate::session::SessionGate`]).
pub struct Orchestrator {
    gate: Arc<RiskEngine>,
    registry: Arc<SelectorRegistry>,
    driver: Arc<dyn PageDriver>,
    config: OrchestratorConfig,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        gate: Arc<RiskEngine>,
        registry: Arc<SelectorRegistry>,
        driver: Arc<dyn PageDriver>,
    ) -> Self {
        Self::with_config(gate, registry, driver, OrchestratorConfig::default())
    }

    pub fn with_config(
        gate: Arc<RiskEngine>,
        registry: Arc<SelectorRegistry>,
        driver: Arc<dyn PageDriver>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            gate,
            registry,
            driver,
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn gate(&self) -> &Arc<RiskEngine> {
        &self.gate
    }

    pub fn registry(&self) -> &Arc<SelectorRegistry> {
        &self.registry
    }

    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Token cancelling every pending delay of this orchestrator
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute `work` behind the admission gate with retries
    ///
    /// The gate runs first and is side-effect-free: a rejection returns the
    /// risk diagnostics without invoking `work` at all, and is never retried
    /// here - retrying an admission rejection unchanged would only burn more
    /// of the rate budget. On a successful attempt the action is recorded
    /// with the gate exactly once.
    pub async fn execute<T, F, Fut>(
        &self,
        kind: &ActionKind,
        account_age_days: Option<u32>,
        work: F,
    ) -> ActionOutcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ActionError>>,
    {
        let action_id = ActionId::new();
        let assessment = self.gate.check(kind, account_age_days);
        if !assessment.passed {
            warn!(
                action_id = %action_id,
                kind = %kind,
                risk_score = assessment.risk_score,
                failed = ?assessment.failed_checks,
                "Action rejected by preflight gate"
            );
            return ActionOutcome::rejected(&assessment);
        }

        let mut retry = RetryContext::new();
        while retry.attempt < self.config.max_retries {
            retry.begin_attempt();

            if self.pause(&self.config.pacing.pre_action).await.is_err() {
                retry.status = RetryStatus::Failed;
                return ActionOutcome::failed(ActionError::Cancelled.to_string(), retry.attempt);
            }

            match work().await {
                Ok(data) => {
                    self.gate.record_action(kind);
                    retry.status = RetryStatus::Succeeded;
                    info!(
                        action_id = %action_id,
                        kind = %kind,
                        attempts = retry.attempt,
                        latency_ms = retry.started_at.elapsed().as_millis() as u64,
                        "Action succeeded"
                    );
                    return ActionOutcome::succeeded(data, retry.attempt);
                }
                Err(err) => {
                    warn!(
                        action_id = %action_id,
                        kind = %kind,
                        attempt = retry.attempt,
                        error = %err,
                        "Action attempt failed"
                    );

                    if retry.attempt < self.config.max_retries {
                        let backoff = self.backoff_delay(retry.attempt);
                        retry.push_backoff(backoff);
                        debug!(
                            action_id = %action_id,
                            backoff_ms = backoff.as_millis() as u64,
                            "Retrying after backoff"
                        );
                        if self.sleep(backoff).await.is_err() {
                            retry.status = RetryStatus::Failed;
                            return ActionOutcome::failed(
                                ActionError::Cancelled.to_string(),
                                retry.attempt,
                            );
                        }
                    } else {
                        retry.status = RetryStatus::Failed;
                        return ActionOutcome::failed(err.to_string(), retry.attempt);
                    }
                }
            }
        }

        // Unreachable with a positive max_retries; kept so a zero-attempt
        // configuration still reports a terminal failure.
        ActionOutcome::failed("Max retries exceeded", self.config.max_retries)
    }

    /// Exponential backoff with jitter: `base * 2^(attempt-1) + uniform(0,1)s`
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
        let base = self
            .config
            .retry_delay_base_ms
            .saturating_mul(exponent)
            .min(self.config.retry_backoff_cap_ms);
        let jitter = rand::thread_rng().gen_range(0..1_000);
        Duration::from_millis(base + jitter)
    }

    /// Cancellable sleep for a sampled pacing delay
    async fn pause(&self, range: &DelayRange) -> Result<(), ActionError> {
        self.sleep(range.sample()).await
    }

    /// Cancellable sleep
    async fn sleep(&self, duration: Duration) -> Result<(), ActionError> {
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.cancel.cancelled() => Err(ActionError::Cancelled),
        }
    }

    /// Type text character by character with per-keystroke delays
    pub async fn human_type(
        &self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), ActionError> {
        for ch in text.chars() {
            self.driver.type_char(element, ch).await?;
            self.pause(&self.config.pacing.per_char).await?;
        }
        Ok(())
    }

    /// Click with pre/post delays and a randomized pointer position
    ///
    /// The pointer move is best-effort: elements without a usable bounding
    /// box are clicked directly.
    pub async fn human_click(&self, element: &ElementHandle) -> Result<(), ActionError> {
        self.pause(&self.config.pacing.around_click).await?;

        match self.driver.bounding_box(element).await {
            Ok(Some(bbox)) => {
                let (x, y) = if bbox.width > 10.0 && bbox.height > 10.0 {
                    let mut rng = rand::thread_rng();
                    (
                        bbox.x + rng.gen_range(5.0..bbox.width - 5.0),
                        bbox.y + rng.gen_range(5.0..bbox.height - 5.0),
                    )
                } else {
                    bbox.center()
                };
                match self.driver.move_pointer(x, y).await {
                    Ok(()) => self.pause(&self.config.pacing.pointer_settle).await?,
                    Err(err) => debug!(error = %err, "Pointer move unavailable"),
                }
            }
            Ok(None) => {}
            Err(err) => debug!(error = %err, "Bounding box unavailable"),
        }

        self.driver.click(element).await?;
        self.pause(&self.config.pacing.around_click).await?;
        Ok(())
    }

    /// Scroll a distance in several randomized steps
    pub async fn scroll_slowly(&self, distance: i64) -> Result<(), ActionError> {
        let steps = self.config.pacing.scroll_steps() as i64;
        let step = distance / steps.max(1);

        for _ in 0..steps {
            self.driver
                .evaluate_script(&format!("window.scrollBy(0, {step})"))
                .await?;
            self.pause(&self.config.pacing.scroll_pause).await?;
        }
        Ok(())
    }

    /// Wait for a named target via the registry's fallback chain
    ///
    /// Returns `None` on exhaustion instead of failing; `work` decides
    /// whether that aborts the attempt.
    pub async fn wait_for_element(
        &self,
        target_name: &str,
        timeout: Duration,
        state: ElementState,
    ) -> Option<ElementHandle> {
        self.registry
            .resolve_with(self.driver.as_ref(), target_name, state, timeout)
            .await
    }

    /// Navigate with a bounded timeout and a human settle delay
    ///
    /// Returns `false` instead of failing so `work` can branch to a
    /// domain-specific fallback without aborting the whole attempt.
    pub async fn safe_navigate(&self, url: &str, wait_until: NavWait) -> bool {
        let timeout = Duration::from_millis(self.config.navigate_timeout_ms);
        match self.driver.navigate(url, wait_until, timeout).await {
            Ok(()) => {
                let _ = self.pause(&self.config.pacing.post_nav).await;
                true
            }
            Err(err) => {
                error!(url, error = %err, "Navigation failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use page_adapter::{BoundingBox, Locator, PageError};
    use preflight_gate::{ManualClock, RiskPolicy};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct NullDriver;

    #[async_trait]
    impl PageDriver for NullDriver {
        async fn navigate(
            &self,
            _url: &str,
            _wait_until: NavWait,
            _timeout: Duration,
        ) -> Result<(), PageError> {
            Ok(())
        }

        async fn query(
            &self,
            _locator: &Locator,
            _timeout: Duration,
        ) -> Result<Option<ElementHandle>, PageError> {
            Ok(None)
        }

        async fn wait_for(
            &self,
            _locator: &Locator,
            _state: ElementState,
            _timeout: Duration,
        ) -> Result<Option<ElementHandle>, PageError> {
            Ok(None)
        }

        async fn click(&self, _element: &ElementHandle) -> Result<(), PageError> {
            Ok(())
        }

        async fn type_char(&self, _element: &ElementHandle, _ch: char) -> Result<(), PageError> {
            Ok(())
        }

        async fn move_pointer(&self, _x: f64, _y: f64) -> Result<(), PageError> {
            Ok(())
        }

        async fn bounding_box(
            &self,
            _element: &ElementHandle,
        ) -> Result<Option<BoundingBox>, PageError> {
            Ok(None)
        }

        async fn evaluate_script(
            &self,
            _expression: &str,
        ) -> Result<serde_json::Value, PageError> {
            Ok(serde_json::Value::Null)
        }

        async fn screenshot(&self) -> Result<Vec<u8>, PageError> {
            Ok(Vec::new())
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Arc::new(RiskEngine::new(RiskPolicy::default())),
            Arc::new(SelectorRegistry::new()),
            Arc::new(NullDriver),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_and_records_once() {
        let orchestrator = orchestrator();
        let kind = ActionKind::new("post");
        let calls = AtomicU32::new(0);

        let outcome = orchestrator
            .execute(&kind, None, || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < 2 {
                        Err(ActionError::failed("transient"))
                    } else {
                        Ok(42u32)
                    }
                }
            })
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.data, Some(42));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(orchestrator.gate().action_count(&kind), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_last_error() {
        let orchestrator = orchestrator();
        let kind = ActionKind::new("post");

        let outcome: ActionOutcome<()> = orchestrator
            .execute(&kind, None, || async {
                Err(ActionError::failed("element vanished"))
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.error.as_deref(), Some("element vanished"));
        assert_eq!(orchestrator.gate().action_count(&kind), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn gate_rejection_never_invokes_work() {
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
        let gate = Arc::new(RiskEngine::with_clock(RiskPolicy::default(), clock));
        let kind = ActionKind::new("group_join");

        // Five rapid joins trip both the rate (0.4) and burst (0.3) checks.
        for _ in 0..5 {
            gate.record_action(&kind);
        }

        let orchestrator = Orchestrator::new(
            gate,
            Arc::new(SelectorRegistry::new()),
            Arc::new(NullDriver),
        );

        let calls = AtomicU32::new(0);
        let outcome: ActionOutcome<()> = orchestrator
            .execute(&kind, None, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Preflight check failed"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.risk_score.unwrap() >= 0.7);
        assert!(outcome
            .failed_checks
            .contains(&"rate_limit".to_string()));
        assert!(outcome
            .failed_checks
            .contains(&"suspicious_patterns".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_surfaces_as_failure() {
        let orchestrator = orchestrator();
        orchestrator.cancellation_token().cancel();

        let outcome: ActionOutcome<()> = orchestrator
            .execute(&ActionKind::new("like"), None, || async { Ok(()) })
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Cancelled"));
    }

    #[test]
    fn backoff_grows_exponentially_with_jitter() {
        let orchestrator = orchestrator();

        let first = orchestrator.backoff_delay(1).as_millis() as u64;
        assert!((2_000..3_000).contains(&first));

        let second = orchestrator.backoff_delay(2).as_millis() as u64;
        assert!((4_000..5_000).contains(&second));

        let capped = orchestrator.backoff_delay(12).as_millis() as u64;
        assert!((60_000..61_000).contains(&capped));
    }

    #[tokio::test(start_paused = true)]
    async fn safe_navigate_reports_success() {
        let orchestrator = orchestrator();
        assert!(
            orchestrator
                .safe_navigate("https://example.com/feed", NavWait::NetworkIdle)
                .await
        );
    }
}
