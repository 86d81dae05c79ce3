//! End-to-end flow: gate, registry and orchestrator wired together against a
//! scripted page driver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use action_orchestrator::{ActionError, Orchestrator};
use async_trait::async_trait;
use locator_registry::{SelectorCandidate, SelectorKind, SelectorRegistry};
use page_adapter::{
    BoundingBox, ElementHandle, ElementState, Locator, NavWait, PageDriver, PageError,
};
use parking_lot::Mutex;
use preflight_gate::{ManualClock, RiskEngine, RiskPolicy};
use webpilot_core_types::ActionKind;

/// Driver scripted with a selector-value -> element table. The first
/// `misses_before_ready` element lookups come back empty, simulating a page
/// that has not finished rendering.
struct ScriptedDriver {
    elements: HashMap<String, ElementHandle>,
    misses_before_ready: AtomicU32,
    clicks: Mutex<Vec<String>>,
    typed: Mutex<String>,
}

impl ScriptedDriver {
    fn new(entries: &[(&str, &str)], misses_before_ready: u32) -> Self {
        Self {
            elements: entries
                .iter()
                .map(|(selector, id)| (selector.to_string(), ElementHandle::new(*id)))
                .collect(),
            misses_before_ready: AtomicU32::new(misses_before_ready),
            clicks: Mutex::new(Vec::new()),
            typed: Mutex::new(String::new()),
        }
    }

    fn lookup(&self, locator: &Locator) -> Option<ElementHandle> {
        let element = self.elements.get(locator.value()).cloned()?;
        let remaining = self.misses_before_ready.load(Ordering::SeqCst);
        if remaining > 0 {
            self.misses_before_ready.store(remaining - 1, Ordering::SeqCst);
            return None;
        }
        Some(element)
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
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
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.lookup(locator))
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        _state: ElementState,
        _timeout: Duration,
    ) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.lookup(locator))
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.clicks.lock().push(element.id.clone());
        Ok(())
    }

    async fn type_char(&self, _element: &ElementHandle, ch: char) -> Result<(), PageError> {
        self.typed.lock().push(ch);
        Ok(())
    }

    async fn move_pointer(&self, _x: f64, _y: f64) -> Result<(), PageError> {
        Ok(())
    }

    async fn bounding_box(
        &self,
        _element: &ElementHandle,
    ) -> Result<Option<BoundingBox>, PageError> {
        Ok(Some(BoundingBox {
            x: 40.0,
            y: 120.0,
            width: 200.0,
            height: 48.0,
        }))
    }

    async fn evaluate_script(&self, _expression: &str) -> Result<serde_json::Value, PageError> {
        Ok(serde_json::Value::Null)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, PageError> {
        Ok(Vec::new())
    }
}

fn post_registry() -> SelectorRegistry {
    let registry = SelectorRegistry::new();
    registry.register_target(
        "post_composer",
        vec![
            SelectorCandidate::new(
                "[role=\"textbox\"][contenteditable=\"true\"]",
                SelectorKind::Css,
                1,
            ),
            SelectorCandidate::new("//div[@role=\"textbox\"]", SelectorKind::XPath, 2),
        ],
    );
    registry.register_target(
        "post_submit",
        vec![SelectorCandidate::new(
            "[aria-label=\"Post\"]",
            SelectorKind::Css,
            1,
        )],
    );
    registry
}

#[tokio::test(start_paused = true)]
async fn posting_flow_succeeds_first_attempt() {
    let driver = Arc::new(ScriptedDriver::new(
        &[
            ("//div[@role=\"textbox\"]", "composer-el"),
            ("[aria-label=\"Post\"]", "submit-el"),
        ],
        0,
    ));
    let orchestrator = Orchestrator::new(
        Arc::new(RiskEngine::new(RiskPolicy::default())),
        Arc::new(post_registry()),
        driver.clone(),
    );

    let kind = ActionKind::new("post");
    let orch = &orchestrator;
    let outcome = orchestrator
        .execute(&kind, None, || async move {
            if !orch.safe_navigate("https://example.com/feed", NavWait::NetworkIdle).await {
                return Err(ActionError::Navigation("feed unreachable".to_string()));
            }

            let composer = orch
                .wait_for_element("post_composer", Duration::from_secs(10), ElementState::Visible)
                .await
                .ok_or_else(|| ActionError::ElementMissing("post_composer".to_string()))?;
            orch.human_click(&composer).await?;
            orch.human_type(&composer, "hello from webpilot").await?;

            let submit = orch
                .wait_for_element("post_submit", Duration::from_secs(10), ElementState::Visible)
                .await
                .ok_or_else(|| ActionError::ElementMissing("post_submit".to_string()))?;
            orch.human_click(&submit).await?;
            Ok("posted")
        })
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.data, Some("posted"));
    assert_eq!(orchestrator.gate().action_count(&kind), 1);
    assert_eq!(*driver.typed.lock(), "hello from webpilot");
    assert_eq!(*driver.clicks.lock(), vec!["composer-el", "submit-el"]);

    // The CSS primary missed once (the page only matches the XPath
    // fallback); the registry's health report reflects it.
    let report = orchestrator.registry().health_report();
    let composer_stats = &report.targets["post_composer"];
    let primary = composer_stats
        .iter()
        .find(|c| c.value.starts_with("[role="))
        .unwrap();
    assert_eq!(primary.total_uses, 1);
    assert_eq!(primary.success_rate, 0.0);
    let fallback = composer_stats
        .iter()
        .find(|c| c.value.starts_with("//div"))
        .unwrap();
    assert!(fallback.success_rate > 0.0);
}

#[tokio::test(start_paused = true)]
async fn slow_page_is_absorbed_by_retries() {
    // Both composer candidates miss on the first attempt; the retry finds
    // the element once the scripted misses are spent.
    let driver = Arc::new(ScriptedDriver::new(
        &[
            ("[role=\"textbox\"][contenteditable=\"true\"]", "composer-el"),
            ("[aria-label=\"Post\"]", "submit-el"),
        ],
        1,
    ));
    let orchestrator = Orchestrator::new(
        Arc::new(RiskEngine::new(RiskPolicy::default())),
        Arc::new(post_registry()),
        driver.clone(),
    );

    let kind = ActionKind::new("post");
    let orch = &orchestrator;
    let outcome = orchestrator
        .execute(&kind, None, || async move {
            let composer = orch
                .wait_for_element("post_composer", Duration::from_secs(5), ElementState::Visible)
                .await
                .ok_or_else(|| ActionError::ElementMissing("post_composer".to_string()))?;
            orch.human_click(&composer).await?;
            Ok(())
        })
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 2);
    assert_eq!(orchestrator.gate().action_count(&kind), 1);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_kind_is_rejected_end_to_end() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let gate = Arc::new(RiskEngine::with_clock(RiskPolicy::default(), clock.clone()));
    let kind = ActionKind::new("post");

    let fresh = gate.check(&kind, None);
    assert!(fresh.passed);
    assert_eq!(fresh.risk_score, 0.0);

    // Fill the hour window fast enough that the burst check trips alongside
    // the rate limit and pushes the score past the threshold.
    for _ in 0..8 {
        gate.record_action(&kind);
        clock.advance(chrono::Duration::seconds(1));
    }

    let driver = Arc::new(ScriptedDriver::new(&[], 0));
    let orchestrator = Orchestrator::new(gate, Arc::new(post_registry()), driver);

    let calls = AtomicU32::new(0);
    let outcome = orchestrator
        .execute(&kind, None, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

    assert!(!outcome.success);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(outcome.risk_score.unwrap() >= 0.4);
    assert!(outcome.failed_checks.contains(&"rate_limit".to_string()));
}
