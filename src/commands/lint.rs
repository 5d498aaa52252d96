use std::sync::{Arc, Mutex, PoisonError};

use crate::service::LintService;
use crate::store::{ConfigStore, LintStatusStore};
use crate::types::{LintResult, Syntax};
use crate::ui::Notifier;

const EMPTY_CODE_MESSAGE: &str = "Please enter some code";

/// Drives lint invocations against the remote engine.
///
/// Calls may overlap, but only the most recently started one is allowed to
/// touch shared state when it resolves. Older resolutions are dropped.
pub struct LintOrchestrator {
    service: LintService,
    config: Arc<ConfigStore>,
    status: Arc<LintStatusStore>,
    notifier: Arc<dyn Notifier>,
    latest: Mutex<u64>,
}

impl LintOrchestrator {
    pub fn new(
        service: LintService,
        config: Arc<ConfigStore>,
        status: Arc<LintStatusStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            service,
            config,
            status,
            notifier,
            latest: Mutex::new(0),
        }
    }

    /// Lints `code` with the current configuration.
    ///
    /// Returns the result when this call committed one. Returns `None` for
    /// empty code, a soft-empty response, a failure (already reported through
    /// the notifier), or a resolution that was superseded by a newer call.
    pub async fn run(&self, code: &str, syntax: Syntax) -> Option<LintResult> {
        if code.is_empty() {
            self.notifier.error(EMPTY_CODE_MESSAGE);
            return None;
        }

        let seq = self.begin();
        let config = self.config.get();
        let outcome = self.service.lint_code(code, &config, syntax).await;

        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != seq {
            tracing::debug!(seq, latest = *latest, "discarding stale lint resolution");
            return None;
        }

        match outcome {
            Ok(Some(result)) => {
                let has_syntax_error = detect_syntax_error(&result);
                self.status.commit_result(&result, has_syntax_error);
                Some(result)
            }
            Ok(None) => {
                self.status.set_loading(false);
                None
            }
            Err(e) => {
                self.status.set_loading(false);
                drop(latest);
                tracing::error!(error = %e, "lint run failed");
                self.notifier.error(&e.user_message());
                None
            }
        }
    }

    /// Clears the cached result. Callers must not reset while loading.
    pub fn reset(&self) {
        self.status.reset();
    }

    pub fn toggle_rules(&self) {
        self.status.toggle_show_rules();
    }

    fn begin(&self) -> u64 {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest += 1;
        self.status.begin_run();
        *latest
    }
}

/// Prefers the engine's explicit flag; otherwise looks for "syntaxerror" in
/// the output, ignoring case.
pub fn detect_syntax_error(result: &LintResult) -> bool {
    result
        .has_syntax_error
        .unwrap_or_else(|| result.output.to_lowercase().contains("syntaxerror"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LintError;
    use crate::storage::MemoryStore;
    use crate::testing::{RecordingNotifier, ScriptedTransport};
    use crate::types::RuleValue;
    use serde_json::{json, Value};

    struct Harness {
        orchestrator: Arc<LintOrchestrator>,
        transport: Arc<ScriptedTransport>,
        status: Arc<LintStatusStore>,
        config: Arc<ConfigStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let config = Arc::new(ConfigStore::load(Arc::new(MemoryStore::new())));
        let status = Arc::new(LintStatusStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let orchestrator = Arc::new(LintOrchestrator::new(
            LintService::new(transport.clone()),
            config.clone(),
            status.clone(),
            notifier.clone(),
        ));
        Harness {
            orchestrator,
            transport,
            status,
            config,
            notifier,
        }
    }

    fn payload(rule: &str, output: &str) -> Value {
        json!({
            "content": {
                "warnings": [{
                    "line": 1,
                    "column": 5,
                    "text": format!("Expected indentation ({})", rule),
                    "rule": rule,
                    "severity": "error"
                }],
                "info": { "version": "15.0.0" },
                "output": output,
                "hasSyntaxError": false
            }
        })
    }

    #[tokio::test]
    async fn empty_code_never_calls_service() {
        let h = harness();
        assert_eq!(h.orchestrator.run("", Syntax::Css).await, None);
        assert_eq!(h.transport.calls(), 0);
        assert_eq!(h.notifier.errors(), vec![EMPTY_CODE_MESSAGE.to_string()]);
        assert!(!h.status.status().is_loading);
    }

    #[tokio::test]
    async fn successful_run_commits_everything() {
        let h = harness();
        h.transport
            .respond("body{color:red}", Ok(payload("indentation", "body{color:red}")));

        let result = h.orchestrator.run("body{color:red}", Syntax::Css).await.unwrap();
        assert_eq!(result.warnings.len(), 1);

        let state = h.status.snapshot();
        assert!(state.status.is_loaded);
        assert!(!state.status.is_loading);
        assert!(!state.status.is_css_syntax_error);
        assert_eq!(state.warnings.len(), 1);
        assert_eq!(state.warnings[0].rule, "indentation");
        assert_eq!(state.version, "15.0.0");
        assert_eq!(state.output, "body{color:red}");
        assert!(state.info_config.is_empty());
        assert!(h.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn run_sends_current_config() {
        let h = harness();
        h.config.update_rule("color-named", RuleValue::from("always"));
        h.transport.respond("a{}", Ok(json!({ "content": null })));

        h.orchestrator.run("a{}", Syntax::Css).await;

        let sent = h.transport.requests();
        assert_eq!(sent[0].config.rules["color-named"], RuleValue::from("always"));
    }

    #[tokio::test]
    async fn syntax_error_falls_back_to_output_scan() {
        let h = harness();
        let mut body = payload("x", "CssSyntaxError: Unclosed block");
        body["content"]
            .as_object_mut()
            .unwrap()
            .remove("hasSyntaxError");
        h.transport.respond("a{", Ok(body));

        h.orchestrator.run("a{", Syntax::Css).await.unwrap();
        assert!(h.status.status().is_css_syntax_error);
    }

    #[tokio::test]
    async fn explicit_flag_beats_output_scan() {
        let h = harness();
        h.transport
            .respond("a{}", Ok(payload("x", "/* SyntaxError mentioned in a comment */")));

        h.orchestrator.run("a{}", Syntax::Css).await.unwrap();
        assert!(!h.status.status().is_css_syntax_error);
    }

    #[tokio::test]
    async fn null_content_only_clears_loading() {
        let h = harness();
        h.status.set_loaded(true);
        h.transport.respond("a{}", Ok(json!({ "content": null })));

        assert_eq!(h.orchestrator.run("a{}", Syntax::Css).await, None);

        let status = h.status.status();
        assert!(!status.is_loading);
        assert!(status.is_loaded);
        assert!(h.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn network_failure_keeps_previous_result() {
        let h = harness();
        h.transport.respond("first", Ok(payload("first", "first-out")));
        h.orchestrator.run("first", Syntax::Css).await.unwrap();

        h.transport.respond("second", Err(LintError::network()));
        assert_eq!(h.orchestrator.run("second", Syntax::Css).await, None);

        let state = h.status.snapshot();
        assert!(!state.status.is_loading);
        assert!(state.status.is_loaded);
        assert_eq!(state.output, "first-out");
        assert_eq!(state.version, "15.0.0");
        assert_eq!(h.notifier.errors(), vec!["Unable to connect to the lint server".to_string()]);
    }

    #[tokio::test]
    async fn failure_on_fresh_session_leaves_loaded_false() {
        let h = harness();
        h.transport.respond("a{}", Err(LintError::api(502, None)));

        h.orchestrator.run("a{}", Syntax::Css).await;

        let status = h.status.status();
        assert!(!status.is_loading);
        assert!(!status.is_loaded);
        assert_eq!(h.notifier.errors(), vec!["Server error (502)".to_string()]);
    }

    #[tokio::test]
    async fn latest_started_call_wins() {
        let h = harness();
        let release_a = h.transport.gate("a");
        let release_b = h.transport.gate("b");

        let orchestrator = h.orchestrator.clone();
        let call_a = tokio::spawn(async move { orchestrator.run("a", Syntax::Css).await });
        h.transport.wait_for_calls(1).await;

        let orchestrator = h.orchestrator.clone();
        let call_b = tokio::spawn(async move { orchestrator.run("b", Syntax::Css).await });
        h.transport.wait_for_calls(2).await;

        release_b.send(Ok(payload("rule-b", "out-b"))).unwrap();
        assert!(call_b.await.unwrap().is_some());

        release_a.send(Ok(payload("rule-a", "out-a"))).unwrap();
        assert_eq!(call_a.await.unwrap(), None);

        let state = h.status.snapshot();
        assert_eq!(state.output, "out-b");
        assert_eq!(state.warnings[0].rule, "rule-b");
        assert!(state.status.is_loaded);
        assert!(!state.status.is_loading);
    }

    #[tokio::test]
    async fn stale_success_before_newer_call_changes_nothing() {
        let h = harness();
        h.transport.respond("first", Ok(payload("first", "first-out")));
        h.orchestrator.run("first", Syntax::Css).await.unwrap();

        let release_a = h.transport.gate("a");
        let release_b = h.transport.gate("b");

        let orchestrator = h.orchestrator.clone();
        let call_a = tokio::spawn(async move { orchestrator.run("a", Syntax::Css).await });
        h.transport.wait_for_calls(2).await;
        let orchestrator = h.orchestrator.clone();
        let call_b = tokio::spawn(async move { orchestrator.run("b", Syntax::Css).await });
        h.transport.wait_for_calls(3).await;
        let in_flight = h.status.snapshot();

        release_a.send(Ok(payload("rule-a", "out-a"))).unwrap();
        assert_eq!(call_a.await.unwrap(), None);

        let state = h.status.snapshot();
        assert_eq!(state, in_flight);
        assert!(state.status.is_loading);
        assert!(!state.has_warnings());
        assert_eq!(state.output, "first-out");

        release_b.send(Ok(payload("rule-b", "out-b"))).unwrap();
        assert!(call_b.await.unwrap().is_some());

        let state = h.status.snapshot();
        assert!(!state.status.is_loading);
        assert_eq!(state.output, "out-b");
        assert_eq!(state.warnings[0].rule, "rule-b");
        assert!(h.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn stale_failure_is_silent_and_keeps_loading() {
        let h = harness();
        let release_a = h.transport.gate("a");
        let release_b = h.transport.gate("b");

        let orchestrator = h.orchestrator.clone();
        let call_a = tokio::spawn(async move { orchestrator.run("a", Syntax::Css).await });
        h.transport.wait_for_calls(1).await;
        let orchestrator = h.orchestrator.clone();
        let call_b = tokio::spawn(async move { orchestrator.run("b", Syntax::Css).await });
        h.transport.wait_for_calls(2).await;

        release_a.send(Err(LintError::network())).unwrap();
        assert_eq!(call_a.await.unwrap(), None);
        assert!(h.status.status().is_loading);
        assert!(h.notifier.errors().is_empty());

        release_b.send(Ok(json!({ "content": null }))).unwrap();
        call_b.await.unwrap();
        assert!(!h.status.status().is_loading);
    }

    #[tokio::test]
    async fn reset_clears_result_fields() {
        let h = harness();
        h.transport.respond("a{}", Ok(payload("x", "out")));
        h.orchestrator.run("a{}", Syntax::Css).await.unwrap();
        h.orchestrator.toggle_rules();

        h.orchestrator.reset();

        let state = h.status.snapshot();
        assert!(!state.status.is_loaded);
        assert!(!state.has_diff());
        assert!(!state.has_warnings());
        assert!(state.version.is_empty());
        assert!(state.status.is_show_rules);
    }

    #[test]
    fn detection_is_case_insensitive() {
        let mut result = LintResult {
            output: "SYNTAXERROR at 1:1".into(),
            ..LintResult::default()
        };
        assert!(detect_syntax_error(&result));

        result.output = "all good".into();
        assert!(!detect_syntax_error(&result));

        result.has_syntax_error = Some(true);
        assert!(detect_syntax_error(&result));
    }
}
