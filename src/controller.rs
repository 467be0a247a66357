use std::time::Duration;

use crate::agent::types::{AgentEnvelope, ProfileResponse};

/// Step labels shown while an analysis is in flight. The cursor over them is
/// cosmetic; it does not reflect real backend progress.
pub const LOADING_STEPS: [&str; 5] = [
    "Fetching GitHub profile...",
    "Analyzing repositories...",
    "Processing contributions...",
    "Evaluating code patterns...",
    "Building developer profile...",
];

pub const STEP_ADVANCE_INTERVAL: Duration = Duration::from_millis(1500);

/// Showcase usernames offered on the search view.
pub const SAMPLE_PROFILES: [(&str, &str, &str); 3] = [
    ("torvalds", "Linus Torvalds", "Kernel Development"),
    ("gvanrossum", "Guido van Rossum", "Python Core"),
    ("tj", "TJ Holowaychuk", "Full Stack"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Loading,
    Results,
}

/// Owns the whole view/request lifecycle. Failure is not a separate screen:
/// it folds back into the Idle search view with an inline error string.
#[derive(Debug)]
pub struct ProfileRequestController {
    pub state: RequestState,
    pub username: String,
    pub error: Option<String>,
    pub profile: Option<ProfileResponse>,
    pub progress_step: usize,
}

impl Default for ProfileRequestController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRequestController {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            username: String::new(),
            error: None,
            profile: None,
            progress_step: 0,
        }
    }

    /// Validate the username buffer and transition to Loading. Returns the
    /// trimmed username for the caller to dispatch, or None when nothing may
    /// touch the network. A second submit while Loading is allowed; the later
    /// completion wins. Submit from Results is ignored (reset first).
    pub fn submit(&mut self) -> Option<String> {
        if self.state == RequestState::Results {
            return None;
        }
        let username = self.username.trim();
        if username.is_empty() {
            self.error = Some("Please enter a GitHub username".to_string());
            return None;
        }
        self.error = None;
        self.progress_step = 0;
        self.state = RequestState::Loading;
        Some(username.to_string())
    }

    /// Apply a service outcome. A successful envelope stores its payload
    /// verbatim and shows Results; anything else folds back to the search
    /// view with the service message (or a fallback).
    pub fn complete(&mut self, envelope: AgentEnvelope) {
        match envelope {
            AgentEnvelope {
                success: true,
                response: Some(response),
                ..
            } => {
                self.profile = Some(response);
                self.state = RequestState::Results;
            }
            AgentEnvelope { error, .. } => {
                self.error =
                    Some(error.unwrap_or_else(|| "Failed to analyze profile".to_string()));
                self.state = RequestState::Idle;
            }
        }
    }

    /// Transport or otherwise unexpected failure.
    pub fn fail_network(&mut self) {
        self.error = Some("Network error. Please try again.".to_string());
        self.state = RequestState::Idle;
    }

    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
        self.username.clear();
        self.error = None;
        self.profile = None;
        self.progress_step = 0;
    }

    /// Advance the progress cursor, capped at the last step. A no-op outside
    /// Loading so a stray late tick cannot mutate a stale view.
    pub fn advance_progress(&mut self) {
        if self.state != RequestState::Loading {
            return;
        }
        if self.progress_step < LOADING_STEPS.len() - 1 {
            self.progress_step += 1;
        }
    }

    pub fn current_step(&self) -> &'static str {
        LOADING_STEPS
            .get(self.progress_step)
            .copied()
            .unwrap_or("Processing...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::{ProfileMetadata, ProfileResult};

    fn success_envelope() -> AgentEnvelope {
        AgentEnvelope {
            success: true,
            response: Some(ProfileResponse {
                result: ProfileResult {
                    developer_summary: Some("summary".into()),
                    ..ProfileResult::default()
                },
                metadata: Some(ProfileMetadata {
                    repositories_analyzed: Some(12),
                    ..ProfileMetadata::default()
                }),
                status: None,
                message: None,
            }),
            error: None,
        }
    }

    #[test]
    fn empty_username_is_rejected_without_network() {
        let mut ctl = ProfileRequestController::new();
        assert_eq!(ctl.submit(), None);
        assert_eq!(ctl.state, RequestState::Idle);
        assert_eq!(ctl.error.as_deref(), Some("Please enter a GitHub username"));

        ctl.username = "   \t".into();
        assert_eq!(ctl.submit(), None);
        assert_eq!(ctl.state, RequestState::Idle);
    }

    #[test]
    fn valid_submit_enters_loading() {
        let mut ctl = ProfileRequestController::new();
        ctl.error = Some("stale".into());
        ctl.username = "  torvalds ".into();
        assert_eq!(ctl.submit(), Some("torvalds".to_string()));
        assert_eq!(ctl.state, RequestState::Loading);
        assert_eq!(ctl.progress_step, 0);
        assert!(ctl.error.is_none());
    }

    #[test]
    fn success_stores_payload_verbatim() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();

        let envelope = success_envelope();
        let expected = envelope.response.clone().unwrap();
        ctl.complete(envelope);
        assert_eq!(ctl.state, RequestState::Results);
        assert_eq!(ctl.profile.as_ref(), Some(&expected));
    }

    #[test]
    fn failure_envelope_folds_back_to_search() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "nobody".into();
        ctl.submit().unwrap();
        ctl.complete(AgentEnvelope {
            success: false,
            response: None,
            error: Some("User not found".into()),
        });
        assert_eq!(ctl.state, RequestState::Idle);
        assert_eq!(ctl.error.as_deref(), Some("User not found"));
        assert!(ctl.profile.is_none());
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "nobody".into();
        ctl.submit().unwrap();
        ctl.complete(AgentEnvelope {
            success: false,
            response: None,
            error: None,
        });
        assert_eq!(ctl.error.as_deref(), Some("Failed to analyze profile"));
    }

    #[test]
    fn success_without_payload_is_a_failure() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.complete(AgentEnvelope {
            success: true,
            response: None,
            error: None,
        });
        assert_eq!(ctl.state, RequestState::Idle);
        assert_eq!(ctl.error.as_deref(), Some("Failed to analyze profile"));
    }

    #[test]
    fn network_failure_uses_generic_message() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.fail_network();
        assert_eq!(ctl.state, RequestState::Idle);
        assert_eq!(ctl.error.as_deref(), Some("Network error. Please try again."));
    }

    #[test]
    fn reset_clears_everything() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.complete(success_envelope());
        assert_eq!(ctl.state, RequestState::Results);

        ctl.reset();
        assert_eq!(ctl.state, RequestState::Idle);
        assert!(ctl.username.is_empty());
        assert!(ctl.profile.is_none());
        assert!(ctl.error.is_none());
    }

    #[test]
    fn progress_caps_at_last_step_and_never_wraps() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        for _ in 0..20 {
            ctl.advance_progress();
        }
        assert_eq!(ctl.progress_step, LOADING_STEPS.len() - 1);
        assert_eq!(ctl.current_step(), LOADING_STEPS[LOADING_STEPS.len() - 1]);
    }

    #[test]
    fn stray_tick_after_completion_is_ignored() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.advance_progress();
        ctl.complete(success_envelope());
        let before = ctl.progress_step;
        ctl.advance_progress();
        assert_eq!(ctl.progress_step, before);
        assert_eq!(ctl.state, RequestState::Results);
    }

    #[test]
    fn resubmit_while_loading_is_allowed() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.advance_progress();

        ctl.username = "gvanrossum".into();
        assert_eq!(ctl.submit(), Some("gvanrossum".to_string()));
        assert_eq!(ctl.state, RequestState::Loading);
        assert_eq!(ctl.progress_step, 0);
    }

    #[test]
    fn submit_from_results_is_ignored() {
        let mut ctl = ProfileRequestController::new();
        ctl.username = "torvalds".into();
        ctl.submit().unwrap();
        ctl.complete(success_envelope());
        assert_eq!(ctl.submit(), None);
        assert_eq!(ctl.state, RequestState::Results);
    }
}
