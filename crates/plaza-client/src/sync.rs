//! Submission of pending changes to the editor server.
//!
//! [`SyncController`] turns the pending sets of every panel into one
//! `/modify` request and applies the answer.
//!
//! # State Machine
//!
//! ```text
//!            submit() with changes
//!   ┌──────┐ ────────────────────▶ ┌────────────┐
//!   │ Idle │                       │ Submitting │ ── submit() ──▶ Err(Busy)
//!   └──────┘                       └─────┬──────┘
//!      ▲                                 │
//!      │ acknowledge()        success    │    application failure
//!      │                  ┌──────────────┴──────────────┐ / transport failure
//!      │                  ▼                             ▼
//!      │            ┌───────────┐                 ┌──────────┐
//!      └─────────── │  Applied  │                 │  Failed  │ ───┐
//!      │            │ panels    │                 │ panels   │    │
//!      │            │ cleared   │                 │ intact   │    │
//!      │            └───────────┘                 └──────────┘    │
//!      └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A submit with nothing pending returns [`SubmitOutcome::NoChanges`] and
//! never touches the network or the state. Nothing is retried.
//!
//! The caller lends the panels mutably for the whole submission, so no edit
//! can land between snapshotting the diff and clearing the panels after
//! success.

use std::sync::Arc;

use parking_lot::Mutex;
use plaza_types::SaveRef;
use thiserror::Error;
use tracing::{info, warn};

use crate::diff::{build_diff, ModifyRequest};
use crate::panel::ChangePanel;
use crate::service::{SaveService, ServiceError};
use crate::session::EditSession;

/// Why a submission did not apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Another submission is still in flight.
    #[error("a submission is already in progress")]
    Busy,
    /// The server processed the request and refused it. The message is the
    /// server's, verbatim.
    #[error("{0}")]
    Application(String),
    /// The request didn't produce a usable answer.
    #[error("network error: {0}")]
    Transport(String),
}

impl From<ServiceError> for SubmitError {
    fn from(e: ServiceError) -> Self {
        SubmitError::Transport(e.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Submitting,
    Applied { download_url: Option<String> },
    Failed { error: SubmitError },
}

impl SyncState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncState::Applied { .. } | SyncState::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was pending; no request was made.
    NoChanges,
    /// The server applied the diff and every panel was cleared.
    Applied {
        download_url: Option<String>,
        change_count: usize,
    },
}

/// User-facing feedback for a submission (loading spinner, toast, ...).
pub trait StatusReporter: Send + Sync {
    fn loading(&self);
    fn applied(&self, download_url: Option<&str>);
    fn failed(&self, error: &SubmitError);
}

/// Reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn loading(&self) {
        info!("Applying changes...");
    }

    fn applied(&self, download_url: Option<&str>) {
        match download_url {
            Some(url) => info!("Changes applied, result at {}", url),
            None => info!("Changes applied"),
        }
    }

    fn failed(&self, error: &SubmitError) {
        warn!("Submit failed: {}", error);
    }
}

/// Marks the submission failed if its future is dropped before finishing.
struct InFlight<'a> {
    state: &'a Mutex<SyncState>,
    done: bool,
}

impl InFlight<'_> {
    fn finish(mut self, next: SyncState) {
        *self.state.lock() = next;
        self.done = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            warn!("Submission abandoned before the server answered");
            *self.state.lock() = SyncState::Failed {
                error: SubmitError::Transport("submission abandoned".into()),
            };
        }
    }
}

pub struct SyncController {
    service: Arc<dyn SaveService>,
    reporter: Arc<dyn StatusReporter>,
    state: Mutex<SyncState>,
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl SyncController {
    pub fn new(service: Arc<dyn SaveService>) -> Self {
        Self::with_reporter(service, Arc::new(TracingReporter))
    }

    pub fn with_reporter(service: Arc<dyn SaveService>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            service,
            reporter,
            state: Mutex::new(SyncState::Idle),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state.lock().clone()
    }

    /// Observe a terminal state and return to `Idle`. Returns the state that
    /// was observed. While `Submitting` this does nothing.
    pub fn acknowledge(&self) -> SyncState {
        let mut state = self.state.lock();
        if state.is_terminal() {
            std::mem::take(&mut *state)
        } else {
            state.clone()
        }
    }

    /// Submit everything pending in `session`.
    pub async fn submit(&self, session: &mut EditSession) -> Result<SubmitOutcome, SubmitError> {
        let save_ref = session.ref_id();
        let mut panels = session.panels_mut();
        self.submit_panels(save_ref, &mut panels).await
    }

    /// Submit the pending changes of `panels` against `save_ref`.
    pub async fn submit_panels(
        &self,
        save_ref: SaveRef,
        panels: &mut [&mut dyn ChangePanel],
    ) -> Result<SubmitOutcome, SubmitError> {
        let request = {
            let mut state = self.state.lock();
            if *state == SyncState::Submitting {
                return Err(SubmitError::Busy);
            }
            if !panels.iter().any(|p| p.has_changes()) {
                return Ok(SubmitOutcome::NoChanges);
            }
            let views: Vec<&dyn ChangePanel> = panels.iter().map(|p| &**p).collect();
            let request = ModifyRequest {
                changes: build_diff(&views),
                save_data_ref: save_ref,
            };
            *state = SyncState::Submitting;
            request
        };
        let in_flight = InFlight {
            state: &self.state,
            done: false,
        };

        let change_count = request.changes.change_count();
        info!(ref_id = %save_ref.short(), changes = change_count, "Submitting changes");
        self.reporter.loading();

        let result = match self.service.modify(&request).await {
            Ok(response) => response.into_result().map_err(SubmitError::Application),
            Err(e) => Err(SubmitError::from(e)),
        };

        match result {
            Ok(download_url) => {
                for panel in panels.iter_mut() {
                    panel.clear();
                }
                self.reporter.applied(download_url.as_deref());
                in_flight.finish(SyncState::Applied {
                    download_url: download_url.clone(),
                });
                Ok(SubmitOutcome::Applied {
                    download_url,
                    change_count,
                })
            }
            Err(error) => {
                self.reporter.failed(&error);
                in_flight.finish(SyncState::Failed {
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Fetch the artifact of an applied submission.
    pub async fn download(&self, download_url: &str) -> Result<Vec<u8>, ServiceError> {
        self.service.download(download_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plaza_types::{CoreField, ItemId, ModifyResponse, ParseOutcome};

    use crate::bag_editor::tests::fixture;

    /// Answers every modify with `response` after yielding once, or never.
    struct Scripted {
        response: Option<ModifyResponse>,
        calls: Mutex<Vec<ModifyRequest>>,
    }

    impl Scripted {
        fn answering(response: ModifyResponse) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(Self {
                response: None,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SaveService for Scripted {
        async fn parse(&self, _: &str, _: Vec<u8>) -> Result<ParseOutcome, ServiceError> {
            unimplemented!()
        }

        async fn modify(&self, request: &ModifyRequest) -> Result<ModifyResponse, ServiceError> {
            self.calls.lock().push(request.clone());
            match &self.response {
                Some(r) => {
                    tokio::task::yield_now().await;
                    Ok(r.clone())
                }
                None => std::future::pending().await,
            }
        }

        async fn download(&self, _: &str) -> Result<Vec<u8>, ServiceError> {
            Ok(b"SAVE".to_vec())
        }
    }

    #[derive(Default)]
    struct Log(Mutex<Vec<String>>);

    impl StatusReporter for Log {
        fn loading(&self) {
            self.0.lock().push("loading".into());
        }
        fn applied(&self, url: Option<&str>) {
            self.0.lock().push(format!("applied {}", url.unwrap_or("-")));
        }
        fn failed(&self, error: &SubmitError) {
            self.0.lock().push(format!("failed {}", error));
        }
    }

    fn session() -> EditSession {
        let (base, cat) = fixture();
        EditSession::new(base, cat)
    }

    #[tokio::test]
    async fn test_no_changes_is_a_noop() {
        let svc = Scripted::answering(ModifyResponse::applied("/download/x"));
        let sync = SyncController::new(svc.clone());
        let mut s = session();

        assert_eq!(sync.submit(&mut s).await, Ok(SubmitOutcome::NoChanges));
        assert!(svc.calls.lock().is_empty());
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_success_clears_and_reports() {
        let svc = Scripted::answering(ModifyResponse::applied("/download/x"));
        let log = Arc::new(Log::default());
        let sync = SyncController::with_reporter(svc.clone(), log.clone());
        let mut s = session();
        s.core_mut().input(CoreField::Gender, "1");

        let out = sync.submit(&mut s).await.unwrap();
        assert_eq!(
            out,
            SubmitOutcome::Applied {
                download_url: Some("/download/x".into()),
                change_count: 1
            }
        );
        assert!(!s.has_changes());
        assert_eq!(*log.0.lock(), vec!["loading", "applied /download/x"]);
        assert_eq!(svc.calls.lock()[0].save_data_ref, s.ref_id());

        assert_eq!(
            sync.acknowledge(),
            SyncState::Applied {
                download_url: Some("/download/x".into())
            }
        );
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.download("/download/x").await.unwrap(), b"SAVE");
    }

    #[tokio::test]
    async fn test_application_failure_keeps_pending() {
        let svc = Scripted::answering(ModifyResponse::failed("ref expired"));
        let sync = SyncController::new(svc);
        let mut s = session();
        s.bag_mut().set_quantity(ItemId(1), 50);
        let before = s.diff();

        let err = sync.submit(&mut s).await.unwrap_err();
        assert_eq!(err, SubmitError::Application("ref expired".into()));
        assert_eq!(err.to_string(), "ref expired");
        assert_eq!(s.diff(), before);
        assert!(matches!(sync.state(), SyncState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_busy() {
        let svc = Scripted::answering(ModifyResponse::applied("/download/x"));
        let sync = SyncController::new(svc.clone());
        let mut a = session();
        let mut b = session();
        a.core_mut().input(CoreField::Name, "Gary");
        b.core_mut().input(CoreField::Name, "Misty");

        let (ra, rb) = tokio::join!(sync.submit(&mut a), sync.submit(&mut b));
        assert!(ra.is_ok());
        assert_eq!(rb, Err(SubmitError::Busy));
        assert_eq!(svc.calls.lock().len(), 1);
        assert!(b.has_changes());
    }

    #[tokio::test]
    async fn test_abandoned_submit_fails() {
        let svc = Scripted::hanging();
        let sync = SyncController::new(svc);
        let mut s = session();
        s.core_mut().input(CoreField::Tid, "1");

        tokio::select! {
            biased;
            _ = sync.submit(&mut s) => panic!("hanging service answered"),
            _ = async {} => {}
        }
        assert!(matches!(sync.state(), SyncState::Failed { error: SubmitError::Transport(_) }));
        assert!(s.has_changes());
    }

    #[test]
    fn test_acknowledge_only_leaves_terminal_states() {
        let sync = SyncController::new(Scripted::hanging());
        *sync.state.lock() = SyncState::Submitting;
        assert_eq!(sync.acknowledge(), SyncState::Submitting);
        assert_eq!(sync.state(), SyncState::Submitting);
    }
}
