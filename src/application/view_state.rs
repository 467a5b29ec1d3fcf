// src/application/view_state.rs
//
// View state for the wish list screens.
//
// RULES:
// - Four independent observable cells: title input, description input,
//   last error, live list of wishes
// - Every write runs as a fire-and-forget task on the background handle
// - A failed write lands in `last_error`; callers never see it
// - Tasks die with the controller; a write already handed to the store
//   still completes, only its error report is dropped
// - Scheduled tasks stay owned by the controller; waiting for them never
//   takes ownership, so an abandoned wait cancels nothing

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use futures_util::{FutureExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::application::error_handling::ErrorResponse;
use crate::application::observable::{Observable, SharedState, Subscription};
use crate::domain::{validate_wish, DomainResult, Wish, UNSAVED_WISH_ID};
use crate::error::{AppError, RepositoryFailure, WishOperation};
use crate::repositories::WishRepository;
use crate::store::LiveQuery;

const LOG_TARGET: &str = "WishListViewState";

/// What a successful form submission scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
}

impl SubmitOutcome {
    /// Confirmation shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Created => "Wish has been created",
            SubmitOutcome::Updated => "Wish has been updated",
        }
    }
}

pub struct WishListViewState {
    repository: Arc<WishRepository>,
    background: Handle,
    title_input: Observable<String>,
    description_input: Observable<String>,
    last_error: Observable<Option<Arc<RepositoryFailure>>>,
    all_wishes: SharedState<Vec<Wish>>,
    tasks: Mutex<JoinSet<()>>,
    pending: Arc<watch::Sender<usize>>,
    session: Mutex<Option<JoinHandle<()>>>,
}

/// Counts a write task as pending until the task finishes or is dropped
struct PendingGuard {
    pending: Arc<watch::Sender<usize>>,
}

impl PendingGuard {
    fn new(pending: &Arc<watch::Sender<usize>>) -> Self {
        pending.send_modify(|count| *count += 1);
        Self {
            pending: Arc::clone(pending),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

impl WishListViewState {
    /// `background` is where every write and live query runs; the calling
    /// (UI) thread only schedules work.
    pub fn new(repository: Arc<WishRepository>, background: Handle) -> Self {
        let source = Arc::clone(&repository);
        let all_wishes =
            SharedState::new(Vec::new(), background.clone(), move || source.get_all_wishes());

        Self {
            repository,
            background,
            title_input: Observable::new(String::new()),
            description_input: Observable::new(String::new()),
            last_error: Observable::new(None),
            all_wishes,
            tasks: Mutex::new(JoinSet::new()),
            pending: Arc::new(watch::channel(0).0),
            session: Mutex::new(None),
        }
    }

    // ========================================================================
    // OBSERVABLE STATE
    // ========================================================================

    pub fn title_input(&self) -> &Observable<String> {
        &self.title_input
    }

    pub fn description_input(&self) -> &Observable<String> {
        &self.description_input
    }

    pub fn last_error(&self) -> &Observable<Option<Arc<RepositoryFailure>>> {
        &self.last_error
    }

    /// Watch the wish list. The underlying live query runs while at least one
    /// subscription is alive.
    pub fn all_wishes(&self) -> Subscription<Vec<Wish>> {
        self.all_wishes.subscribe()
    }

    /// Last list snapshot seen (empty before the first one arrives)
    pub fn current_wishes(&self) -> Vec<Wish> {
        self.all_wishes.current()
    }

    pub fn is_watching_wishes(&self) -> bool {
        self.all_wishes.is_active()
    }

    /// `last_error` shaped as a dismissible notice
    pub fn error_notice(&self) -> Option<ErrorResponse> {
        self.last_error
            .get()
            .map(|failure| ErrorResponse::from_failure(&failure))
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    pub fn set_title_input(&self, text: impl Into<String>) {
        self.title_input.set(text.into());
    }

    pub fn set_description_input(&self, text: impl Into<String>) {
        self.description_input.set(text.into());
    }

    pub fn clear_error(&self) {
        self.last_error.set(None);
    }

    /// Start a fresh "add" form: stops any edit session and blanks both inputs
    pub fn begin_add_session(&self) {
        self.end_session();
        self.title_input.set(String::new());
        self.description_input.set(String::new());
    }

    /// Start editing wish `id`: the inputs follow the stored record until the
    /// next session starts or the controller closes.
    pub fn begin_edit_session(&self, id: i64) {
        if id == UNSAVED_WISH_ID {
            self.begin_add_session();
            return;
        }
        self.end_session();

        let mut source = self.repository.get_wish_by_id(id);
        let title = self.title_input.clone();
        let description = self.description_input.clone();
        let task = self.background.spawn(async move {
            while let Some(wish) = source.next().await {
                title.set(wish.title);
                description.set(wish.description);
            }
        });

        *self.session.lock().unwrap() = Some(task);
    }

    /// Save the form. Inputs are trimmed and validated; an unsaved `id` adds a
    /// new wish, anything else updates that wish.
    pub fn submit(&self, id: i64) -> DomainResult<SubmitOutcome> {
        let wish = Wish::with_id(
            id,
            self.title_input.get().trim(),
            self.description_input.get().trim(),
        );
        validate_wish(&wish)?;

        self.end_session();
        if wish.is_persisted() {
            self.update_wish(wish);
            Ok(SubmitOutcome::Updated)
        } else {
            self.add_wish(wish);
            Ok(SubmitOutcome::Created)
        }
    }

    /// Hint for the title field while typing
    pub fn title_error(&self) -> Option<&'static str> {
        crate::domain::title_error(&self.title_input.get())
    }

    // ========================================================================
    // WRITES (fire-and-forget)
    // ========================================================================

    pub fn add_wish(&self, wish: Wish) {
        let repository = Arc::clone(&self.repository);
        self.launch(WishOperation::Add, async move {
            repository.add_wish(wish).await.map(|_| ())
        });
    }

    pub fn update_wish(&self, wish: Wish) {
        let repository = Arc::clone(&self.repository);
        self.launch(WishOperation::Update, async move {
            repository.update_wish(wish).await
        });
    }

    pub fn delete_wish(&self, wish: Wish) {
        let repository = Arc::clone(&self.repository);
        self.launch(WishOperation::Delete, async move {
            repository.delete_wish(wish).await
        });
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn get_wish_by_id(&self, id: i64) -> LiveQuery<Wish> {
        self.repository.get_wish_by_id(id)
    }

    // ========================================================================
    // LIFETIME
    // ========================================================================

    /// Wait until no write is pending (finished or aborted). Dropping the
    /// returned future leaves the writes running.
    pub async fn settle(&self) {
        let mut pending = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = pending.wait_for(|count| *count == 0).await;
    }

    /// Number of writes scheduled but not yet finished
    pub fn pending_writes(&self) -> usize {
        *self.pending.borrow()
    }

    /// Abandon the edit session and every in-flight write task
    pub fn close(&self) {
        self.end_session();
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.abort_all();
        }
    }

    fn end_session(&self) {
        if let Ok(mut session) = self.session.lock() {
            if let Some(task) = session.take() {
                task.abort();
            }
        }
    }

    fn launch<F>(&self, operation: WishOperation, work: F)
    where
        F: Future<Output = Result<(), RepositoryFailure>> + Send + 'static,
    {
        let last_error = self.last_error.clone();
        let guard = PendingGuard::new(&self.pending);
        let task = async move {
            let _guard = guard;
            let outcome = AssertUnwindSafe(work).catch_unwind().await.unwrap_or_else(|_| {
                Err(RepositoryFailure::new(
                    operation,
                    AppError::Task(format!("{} task panicked", operation)),
                ))
            });

            if let Err(failure) = outcome {
                log::warn!(target: LOG_TARGET, "{}: {}", failure, failure.cause);
                last_error.set(Some(Arc::new(failure)));
            }
        };

        let mut tasks = self.tasks.lock().unwrap();
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(task, &self.background);
    }
}

impl Drop for WishListViewState {
    fn drop(&mut self) {
        self.close();
    }
}
