//! Shared machinery of every view state holder.
//!
//! Intents run as Tokio tasks owned by the holder. Each intent belongs to a
//! [`Lane`]; a lane hands out increasing generations and only the newest
//! generation may publish. Dropping the holder aborts whatever is still
//! running.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::state::{OperationResult, ViewState};
use crate::error::RepoResult;

/// A family of intents whose results supersede each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Reads that replace `data`
    Load,
    /// Creates, updates, and deletes
    Write,
}

impl Lane {
    fn index(self) -> usize {
        match self {
            Lane::Load => 0,
            Lane::Write => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    lane: Lane,
    generation: u64,
}

#[derive(Debug, Default)]
struct Lanes {
    generation: [u64; 2],
    pending: [bool; 2],
    /// Lane that published the current error. `None` lets either lane clear it.
    error_owner: Option<Lane>,
}

impl Lanes {
    fn any_pending(&self) -> bool {
        self.pending.iter().any(|p| *p)
    }
}

struct Shared<T> {
    tx: watch::Sender<ViewState<T>>,
    lanes: Mutex<Lanes>,
}

impl<T> Shared<T> {
    fn lanes(&self) -> MutexGuard<'_, Lanes> {
        // Lane bookkeeping cannot be left half-updated, so a poisoned lock is still usable.
        self.lanes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, lane: Lane) -> Ticket {
        let mut lanes = self.lanes();
        lanes.generation[lane.index()] += 1;
        lanes.pending[lane.index()] = true;
        self.tx.send_modify(|state| state.is_loading = true);
        Ticket {
            lane,
            generation: lanes.generation[lane.index()],
        }
    }

    /// Apply `update` if `ticket` is still the newest of its lane.
    fn finish(&self, ticket: Ticket, update: impl FnOnce(&mut ViewState<T>)) -> bool {
        let mut lanes = self.lanes();
        if lanes.generation[ticket.lane.index()] != ticket.generation {
            tracing::debug!(
                lane = ?ticket.lane,
                generation = ticket.generation,
                "discarding superseded result"
            );
            return false;
        }
        lanes.pending[ticket.lane.index()] = false;
        let loading = lanes.any_pending();
        let mut owner = lanes.error_owner;
        self.tx.send_modify(|state| {
            let before = state.error.clone();
            update(state);
            if state.error.is_none() {
                // A lane only clears errors it published itself.
                if before.is_some() && owner.is_some_and(|o| o != ticket.lane) {
                    state.error = before;
                } else {
                    owner = None;
                }
            } else if state.error != before {
                owner = Some(ticket.lane);
            }
            state.is_loading = loading;
        });
        lanes.error_owner = owner;
        true
    }
}

/// Observable state plus the tasks that feed it.
pub struct StateHolder<T> {
    shared: Arc<Shared<T>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<T> std::fmt::Debug for StateHolder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHolder")
            .field("lanes", &*self.shared.lanes())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(ViewState::new(initial));
        Self {
            shared: Arc::new(Shared {
                tx,
                lanes: Mutex::new(Lanes::default()),
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the current state.
    pub fn state(&self) -> ViewState<T> {
        self.shared.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.shared.tx.subscribe()
    }

    /// Consume the pending operation result, if any.
    pub fn take_operation_result(&self) -> Option<OperationResult> {
        let mut taken = None;
        self.shared.tx.send_if_modified(|state| {
            taken = state.operation_result.take();
            taken.is_some()
        });
        taken
    }

    pub fn clear_error(&self) {
        self.shared.lanes().error_owner = None;
        self.shared.tx.send_if_modified(|state| state.error.take().is_some());
    }

    /// Wait until every intent issued so far has finished.
    pub async fn settle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks());
            if handles.is_empty() {
                return;
            }
            for result in join_all(handles).await {
                if let Err(e) = result {
                    if e.is_panic() {
                        tracing::error!(error = %e, "view state task panicked");
                    }
                }
            }
        }
    }

    /// Run `call` on `lane` and hand its result to `on_done`.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn run<R, Fut, F>(&self, lane: Lane, call: Fut, on_done: F)
    where
        R: Send + 'static,
        Fut: Future<Output = RepoResult<R>> + Send + 'static,
        F: FnOnce(&mut ViewState<T>, RepoResult<R>) + Send + 'static,
    {
        let ticket = self.shared.begin(lane);
        let shared = Arc::clone(&self.shared);
        self.spawn(async move {
            let result = call.await;
            shared.finish(ticket, |state| on_done(state, result));
        });
    }

    /// A read on the load lane. Success clears the error and the stale flag
    /// before `apply` runs.
    pub(crate) fn load<R, Fut, A>(&self, call: Fut, apply: A)
    where
        R: Send + 'static,
        Fut: Future<Output = RepoResult<R>> + Send + 'static,
        A: FnOnce(&mut ViewState<T>, R) + Send + 'static,
    {
        self.run(Lane::Load, call, |state, result| match result {
            RepoResult::Success(data) => {
                state.error = None;
                state.is_stale = false;
                apply(state, data);
            }
            RepoResult::Error { message, .. } => state.error = Some(message),
        });
    }

    /// A write on the write lane. Both outcomes publish an operation result;
    /// `on_success` may adjust `data` to match.
    pub(crate) fn write<Fut, A>(&self, call: Fut, on_success: A)
    where
        Fut: Future<Output = RepoResult<String>> + Send + 'static,
        A: FnOnce(&mut ViewState<T>) + Send + 'static,
    {
        self.run(Lane::Write, call, |state, result| match result {
            RepoResult::Success(message) => {
                state.error = None;
                on_success(state);
                state.operation_result = Some(OperationResult::Success(message));
            }
            RepoResult::Error { message, .. } => {
                state.error = Some(message.clone());
                state.operation_result = Some(OperationResult::Failure(message));
            }
        });
    }

    /// Publish a failure without calling anything.
    pub(crate) fn reject(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "intent rejected");
        self.shared.lanes().error_owner = None;
        self.shared.tx.send_modify(|state| {
            state.error = Some(message.clone());
            state.operation_result = Some(OperationResult::Failure(message));
        });
    }

    /// Change `data` directly.
    pub(crate) fn update(&self, f: impl FnOnce(&mut ViewState<T>)) {
        self.shared.tx.send_modify(f);
    }

    /// Copy every value published on `rx` into the state.
    ///
    /// The returned task is not awaited by [`settle`](Self::settle); it ends
    /// when the sender or this holder goes away, and the caller aborts it
    /// when done.
    pub(crate) fn follow<S, F>(&self, mut rx: watch::Receiver<S>, apply: F) -> JoinHandle<()>
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&mut ViewState<T>, S) + Send + 'static,
    {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.tx.send_modify(|state| apply(state, value));
            }
        })
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks();
        tasks.retain(|handle| !handle.is_finished());
        tasks.push(tokio::spawn(future));
    }
}

impl<T> Drop for StateHolder<T> {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn delayed<T>(ms: u64, result: RepoResult<T>) -> impl Future<Output = RepoResult<T>> {
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            result
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_load_wins_when_it_finishes_first() {
        let holder = StateHolder::new(String::new());

        holder.load(delayed(200, RepoResult::Success("first")), |s, v| {
            s.data = v.to_string()
        });
        holder.load(delayed(50, RepoResult::Success("second")), |s, v| {
            s.data = v.to_string()
        });
        assert!(holder.state().is_loading);

        holder.settle().await;

        let state = holder.state();
        assert_eq!(state.data, "second");
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_error_is_discarded() {
        let holder = StateHolder::new(0);

        holder.load(delayed(10, RepoResult::Success(1)), |s, v| s.data = v);
        holder.load(delayed(100, RepoResult::<i32>::error("late failure")), |s, v| {
            s.data = v
        });
        holder.load(delayed(50, RepoResult::Success(3)), |s, v| s.data = v);
        holder.settle().await;

        let state = holder.state();
        assert_eq!(state.data, 3);
        assert_eq!(state.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lanes_are_independent() {
        let holder = StateHolder::new(0);

        holder.load(delayed(100, RepoResult::Success(7)), |s, v| s.data = v);
        holder.write(delayed(10, RepoResult::Success("Saved".to_string())), |_| {});

        tokio::time::sleep(Duration::from_millis(20)).await;
        let state = holder.state();
        assert!(state.is_loading);
        assert_eq!(
            state.operation_result,
            Some(OperationResult::Success("Saved".to_string()))
        );

        holder.settle().await;
        assert_eq!(holder.state().data, 7);
        assert!(!holder.state().is_loading);
    }

    #[tokio::test]
    async fn test_write_failure_sets_error_and_result() {
        let holder = StateHolder::new(());

        holder.write(async { RepoResult::error("Forbidden") }, |_| {});
        holder.settle().await;

        assert_eq!(holder.state().error.as_deref(), Some("Forbidden"));
        assert_eq!(
            holder.take_operation_result(),
            Some(OperationResult::Failure("Forbidden".to_string()))
        );
        assert_eq!(holder.take_operation_result(), None);

        holder.clear_error();
        assert_eq!(holder.state().error, None);
    }

    #[tokio::test]
    async fn test_write_success_keeps_load_error() {
        let holder = StateHolder::new(0);

        holder.load(async { RepoResult::<i32>::error("HTTP 503: Service Unavailable") }, |s, v| {
            s.data = v
        });
        holder.settle().await;
        holder.write(async { RepoResult::Success("Saved".to_string()) }, |_| {});
        holder.settle().await;

        assert_eq!(
            holder.state().error.as_deref(),
            Some("HTTP 503: Service Unavailable")
        );

        holder.load(async { RepoResult::Success(5) }, |s, v| s.data = v);
        holder.settle().await;
        assert_eq!(holder.state().error, None);
    }

    #[tokio::test]
    async fn test_write_success_clears_own_error() {
        let holder = StateHolder::new(());

        holder.write(async { RepoResult::error("Forbidden") }, |_| {});
        holder.settle().await;
        holder.write(async { RepoResult::Success("Saved".to_string()) }, |_| {});
        holder.settle().await;

        assert_eq!(holder.state().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_in_flight_tasks() {
        let holder = StateHolder::new(0);
        let mut rx = holder.subscribe();

        holder.load(delayed(100, RepoResult::Success(42)), |s, v| s.data = v);
        rx.borrow_and_update();
        drop(holder);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(rx.changed().await.is_err());
        assert_eq!(rx.borrow().data, 0);
    }

    #[tokio::test]
    async fn test_reject_publishes_without_loading() {
        let holder = StateHolder::new(());
        holder.reject("Title must not be empty");

        let state = holder.state();
        assert!(!state.is_loading);
        assert_eq!(
            state.operation_result,
            Some(OperationResult::Failure("Title must not be empty".to_string()))
        );
    }
}
