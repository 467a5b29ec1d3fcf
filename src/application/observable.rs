// src/application/observable.rs
//
// Observable state for the view layer.
//
// - Observable<T>: a single value cell. The view reads and watches it, only
//   the owning controller writes it.
// - SharedState<T>: a cell fed by a live query. The upstream query runs only
//   while at least one Subscription is alive, is shared by all subscriptions,
//   and the last value is kept for subscribers that join later.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::LiveQuery;

pub struct Observable<T> {
    cell: Arc<watch::Sender<T>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { cell: Arc::new(tx) }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }

    /// Receiver notified on every write
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.cell.subscribe()
    }

    pub(crate) fn set(&self, value: T) {
        self.cell.send_replace(value);
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

type Upstream<T> = Box<dyn Fn() -> LiveQuery<T> + Send + Sync>;

pub struct SharedState<T> {
    inner: Arc<SharedInner<T>>,
}

struct SharedInner<T> {
    latest: Arc<watch::Sender<T>>,
    upstream: Upstream<T>,
    background: Handle,
    collector: Mutex<Collector>,
}

#[derive(Default)]
struct Collector {
    observers: usize,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> SharedState<T> {
    pub fn new<F>(initial: T, background: Handle, upstream: F) -> Self
    where
        F: Fn() -> LiveQuery<T> + Send + Sync + 'static,
    {
        let (tx, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(SharedInner {
                latest: Arc::new(tx),
                upstream: Box::new(upstream),
                background,
                collector: Mutex::new(Collector::default()),
            }),
        }
    }

    /// Attach an observer. Starts the upstream query if nobody was watching.
    /// The returned subscription sees the latest known value right away.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut collector = self.inner.collector.lock().unwrap();
        collector.observers += 1;

        let running = collector.task.as_ref().is_some_and(|task| !task.is_finished());
        if !running {
            let mut source = (self.inner.upstream)();
            let latest = Arc::clone(&self.inner.latest);
            collector.task = Some(self.inner.background.spawn(async move {
                while let Some(value) = source.next().await {
                    latest.send_replace(value);
                }
            }));
        }

        Subscription {
            receiver: self.inner.latest.subscribe(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Latest value, whether or not anyone is subscribed
    pub fn current(&self) -> T {
        self.inner.latest.borrow().clone()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.collector.lock().unwrap().observers
    }

    /// Whether the upstream query is currently running
    pub fn is_active(&self) -> bool {
        self.inner
            .collector
            .lock()
            .unwrap()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

/// A live handle on a SharedState. Dropping it detaches the observer.
pub struct Subscription<T> {
    receiver: watch::Receiver<T>,
    inner: Arc<SharedInner<T>>,
}

impl<T: Clone> Subscription<T> {
    pub fn current(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next value
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the value satisfies `predicate` (checked against the
    /// current value first)
    pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let value = self.receiver.wait_for(predicate).await.ok()?;
        Some(T::clone(&value))
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Ok(mut collector) = self.inner.collector.lock() {
            collector.observers = collector.observers.saturating_sub(1);
            if collector.observers == 0 {
                if let Some(task) = collector.task.take() {
                    task.abort();
                }
            }
        }
    }
}
