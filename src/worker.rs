//! Background workers with cooperative cancellation
//!
//! A worker runs one closure on its own thread and reports back over a
//! channel that the main thread drains with `Worker::poll`. There is no way
//! to kill a worker: the closure checks its `CancelToken` at I/O boundaries
//! through `TaskContext::checkpoint`.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::{Result, RuntimeError};
use crate::plugin::PluginId;

/// Type-erased task result handed to `Plugin::on_task_event`
pub type TaskOutput = Box<dyn Any + Send>;

/// Box a task result for delivery through the host
pub fn boxed<T: Any + Send>(value: T) -> TaskOutput {
    Box::new(value)
}

/// Event reported by a running task
pub enum TaskEvent<T> {
    Progress {
        done: u64,
        total: Option<u64>,
        message: String,
    },
    Finished(T),
    /// The task returned an error, `UserCancelled` included
    Failed(RuntimeError),
}

impl<T> TaskEvent<T> {
    /// Whether this is the last event of the task
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskEvent::Progress { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskEvent::Failed(RuntimeError::UserCancelled))
    }
}

impl<T> fmt::Debug for TaskEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskEvent::Progress {
                done,
                total,
                message,
            } => f
                .debug_struct("Progress")
                .field("done", done)
                .field("total", total)
                .field("message", message)
                .finish(),
            TaskEvent::Finished(_) => f.write_str("Finished(..)"),
            TaskEvent::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a task closure sees of its worker
pub struct TaskContext<T> {
    token: CancelToken,
    tx: Sender<TaskEvent<T>>,
}

impl<T> TaskContext<T> {
    /// Fails with `UserCancelled` once cancellation was requested
    pub fn checkpoint(&self) -> Result<()> {
        if self.token.is_cancelled() {
            Err(RuntimeError::UserCancelled)
        } else {
            Ok(())
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn progress(&self, done: u64, total: Option<u64>, message: impl Into<String>) {
        // The receiver may already be gone if the host dropped the worker
        let _ = self.tx.send(TaskEvent::Progress {
            done,
            total,
            message: message.into(),
        });
    }
}

/// Handle to a running task
pub struct Worker<T> {
    name: String,
    token: CancelToken,
    rx: Receiver<TaskEvent<T>>,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

/// Run `task` on a new thread named `name`
pub fn spawn<T, F>(name: &str, task: F) -> Result<Worker<T>>
where
    T: Send + 'static,
    F: FnOnce(&TaskContext<T>) -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let token = CancelToken::new();
    let cx = TaskContext {
        token: token.clone(),
        tx,
    };

    let thread_name = name.to_string();
    let handle = std::thread::Builder::new()
        .name(format!("worker:{}", name))
        .spawn(move || {
            tracing::debug!(task = %thread_name, "worker started");
            let event = match task(&cx) {
                Ok(value) => TaskEvent::Finished(value),
                Err(RuntimeError::UserCancelled) => {
                    tracing::debug!(task = %thread_name, "worker cancelled");
                    TaskEvent::Failed(RuntimeError::UserCancelled)
                }
                Err(e) => {
                    tracing::warn!(task = %thread_name, "worker failed: {}", e);
                    TaskEvent::Failed(e)
                }
            };
            let _ = cx.tx.send(event);
        })?;

    Ok(Worker {
        name: name.to_string(),
        token,
        rx,
        handle: Some(handle),
        finished: false,
    })
}

impl<T> Worker<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the task to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Whether the terminal event has been received
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain pending events without blocking
    pub fn poll(&mut self) -> Vec<TaskEvent<T>> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            self.finished |= event.is_terminal();
            events.push(event);
        }
        if self.finished {
            self.join();
        }
        events
    }

    /// Block until the task is done, returning every remaining event
    pub fn wait(mut self) -> Vec<TaskEvent<T>> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.recv() {
            self.finished |= event.is_terminal();
            events.push(event);
        }
        self.join();
        events
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(task = %self.name, "worker thread panicked");
            }
        }
    }
}

// ============================================================================
// Task pool
// ============================================================================

struct RunningTask {
    plugin: PluginId,
    worker: Worker<TaskOutput>,
}

/// Workers started by plugins, drained by the host's event loop
#[derive(Default)]
pub struct TaskPool {
    running: Vec<RunningTask>,
}

impl TaskPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task on behalf of `plugin`
    ///
    /// A task with the same name already running for the plugin is cancelled
    /// first; its remaining events are still delivered.
    pub fn spawn<F>(&mut self, plugin: &PluginId, name: &str, task: F) -> Result<()>
    where
        F: FnOnce(&TaskContext<TaskOutput>) -> Result<TaskOutput> + Send + 'static,
    {
        self.cancel(plugin, name);
        let worker = spawn(name, task)?;
        tracing::debug!(plugin = %plugin, task = name, "spawned task");
        self.running.push(RunningTask {
            plugin: plugin.clone(),
            worker,
        });
        Ok(())
    }

    /// Cancel a plugin's task by name
    pub fn cancel(&mut self, plugin: &PluginId, name: &str) -> bool {
        let mut found = false;
        for task in &self.running {
            if &task.plugin == plugin && task.worker.name() == name && !task.worker.is_cancelled() {
                task.worker.cancel();
                found = true;
            }
        }
        found
    }

    /// Cancel every task a plugin started
    pub fn cancel_plugin(&mut self, plugin: &PluginId) {
        for task in self.running.iter().filter(|t| &t.plugin == plugin) {
            task.worker.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        for task in &self.running {
            task.worker.cancel();
        }
    }

    /// Drain events of every task without blocking, dropping finished ones
    pub fn poll(&mut self) -> Vec<(PluginId, String, TaskEvent<TaskOutput>)> {
        let mut events = Vec::new();
        for task in &mut self.running {
            for event in task.worker.poll() {
                events.push((task.plugin.clone(), task.worker.name().to_string(), event));
            }
        }
        self.running.retain(|t| !t.worker.is_finished());
        events
    }

    /// Block until every task is done, returning their remaining events
    pub fn wait_all(&mut self) -> Vec<(PluginId, String, TaskEvent<TaskOutput>)> {
        let mut events = Vec::new();
        for task in self.running.drain(..) {
            let plugin = task.plugin;
            let name = task.worker.name().to_string();
            for event in task.worker.wait() {
                events.push((plugin.clone(), name.clone(), event));
            }
        }
        events
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_finished() {
        let worker = spawn("sum", |cx: &TaskContext<u32>| {
            cx.progress(1, Some(2), "half way");
            cx.checkpoint()?;
            Ok(40 + 2)
        })
        .unwrap();

        let events = worker.wait();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TaskEvent::Progress { done: 1, .. }));
        assert!(matches!(events[1], TaskEvent::Finished(42)));
    }

    #[test]
    fn test_cancel_at_checkpoint() {
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let worker = spawn("slow", move |cx: &TaskContext<()>| {
            let _ = go_rx.recv_timeout(Duration::from_secs(5));
            cx.checkpoint()?;
            Ok(())
        })
        .unwrap();

        worker.cancel();
        go_tx.send(()).unwrap();

        let events = worker.wait();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_cancelled());
    }

    #[test]
    fn test_failure_is_reported_not_raised() {
        let worker = spawn("io", |_: &TaskContext<()>| {
            Err(RuntimeError::NetworkOrIo("connection refused".to_string()))
        })
        .unwrap();

        let events = worker.wait();
        assert!(matches!(events[0], TaskEvent::Failed(RuntimeError::NetworkOrIo(_))));
    }

    #[test]
    fn test_poll_does_not_block() {
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let mut worker = spawn("blocked", move |_: &TaskContext<()>| {
            let _ = go_rx.recv_timeout(Duration::from_secs(5));
            Ok(())
        })
        .unwrap();

        assert!(worker.poll().is_empty());
        assert!(!worker.is_finished());
        go_tx.send(()).unwrap();
        let events = worker.wait();
        assert!(matches!(events[0], TaskEvent::Finished(())));
    }

    #[test]
    fn test_pool_tags_events_with_plugin() {
        let mut pool = TaskPool::new();
        let editor = PluginId::from("editor");
        pool.spawn(&editor, "count", |_| Ok(boxed(3usize))).unwrap();

        let events = pool.wait_all();
        assert!(pool.is_empty());
        assert_eq!(events.len(), 1);
        let (plugin, name, event) = &events[0];
        assert_eq!(plugin, &editor);
        assert_eq!(name, "count");
        match event {
            TaskEvent::Finished(value) => assert_eq!(value.downcast_ref::<usize>(), Some(&3)),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_pool_cancel_by_name() {
        let mut pool = TaskPool::new();
        let editor = PluginId::from("editor");
        let (go_tx, go_rx) = mpsc::channel::<()>();
        pool.spawn(&editor, "slow", move |cx| {
            let _ = go_rx.recv_timeout(Duration::from_secs(5));
            cx.checkpoint()?;
            Ok(boxed(()))
        })
        .unwrap();

        assert!(!pool.cancel(&editor, "other"));
        assert!(pool.cancel(&editor, "slow"));
        go_tx.send(()).unwrap();
        let events = pool.wait_all();
        assert!(events[0].2.is_cancelled());
    }
}
