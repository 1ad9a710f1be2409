use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Dependency graph between signals and their observers.
struct Graph {
    current_observer: Option<usize>,
    // Signal ID -> observer IDs that read it
    dependents: HashMap<usize, HashSet<usize>>,
    // Observer ID -> signal IDs it read
    observer_deps: HashMap<usize, HashSet<usize>>,
    // Observer ID -> effect function
    observers: HashMap<usize, Arc<dyn Fn() + Send + Sync>>,
    // Memo ID -> dirty flag
    memo_dirty: HashMap<usize, bool>,
}

impl Graph {
    fn new() -> Self {
        Self {
            current_observer: None,
            dependents: HashMap::new(),
            observer_deps: HashMap::new(),
            observers: HashMap::new(),
            memo_dirty: HashMap::new(),
        }
    }

    fn clear(&mut self) {
        self.current_observer = None;
        self.dependents.clear();
        self.observer_deps.clear();
        self.observers.clear();
        self.memo_dirty.clear();
    }

    fn detach_observer(&mut self, observer_id: usize) {
        if let Some(read_signals) = self.observer_deps.remove(&observer_id) {
            for signal_id in read_signals {
                if let Some(deps) = self.dependents.get_mut(&signal_id) {
                    deps.remove(&observer_id);
                }
            }
        }
    }
}

/// Shared runtime state; guards hold a `Weak` to it so dropping them
/// after the runtime is gone is a no-op.
pub struct RuntimeCore {
    graph: Mutex<Graph>,
}

impl RuntimeCore {
    fn new() -> Self {
        Self {
            graph: Mutex::new(Graph::new()),
        }
    }

    pub(crate) fn remove_observer(&mut self, observer_id: usize) {
        let mut graph = self.graph.lock().unwrap();
        graph.observers.remove(&observer_id);
        graph.memo_dirty.remove(&observer_id);
        graph.detach_observer(observer_id);
    }
}

/// Reactive runtime: tracks which observers read which signals and
/// delivers change notifications.
///
/// There is a global runtime by default; [`Runtime::scope`] pushes a fresh
/// isolated runtime for the duration of a closure, which is the way tests
/// keep their reactive graphs apart.
///
/// # Examples
///
/// ```
/// use satchel::runtime::Runtime;
/// use satchel::Signal;
///
/// Runtime::scope(|| {
///     let signal = Signal::new(0);
///     assert_eq!(signal.get(), 0);
/// });
/// // The scoped runtime and all of its graph state is dropped here.
/// ```
pub struct Runtime {
    next_id: AtomicUsize,
    core: Arc<RwLock<RuntimeCore>>,
}

thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<Runtime>>> = const { RefCell::new(Vec::new()) };
}

impl Runtime {
    /// Create a new isolated runtime with its own dependency graph.
    pub fn new() -> Arc<Self> {
        Arc::new(Runtime {
            next_id: AtomicUsize::new(0),
            core: Arc::new(RwLock::new(RuntimeCore::new())),
        })
    }

    /// Run a closure with a fresh isolated runtime as the current one.
    ///
    /// The runtime and all its graph state is dropped when the closure
    /// returns.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(), f)
    }

    /// The global fallback runtime, used when no scoped runtime is active.
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static RUNTIME: OnceLock<Arc<Runtime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(Self::new))
    }

    /// The current runtime: top of the thread-local stack, or the global
    /// fallback.
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(Self::global)
        })
    }

    /// Run a closure with a specific runtime as the current one.
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| stack.borrow_mut().push(runtime));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Drop all observers, dependencies, and dirty state from this runtime
    /// and reset the ID counter. Mainly useful between tests.
    pub fn clear(&self) {
        let core = self.core.read().unwrap();
        core.graph.lock().unwrap().clear();
        drop(core);
        self.next_id.store(0, Ordering::SeqCst);
    }

    pub(crate) fn core(&self) -> Arc<RwLock<RuntimeCore>> {
        Arc::clone(&self.core)
    }

    /// Allocate the next unique ID for a signal, memo, or effect.
    pub(crate) fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Record that the current observer (if any) read the given signal.
    pub(crate) fn track_read(&self, signal_id: usize) {
        let core = self.core.read().unwrap();
        let mut graph = core.graph.lock().unwrap();
        if let Some(observer_id) = graph.current_observer {
            graph
                .dependents
                .entry(signal_id)
                .or_default()
                .insert(observer_id);
            graph
                .observer_deps
                .entry(observer_id)
                .or_default()
                .insert(signal_id);
        }
    }

    /// Notify every observer of the given signal: memos are marked dirty
    /// and effects run immediately.
    pub(crate) fn notify_observers(&self, signal_id: usize) {
        for observer_id in self.dependents_of(signal_id) {
            self.mark_observer_dirty(observer_id, true);
        }
    }

    /// Invalidate every observer of the given signal WITHOUT running
    /// effects: dependent memos (transitively) go dirty and recompute on
    /// their next read, but effect observers are skipped entirely.
    ///
    /// This is the notification mode used when a value is replaced from
    /// another execution context, where re-running a write-back effect
    /// would bounce the update straight back into storage.
    pub(crate) fn invalidate(&self, signal_id: usize) {
        for observer_id in self.dependents_of(signal_id) {
            self.mark_observer_dirty(observer_id, false);
        }
    }

    fn dependents_of(&self, signal_id: usize) -> Vec<usize> {
        let core = self.core.read().unwrap();
        let graph = core.graph.lock().unwrap();
        graph
            .dependents
            .get(&signal_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    fn mark_observer_dirty(&self, observer_id: usize, run_effects: bool) {
        let core = self.core.read().unwrap();
        let mut graph = core.graph.lock().unwrap();

        // Memo: flip the dirty flag and propagate to its own dependents.
        if let Some(dirty) = graph.memo_dirty.get_mut(&observer_id) {
            if *dirty {
                return;
            }
            *dirty = true;

            let dependents = graph
                .dependents
                .get(&observer_id)
                .map(|ids| ids.iter().copied().collect::<Vec<_>>());

            // Release locks before recursing.
            drop(graph);
            drop(core);

            if let Some(dependents) = dependents {
                for dependent_id in dependents {
                    self.mark_observer_dirty(dependent_id, run_effects);
                }
            }
            return;
        }

        // Effect: run it now, unless this is an invalidation-only pass.
        if !run_effects {
            return;
        }
        let effect = graph.observers.get(&observer_id).cloned();
        drop(graph);
        drop(core);

        if let Some(effect) = effect {
            effect();
        }
    }

    /// Register an effect function under the given observer ID, clearing
    /// any dependencies recorded for a previous registration.
    pub(crate) fn create_observer<F>(&self, observer_id: usize, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let core = self.core.read().unwrap();
        let mut graph = core.graph.lock().unwrap();
        graph.detach_observer(observer_id);
        graph.observers.insert(observer_id, Arc::new(f));
    }

    /// Run a closure with the given observer as the current one, so that
    /// signal reads inside it are recorded as its dependencies.
    pub(crate) fn with_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let core = self.core.read().unwrap();
        let prev = {
            let mut graph = core.graph.lock().unwrap();
            graph.current_observer.replace(observer_id)
        };

        let result = f();

        let mut graph = core.graph.lock().unwrap();
        graph.current_observer = prev;

        result
    }

    /// Register a memo; memos start dirty so the first read computes.
    pub(crate) fn register_memo(&self, memo_id: usize) {
        let core = self.core.read().unwrap();
        let mut graph = core.graph.lock().unwrap();
        graph.memo_dirty.insert(memo_id, true);
    }

    pub(crate) fn is_memo_dirty(&self, memo_id: usize) -> bool {
        let core = self.core.read().unwrap();
        let graph = core.graph.lock().unwrap();
        graph.memo_dirty.get(&memo_id).copied().unwrap_or(true)
    }

    pub(crate) fn mark_memo_clean(&self, memo_id: usize) {
        let core = self.core.read().unwrap();
        let mut graph = core.graph.lock().unwrap();
        graph.memo_dirty.insert(memo_id, false);
    }
}
