use adslot_core::{
    domain::ContainerLayout,
    host::{
        Document, ListenerId, ObserverId, PageEvent, PageListener, Scheduler, ScriptCallback,
        ScriptError, Task, TimerId, WidthCallback,
    },
};
use futures::{
    executor::{LocalPool, LocalSpawner},
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    time::Duration,
};

///
/// ManualHost
///
/// Event loop and document with a virtual clock. Nothing happens until the
/// test drives it: spawned futures run on [`ManualHost::run_until_stalled`],
/// timers fire on [`ManualHost::advance`], idle callbacks on
/// [`ManualHost::run_idle`]. Every driver ends by running the local pool, so
/// wakeups caused by a fired callback are processed before it returns.
///

pub struct ManualHost {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    timers: RefCell<BTreeMap<TimerId, (Duration, Task)>>,
    idle: RefCell<VecDeque<Task>>,
    scripts: RefCell<HashSet<String>>,
    injected: RefCell<Vec<String>>,
    loading: RefCell<Vec<(String, ScriptCallback)>>,
    widths: RefCell<HashMap<String, f64>>,
    observers: RefCell<BTreeMap<ObserverId, (String, WidthCallback)>>,
    layouts: RefCell<HashMap<String, ContainerLayout>>,
    layout_writes: Cell<usize>,
    page_listeners: RefCell<BTreeMap<ListenerId, PageListener>>,
}

impl Default for ManualHost {
    fn default() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();

        Self {
            now: Cell::new(Duration::ZERO),
            next_id: Cell::new(0),
            pool: RefCell::new(pool),
            spawner,
            timers: RefCell::default(),
            idle: RefCell::default(),
            scripts: RefCell::default(),
            injected: RefCell::default(),
            loading: RefCell::default(),
            widths: RefCell::default(),
            observers: RefCell::default(),
            layouts: RefCell::default(),
            layout_writes: Cell::new(0),
            page_listeners: RefCell::default(),
        }
    }
}

impl ManualHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    //
    // Event loop
    //

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Move the clock forward, firing due timers in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        self.run_until_stalled();

        loop {
            let due = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, (at, _))| *at <= target)
                .min_by_key(|(id, (at, _))| (*at, **id))
                .map(|(id, _)| *id);
            let Some(id) = due else {
                break;
            };

            let Some((at, task)) = self.timers.borrow_mut().remove(&id) else {
                break;
            };
            self.now.set(at);
            task();
            self.run_until_stalled();
        }

        self.now.set(target);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Run idle callbacks until none are left, including ones they queue.
    pub fn run_idle(&self) {
        loop {
            let next = self.idle.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            self.run_until_stalled();
        }
    }

    /// Run everything that is runnable without moving the clock.
    pub fn settle(&self) {
        self.run_until_stalled();
        self.run_idle();
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    #[must_use]
    pub fn pending_idle(&self) -> usize {
        self.idle.borrow().len()
    }

    //
    // Scripts
    //

    /// Pretend the page already carries `src`.
    pub fn preload_script(&self, src: &str) {
        self.scripts.borrow_mut().insert(src.to_string());
    }

    /// Every src injected so far, in order.
    #[must_use]
    pub fn injected_scripts(&self) -> Vec<String> {
        self.injected.borrow().clone()
    }

    /// Finish every in-flight script load successfully.
    pub fn load_scripts(&self) {
        let loading = self.loading.take();
        for (src, on_load) in loading {
            self.scripts.borrow_mut().insert(src);
            on_load(Ok(()));
        }
        self.run_until_stalled();
    }

    /// Fail every in-flight script load, as an ad blocker would.
    pub fn block_scripts(&self) {
        let loading = self.loading.take();
        for (src, on_load) in loading {
            on_load(Err(ScriptError::Blocked(src)));
        }
        self.run_until_stalled();
    }

    //
    // Layout
    //

    /// Resize a container and notify its observers.
    pub fn set_width(&self, container_id: &str, width: f64) {
        self.widths
            .borrow_mut()
            .insert(container_id.to_string(), width);

        let observers: Vec<WidthCallback> = self
            .observers
            .borrow()
            .values()
            .filter(|(id, _)| id == container_id)
            .map(|(_, callback)| callback.clone())
            .collect();
        for observer in observers {
            observer(width);
        }
    }

    #[must_use]
    pub fn layout(&self, container_id: &str) -> Option<ContainerLayout> {
        self.layouts.borrow().get(container_id).copied()
    }

    #[must_use]
    pub fn layout_writes(&self) -> usize {
        self.layout_writes.get()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    //
    // Page events
    //

    pub fn emit(&self, event: &PageEvent) {
        let listeners: Vec<PageListener> = self.page_listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
        self.run_until_stalled();
    }

    pub fn press_key(&self, key: &str) {
        self.emit(&PageEvent::KeyDown {
            key: key.to_string(),
        });
    }

    #[must_use]
    pub fn page_listener_count(&self) -> usize {
        self.page_listeners.borrow().len()
    }
}

impl Scheduler for ManualHost {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id());
        let at = self.now.get() + delay;
        self.timers.borrow_mut().insert(id, (at, task));

        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }

    fn request_idle(&self, task: Task) {
        self.idle.borrow_mut().push_back(task);
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        // the pool lives as long as the host, so spawning cannot fail
        let _ = self.spawner.spawn_local(future);
    }
}

impl Document for ManualHost {
    fn has_script(&self, src: &str) -> bool {
        self.scripts.borrow().contains(src)
    }

    fn inject_script(&self, src: &str, on_load: ScriptCallback) {
        self.injected.borrow_mut().push(src.to_string());
        self.loading.borrow_mut().push((src.to_string(), on_load));
    }

    fn container_width(&self, container_id: &str) -> Option<f64> {
        self.widths.borrow().get(container_id).copied()
    }

    fn apply_layout(&self, container_id: &str, layout: &ContainerLayout) {
        self.layouts
            .borrow_mut()
            .insert(container_id.to_string(), *layout);
        self.layout_writes.set(self.layout_writes.get() + 1);
    }

    fn observe_width(&self, container_id: &str, on_change: WidthCallback) -> ObserverId {
        let id = ObserverId(self.next_id());
        self.observers
            .borrow_mut()
            .insert(id, (container_id.to_string(), on_change));

        id
    }

    fn unobserve_width(&self, id: ObserverId) {
        self.observers.borrow_mut().remove(&id);
    }

    fn add_page_listener(&self, listener: PageListener) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.page_listeners.borrow_mut().insert(id, listener);

        id
    }

    fn remove_page_listener(&self, id: ListenerId) {
        self.page_listeners.borrow_mut().remove(&id);
    }
}

///
/// TESTS
///
