use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub trait ActionName {
    fn name(&self) -> &'static str;
}

pub trait Mutate {
    type Action: ActionName;

    fn mutate(&mut self, action: &Self::Action);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

pub struct Store<S> {
    state: Mutex<S>,
    listeners: Mutex<Vec<(ListenerId, Listener<S>)>>,
    next_listener: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S> Store<S>
where
    S: Mutate + Clone,
{
    pub fn new(initial: S) -> Self {
        Self {
            state: Mutex::new(initial),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    pub fn dispatch(&self, action: S::Action) {
        self.apply(&action);
    }

    pub fn apply(&self, action: &S::Action) {
        let snapshot = {
            let mut state = lock(&self.state);
            debug!("dispatch {}", action.name());
            state.mutate(action);
            state.clone()
        };
        self.notify(&snapshot);
    }

    // Applies the action only if `guard` holds, checking and mutating under
    // one lock. Returns whether the action was applied.
    pub fn dispatch_if(&self, guard: impl FnOnce(&S) -> bool, action: S::Action) -> bool {
        let snapshot = {
            let mut state = lock(&self.state);
            if !guard(&state) {
                debug!("skip {}", action.name());
                return false;
            }
            debug!("dispatch {}", action.name());
            state.mutate(&action);
            state.clone()
        };
        self.notify(&snapshot);
        true
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn snapshot(&self) -> S {
        lock(&self.state).clone()
    }

    // Registers a listener called with a snapshot after every applied action.
    // Listeners run outside the state lock and may dispatch.
    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self, snapshot: &S) {
        let listeners: Vec<Listener<S>> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i32,
        label: String,
    }

    enum CounterAction {
        Add(i32),
        Label(String),
    }

    impl ActionName for CounterAction {
        fn name(&self) -> &'static str {
            match self {
                CounterAction::Add(_) => "add",
                CounterAction::Label(_) => "label",
            }
        }
    }

    impl Mutate for Counter {
        type Action = CounterAction;

        fn mutate(&mut self, action: &CounterAction) {
            match action {
                CounterAction::Add(amount) => self.value += amount,
                CounterAction::Label(label) => self.label = label.clone(),
            }
        }
    }

    #[test]
    fn dispatch_applies_in_order() {
        let store = Store::new(Counter::default());
        store.dispatch(CounterAction::Add(2));
        store.dispatch(CounterAction::Add(3));
        store.dispatch(CounterAction::Label("five".to_string()));

        assert_eq!(
            store.snapshot(),
            Counter {
                value: 5,
                label: "five".to_string()
            }
        );
    }

    #[test]
    fn dispatch_if_respects_guard() {
        let store = Store::new(Counter::default());
        assert!(store.dispatch_if(|s| s.value == 0, CounterAction::Add(1)));
        assert!(!store.dispatch_if(|s| s.value == 0, CounterAction::Add(1)));
        assert_eq!(store.read(|s| s.value), 1);
    }

    #[test]
    fn listeners_see_every_change_until_unsubscribed() {
        let store = Store::new(Counter::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(CounterAction::Add(1));
        assert!(!store.dispatch_if(|_| false, CounterAction::Add(1)));
        assert!(store.unsubscribe(id));
        store.dispatch(CounterAction::Add(1));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.unsubscribe(id));
    }
}
