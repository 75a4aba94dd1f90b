//! Minimal reactive store: a reducer over events plus subscribers that are
//! notified after every dispatch.

/// State that evolves by folding events into itself.
pub trait Reducer {
    type Event;

    fn reduce(&mut self, event: Self::Event);
}

type Subscriber<S> = Box<dyn Fn(&S)>;

pub struct Store<S: Reducer> {
    state: S,
    subscribers: Vec<Subscriber<S>>,
}

impl<S: Reducer> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Register a listener. Listeners must not dispatch back into the store.
    pub fn subscribe(&mut self, subscriber: impl Fn(&S) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn dispatch(&mut self, event: S::Event) {
        self.state.reduce(event);
        self.notify();
    }

    pub fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl<S: Reducer + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter(i32);

    impl Reducer for Counter {
        type Event = i32;

        fn reduce(&mut self, event: i32) {
            self.0 += event;
        }
    }

    #[test]
    fn dispatch_reduces_then_notifies() {
        let seen = Rc::new(Cell::new(0));
        let mut store = Store::new(Counter::default());
        let sink = seen.clone();
        store.subscribe(move |c| sink.set(c.0));

        store.dispatch(3);
        store.dispatch(-1);

        assert_eq!(store.state().0, 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn dispatch_without_subscribers_still_updates() {
        let mut store: Store<Counter> = Store::default();
        store.dispatch(5);
        assert_eq!(store.state().0, 5);
    }
}
