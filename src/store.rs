use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Store – a single-threaded reactive cell
// ---------------------------------------------------------------------------

type Callback<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    value: T,
    subscribers: Vec<(u64, Callback<T>)>,
    /// Ids unsubscribed while the subscriber list was detached for a
    /// notification sweep; drained on the next sweep.
    dead: Vec<u64>,
    next_id: u64,
}

/// A value plus a subscriber list, notified on every write.
///
/// All state cells of the viewer live on the UI thread; `Store` is
/// `Rc`-backed and deliberately `!Send`. Cloning a `Store` yields another
/// handle to the same cell.
pub struct Store<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
                dead: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the value and notify subscribers. Last write wins; there is
    /// no equality gate, so setting an identical value still notifies.
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Modify the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.borrow_mut().value);
        self.notify();
    }

    /// Register a subscriber. The callback runs immediately with the
    /// current value, then again after every write, until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, mut f: impl FnMut(&T) + 'static) -> Subscription {
        let current = self.get();
        f(&current);

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Box::new(f)));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || remove_subscriber(&weak, id))),
        }
    }

    /// A read/subscribe-only view of this cell.
    pub fn reader(&self) -> ReadHandle<T> {
        ReadHandle(self.clone())
    }

    fn notify(&self) {
        let value = self.get();

        // Detach the subscriber list so callbacks can freely call `get`,
        // subscribe, or unsubscribe on this same cell.
        let mut subs = {
            let mut inner = self.inner.borrow_mut();
            let dead = std::mem::take(&mut inner.dead);
            let mut subs = std::mem::take(&mut inner.subscribers);
            if !dead.is_empty() {
                subs.retain(|(id, _)| !dead.contains(id));
            }
            subs
        };

        for (_, callback) in subs.iter_mut() {
            callback(&value);
        }

        let mut inner = self.inner.borrow_mut();
        let added = std::mem::take(&mut inner.subscribers);
        subs.extend(added);
        let dead = std::mem::take(&mut inner.dead);
        if !dead.is_empty() {
            subs.retain(|(id, _)| !dead.contains(id));
        }
        inner.subscribers = subs;
    }
}

fn remove_subscriber<T>(weak: &Weak<RefCell<Inner<T>>>, id: u64) {
    if let Some(inner) = weak.upgrade() {
        let mut inner = inner.borrow_mut();
        // The callback may currently be detached for a notification sweep;
        // the tombstone catches it on re-attach.
        inner.dead.push(id);
        inner.subscribers.retain(|(sid, _)| *sid != id);
    }
}

// ---------------------------------------------------------------------------
// ReadHandle – read/subscribe-only view
// ---------------------------------------------------------------------------

/// A handle that can read and subscribe but not write, so state containers
/// can hand out their cells without opening a mutation side door.
pub struct ReadHandle<T>(Store<T>);

impl<T> Clone for ReadHandle<T> {
    fn clone(&self) -> Self {
        ReadHandle(self.0.clone())
    }
}

impl<T: Clone + 'static> ReadHandle<T> {
    /// Current value.
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// Register a subscriber; see [`Store::subscribe`].
    pub fn subscribe(&self, f: impl FnMut(&T) + 'static) -> Subscription {
        self.0.subscribe(f)
    }
}

// ---------------------------------------------------------------------------
// Subscription – guard returned by subscribe
// ---------------------------------------------------------------------------

/// Keeps a subscriber registered. Dropping it (or calling
/// [`Subscription::unsubscribe`]) unregisters the callback.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregister now instead of at drop time.
    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

// ---------------------------------------------------------------------------
// Derived – cells recomputed from input cells
// ---------------------------------------------------------------------------

/// A read-only cell whose value is recomputed whenever any of its input
/// cells changes. Built with [`derived`], [`derived2`], or [`derived3`].
pub struct Derived<U> {
    out: Store<U>,
    _inputs: Vec<Subscription>,
}

impl<U: Clone + 'static> Derived<U> {
    /// Current value.
    pub fn get(&self) -> U {
        self.out.get()
    }

    /// Register a subscriber; see [`Store::subscribe`].
    pub fn subscribe(&self, f: impl FnMut(&U) + 'static) -> Subscription {
        self.out.subscribe(f)
    }

    /// A read/subscribe-only view of this cell.
    pub fn reader(&self) -> ReadHandle<U> {
        self.out.reader()
    }
}

/// Derive a cell from one input cell.
pub fn derived<A, U>(input: &Store<A>, f: impl Fn(&A) -> U + 'static) -> Derived<U>
where
    A: Clone + 'static,
    U: Clone + 'static,
{
    let out = Store::new(f(&input.get()));
    let writer = out.clone();
    let sub = input.subscribe(move |a| writer.set(f(a)));
    Derived {
        out,
        _inputs: vec![sub],
    }
}

/// Derive a cell from two input cells.
pub fn derived2<A, B, U>(
    a: &Store<A>,
    b: &Store<B>,
    f: impl Fn(&A, &B) -> U + 'static,
) -> Derived<U>
where
    A: Clone + 'static,
    B: Clone + 'static,
    U: Clone + 'static,
{
    let f = Rc::new(f);
    let out = Store::new(f(&a.get(), &b.get()));

    let sub_a = {
        let writer = out.clone();
        let b = b.clone();
        let f = Rc::clone(&f);
        a.subscribe(move |av| writer.set(f(av, &b.get())))
    };
    let sub_b = {
        let writer = out.clone();
        let a = a.clone();
        let f = Rc::clone(&f);
        b.subscribe(move |bv| writer.set(f(&a.get(), bv)))
    };

    Derived {
        out,
        _inputs: vec![sub_a, sub_b],
    }
}

/// Derive a cell from three input cells.
pub fn derived3<A, B, C, U>(
    a: &Store<A>,
    b: &Store<B>,
    c: &Store<C>,
    f: impl Fn(&A, &B, &C) -> U + 'static,
) -> Derived<U>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    U: Clone + 'static,
{
    let f = Rc::new(f);
    let out = Store::new(f(&a.get(), &b.get(), &c.get()));

    let sub_a = {
        let writer = out.clone();
        let b = b.clone();
        let c = c.clone();
        let f = Rc::clone(&f);
        a.subscribe(move |av| writer.set(f(av, &b.get(), &c.get())))
    };
    let sub_b = {
        let writer = out.clone();
        let a = a.clone();
        let c = c.clone();
        let f = Rc::clone(&f);
        b.subscribe(move |bv| writer.set(f(&a.get(), bv, &c.get())))
    };
    let sub_c = {
        let writer = out.clone();
        let a = a.clone();
        let b = b.clone();
        let f = Rc::clone(&f);
        c.subscribe(move |cv| writer.set(f(&a.get(), &b.get(), cv)))
    };

    Derived {
        out,
        _inputs: vec![sub_a, sub_b, sub_c],
    }
}
