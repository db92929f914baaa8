use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::{Allocator, Global};
use crate::util::error::OutOfMemory;

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct ZeroSizedType;

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

#[derive(Debug, Default)]
struct BombState {
    live: Cell<usize>,
    fuse: Cell<Option<usize>>,
}

/// Hands out [`CloneBomb`]s and keeps count of how many are alive, so that tests can detect both
/// leaked and doubly dropped elements.
#[derive(Debug, Clone, Default)]
pub struct BombFactory(Rc<BombState>);

impl BombFactory {
    pub fn new() -> BombFactory {
        BombFactory::default()
    }

    pub fn make(&self, value: usize) -> CloneBomb {
        self.0.live.set(self.0.live.get() + 1);
        CloneBomb {
            value,
            factory: self.clone(),
        }
    }

    /// Makes the `nth` clone from now (1-indexed) panic.
    pub fn arm(&self, nth: usize) {
        self.0.fuse.set(Some(nth));
    }

    pub fn disarm(&self) {
        self.0.fuse.set(None);
    }

    pub fn live(&self) -> usize {
        self.0.live.get()
    }
}

/// An element whose [`Clone`] implementation can be made to panic on demand.
pub struct CloneBomb {
    pub value: usize,
    factory: BombFactory,
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let state = &self.factory.0;
        match state.fuse.get() {
            Some(1) => {
                state.fuse.set(None);
                panic!("CloneBomb {} exploded", self.value);
            },
            Some(n) => state.fuse.set(Some(n - 1)),
            None => (),
        }
        self.factory.make(self.value)
    }
}

impl Drop for CloneBomb {
    fn drop(&mut self) {
        let live = &self.factory.0.live;
        live.set(live.get().checked_sub(1).expect("CloneBomb dropped more times than created"));
    }
}

impl PartialEq for CloneBomb {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Debug for CloneBomb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CloneBomb({})", self.value)
    }
}

#[derive(Debug, Default)]
struct TestAllocState {
    live: Cell<usize>,
    allocations: Cell<usize>,
    failing: Cell<bool>,
}

/// An [`Allocator`] backed by [`Global`] that counts live blocks and can be switched into a
/// failing mode. Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct TestAlloc(Rc<TestAllocState>);

impl TestAlloc {
    pub fn new() -> TestAlloc {
        TestAlloc::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.0.failing.set(failing);
    }

    /// The number of blocks which are currently allocated.
    pub fn live(&self) -> usize {
        self.0.live.get()
    }

    /// The number of successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.0.allocations.get()
    }
}

// SAFETY: All blocks come from Global, and clones share the same underlying allocator.
unsafe impl Allocator for TestAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if self.0.failing.get() {
            return Err(OutOfMemory { layout });
        }

        let ptr = Global.allocate(layout)?;
        self.0.live.set(self.0.live.get() + 1);
        self.0.allocations.set(self.0.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.0.live.set(self.0.live.get() - 1);
        // SAFETY: Every block handed out by this allocator came from Global.
        unsafe { Global.deallocate(ptr, layout) }
    }
}
