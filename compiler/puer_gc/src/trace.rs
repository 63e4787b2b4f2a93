//! Handles and the tracing protocol.

use std::fmt;

/// Handle to a collector-owned object.
///
/// Handles are plain data: copying one does not keep the object alive. An
/// object survives a cycle only if it is reachable from the roots handed to
/// the collector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GcRef {
    index: u32,
    generation: u32,
}

impl GcRef {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        GcRef { index, generation }
    }

    /// Slot index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot at allocation time.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for GcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Per-slot bookkeeping.
///
/// `prev`/`next` thread every live object into one doubly-linked list, which
/// is what the sweeper walks.
#[derive(Clone, Debug)]
pub(crate) struct Header {
    pub(crate) generation: u32,
    pub(crate) live: bool,
    pub(crate) mark: bool,
    pub(crate) prev: Option<u32>,
    pub(crate) next: Option<u32>,
}

impl Header {
    pub(crate) fn new(mark: bool, next: Option<u32>) -> Self {
        Header {
            generation: 0,
            live: true,
            mark,
            prev: None,
            next,
        }
    }
}

/// Marks a white object gray. Stale or freed handles are ignored.
pub(crate) fn shade_slot(headers: &mut [Header], gray: &mut Vec<u32>, polarity: bool, r: GcRef) {
    let Some(header) = headers.get_mut(r.index as usize) else {
        return;
    };
    if !header.live || header.generation != r.generation {
        return;
    }
    if header.mark != polarity {
        header.mark = polarity;
        gray.push(r.index);
    }
}

/// Marking context handed to [`Trace::trace`].
pub struct Tracer<'t> {
    pub(crate) headers: &'t mut [Header],
    pub(crate) gray: &'t mut Vec<u32>,
    pub(crate) polarity: bool,
}

impl Tracer<'_> {
    /// Mark a child object reachable.
    #[inline]
    pub fn mark(&mut self, r: GcRef) {
        shade_slot(self.headers, self.gray, self.polarity, r);
    }

    /// Mark an optional child.
    #[inline]
    pub fn mark_opt(&mut self, r: Option<GcRef>) {
        if let Some(r) = r {
            self.mark(r);
        }
    }
}

/// Enumerates the outgoing references of an object (its scan callback).
///
/// Root sets implement this too: the collector traces them once when a cycle
/// begins.
pub trait Trace {
    fn trace(&self, tracer: &mut Tracer<'_>);
}

impl Trace for GcRef {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        tracer.mark(*self);
    }
}

impl<T: Trace> Trace for [T] {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for item in self {
            item.trace(tracer);
        }
    }
}

impl<T: Trace> Trace for Vec<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.as_slice().trace(tracer);
    }
}

impl<T: Trace> Trace for Option<T> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        if let Some(inner) = self {
            inner.trace(tracer);
        }
    }
}
