//! The collector: allocation, incremental marking, sliced sweeping.

use tracing::{debug, trace};

use crate::trace::{shade_slot, Header};
use crate::{GcError, GcRef, Trace, Tracer};

/// Collector tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GcConfig {
    /// Objects visited per sweep quantum. Zero is treated as one.
    pub sweep_slice: usize,
    /// Whether the evaluator runs one collector quantum after each statement
    /// of a sequence. The collector itself ignores this flag.
    pub step_per_statement: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            sweep_slice: 20,
            step_per_statement: true,
        }
    }
}

/// Where the collector is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GcPhase {
    Idle,
    Marking,
    Sweeping,
}

/// Running totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Objects allocated since creation.
    pub allocated: u64,
    /// Objects reclaimed since creation.
    pub freed: u64,
    /// Cycles started since creation.
    pub cycles: u64,
}

/// Owner of every heap object of type `T`.
pub struct Collector<T> {
    headers: Vec<Header>,
    objects: Vec<Option<T>>,
    free: Vec<u32>,
    /// Head of the all-objects list.
    head: Option<u32>,
    gray: Vec<u32>,
    /// Mark value meaning "reached this cycle"; flips at every cycle start.
    polarity: bool,
    phase: GcPhase,
    sweep_cursor: Option<u32>,
    live: usize,
    config: GcConfig,
    stats: GcStats,
}

impl<T: Trace> Collector<T> {
    pub fn new(config: GcConfig) -> Self {
        Collector {
            headers: Vec::new(),
            objects: Vec::new(),
            free: Vec::new(),
            head: None,
            gray: Vec::new(),
            polarity: false,
            phase: GcPhase::Idle,
            sweep_cursor: None,
            live: 0,
            config,
            stats: GcStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> GcConfig {
        self.config
    }

    #[inline]
    pub fn phase(&self) -> GcPhase {
        self.phase
    }

    #[inline]
    pub fn stats(&self) -> GcStats {
        self.stats
    }

    /// Number of live (not yet reclaimed) objects.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Take ownership of `object` and return a handle to it.
    ///
    /// The object is marked with the current polarity, so a cycle already in
    /// progress will not sweep it; during marking it is also queued gray so
    /// its children get traced.
    pub fn alloc(&mut self, object: T) -> Result<GcRef, GcError> {
        let mark = self.polarity;
        let next = self.head;
        let index = if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.objects[slot] = Some(object);
            let header = &mut self.headers[slot];
            header.live = true;
            header.mark = mark;
            header.prev = None;
            header.next = next;
            index
        } else {
            let index = u32::try_from(self.objects.len()).map_err(|_| GcError::OutOfMemory)?;
            self.objects.push(Some(object));
            self.headers.push(Header::new(mark, next));
            index
        };

        if let Some(old_head) = next {
            self.headers[old_head as usize].prev = Some(index);
        }
        self.head = Some(index);

        if self.phase == GcPhase::Marking {
            self.gray.push(index);
        }
        self.live += 1;
        self.stats.allocated += 1;
        Ok(GcRef::new(index, self.headers[index as usize].generation))
    }

    /// Resolve a handle. Returns `None` for reclaimed objects.
    pub fn get(&self, r: GcRef) -> Option<&T> {
        let header = self.headers.get(r.index() as usize)?;
        if !header.live || header.generation != r.generation() {
            return None;
        }
        self.objects.get(r.index() as usize)?.as_ref()
    }

    /// Resolve a handle mutably. Returns `None` for reclaimed objects.
    pub fn get_mut(&mut self, r: GcRef) -> Option<&mut T> {
        let header = self.headers.get(r.index() as usize)?;
        if !header.live || header.generation != r.generation() {
            return None;
        }
        self.objects.get_mut(r.index() as usize)?.as_mut()
    }

    #[inline]
    pub fn is_live(&self, r: GcRef) -> bool {
        self.get(r).is_some()
    }

    /// Whether `r` carries the current mark (black or gray).
    pub fn is_marked(&self, r: GcRef) -> bool {
        self.headers
            .get(r.index() as usize)
            .is_some_and(|h| h.live && h.generation == r.generation() && h.mark == self.polarity)
    }

    /// Write barrier.
    ///
    /// Call with every handle stored into a heap object or root while a
    /// cycle may be marking. Outside the marking phase this does nothing.
    #[inline]
    pub fn shade(&mut self, r: GcRef) {
        if self.phase == GcPhase::Marking {
            shade_slot(&mut self.headers, &mut self.gray, self.polarity, r);
        }
    }

    /// Perform one quantum of collection work.
    ///
    /// Idle starts a cycle (tracing `roots`) and takes its first mark step;
    /// marking pops and scans one gray object; sweeping visits one slice of
    /// the object list. Returns `false` exactly when this call completed the
    /// cycle.
    pub fn collect_step<R: Trace + ?Sized>(&mut self, roots: &R) -> bool {
        match self.phase {
            GcPhase::Idle => {
                self.begin_cycle(roots);
                if !self.mark_step() {
                    self.start_sweep();
                }
                true
            }
            GcPhase::Marking => {
                if !self.mark_step() {
                    self.start_sweep();
                }
                true
            }
            GcPhase::Sweeping => {
                if self.sweep_slice() {
                    true
                } else {
                    self.end_cycle();
                    false
                }
            }
        }
    }

    /// Run collection to completion and return the number of objects freed.
    ///
    /// A cycle already in progress is finished first; then a fresh cycle runs
    /// from `roots`, so everything unreachable at the time of the call is
    /// reclaimed.
    pub fn collect_full<R: Trace + ?Sized>(&mut self, roots: &R) -> u64 {
        let before = self.stats.freed;
        self.finish_cycle();
        self.begin_cycle(roots);
        self.finish_cycle();
        self.stats.freed - before
    }

    fn begin_cycle<R: Trace + ?Sized>(&mut self, roots: &R) {
        self.polarity = !self.polarity;
        self.gray.clear();
        self.phase = GcPhase::Marking;
        self.stats.cycles += 1;
        let mut tracer = Tracer {
            headers: &mut self.headers,
            gray: &mut self.gray,
            polarity: self.polarity,
        };
        roots.trace(&mut tracer);
        debug!(
            cycle = self.stats.cycles,
            live = self.live,
            roots = self.gray.len(),
            "gc cycle begin"
        );
    }

    /// Scan one gray object. Returns whether gray work remains.
    fn mark_step(&mut self) -> bool {
        let Some(index) = self.gray.pop() else {
            return false;
        };
        if let Some(Some(object)) = self.objects.get(index as usize) {
            let mut tracer = Tracer {
                headers: &mut self.headers,
                gray: &mut self.gray,
                polarity: self.polarity,
            };
            object.trace(&mut tracer);
        }
        !self.gray.is_empty()
    }

    fn start_sweep(&mut self) {
        self.phase = GcPhase::Sweeping;
        self.sweep_cursor = self.head;
    }

    /// Visit one slice of the object list. Returns whether objects remain.
    fn sweep_slice(&mut self) -> bool {
        let budget = self.config.sweep_slice.max(1);
        let mut visited = 0;
        let mut freed = 0;
        while visited < budget {
            let Some(index) = self.sweep_cursor else {
                break;
            };
            let header = &self.headers[index as usize];
            self.sweep_cursor = header.next;
            if header.mark != self.polarity {
                self.release(index);
                freed += 1;
            }
            visited += 1;
        }
        trace!(visited, freed, "gc sweep slice");
        self.sweep_cursor.is_some()
    }

    fn end_cycle(&mut self) {
        self.phase = GcPhase::Idle;
        self.sweep_cursor = None;
        debug!(
            cycle = self.stats.cycles,
            live = self.live,
            freed_total = self.stats.freed,
            "gc cycle end"
        );
    }

    fn finish_cycle(&mut self) {
        if self.phase == GcPhase::Marking {
            while self.mark_step() {}
            self.start_sweep();
        }
        if self.phase == GcPhase::Sweeping {
            while self.sweep_slice() {}
            self.end_cycle();
        }
    }

    /// Unlink and drop the object in `index`.
    fn release(&mut self, index: u32) {
        let slot = index as usize;
        let (prev, next) = {
            let header = &mut self.headers[slot];
            header.live = false;
            header.generation = header.generation.wrapping_add(1);
            (header.prev.take(), header.next.take())
        };
        match prev {
            Some(p) => self.headers[p as usize].next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.headers[n as usize].prev = prev;
        }
        self.objects[slot] = None;
        self.free.push(index);
        self.live -= 1;
        self.stats.freed += 1;
    }
}

impl<T: Trace> Default for Collector<T> {
    fn default() -> Self {
        Self::new(GcConfig::default())
    }
}

#[cfg(test)]
mod tests;
