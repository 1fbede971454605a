//! Multi-producer event queue + frame-scoped stream
//!
//! Producers (parallel sweeps, host collaborators) append through a shared
//! `&EventQueue` or a cloned `QueueWriter`. One serial drain per tick moves
//! everything into a `FrameStream` in arrival order.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::SimulationError;
use crate::logger;

/// Concurrent append-only queue for one event category.
///
/// Unbounded channel: push never drops. `capacity`: плановый объём на тик,
/// растёт если тик произвёл больше событий.
pub struct EventQueue<T> {
    category: &'static str,
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
}

impl<T: Send> EventQueue<T> {
    pub fn with_capacity(category: &'static str, capacity: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            category,
            sender,
            receiver,
            capacity,
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    /// Append one event. Safe to call from any number of workers at once.
    pub fn push(&self, event: T) {
        // Receiver живёт в self, поэтому send не может провалиться
        if self.sender.send(event).is_err() {
            logger::log_error(&format!("{} queue: receiver gone, event lost", self.category));
        }
    }

    /// Cloneable producer handle for collaborators outside the sweeps.
    pub fn writer(&self) -> QueueWriter<T> {
        QueueWriter {
            sender: self.sender.clone(),
        }
    }

    /// Events appended but not yet drained.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow the planned capacity to cover `worst_case` events per tick.
    pub fn ensure_capacity(&mut self, worst_case: usize) {
        if worst_case > self.capacity {
            self.capacity = worst_case;
        }
    }

    /// Serial drain: clears `stream`, then moves every queued event into it.
    ///
    /// Must run only after all producers of the tick have joined.
    pub fn drain_into(&mut self, stream: &mut FrameStream<T>, tick: u64) -> usize {
        stream.begin(tick, self.capacity);
        stream.events.extend(self.receiver.try_iter());

        let drained = stream.events.len();
        if drained > self.capacity {
            let grown = drained.next_power_of_two();
            let growth = SimulationError::QueueGrowth {
                category: self.category,
                from: self.capacity,
                to: grown,
            };
            logger::log_warning(&format!("⚠️ {}", growth));
            self.capacity = grown;
        }

        drained
    }
}

/// Producer handle detached from the queue owner.
#[derive(Clone)]
pub struct QueueWriter<T> {
    sender: Sender<T>,
}

impl<T> QueueWriter<T> {
    /// Returns `false` if the owning queue was torn down.
    pub fn send(&self, event: T) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Ordered, frame-scoped event sequence exposed to presentation.
///
/// Fully replaced by every drain: consumers read (or `take`) before the next tick.
#[derive(Debug, Clone)]
pub struct FrameStream<T> {
    events: Vec<T>,
    tick: u64,
}

impl<T> Default for FrameStream<T> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            tick: 0,
        }
    }
}

impl<T> FrameStream<T> {
    fn begin(&mut self, tick: u64, capacity: usize) {
        self.events.clear();
        self.events.reserve(capacity);
        self.tick = tick;
    }

    /// Tick that produced the current contents.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.events
    }

    /// Read-and-discard.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }
}

impl<'a, T> IntoIterator for &'a FrameStream<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
