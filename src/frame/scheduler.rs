use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::foundation::core::FrameIndex;
use crate::host::LayoutHost;

/// Work deferred to the next frame. Receives the host so it can measure geometry.
pub type FrameCallback = Box<dyn FnOnce(&dyn LayoutHost)>;

/// Token identifying one frame request; used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Defers callbacks to the next frame.
///
/// Contract: a callback runs at most once, strictly after the call that requested it returns,
/// and callbacks requested during a frame run on the following frame.
pub trait FrameScheduler {
    /// Queue `callback` for the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;
    /// Drop a queued callback. Returns `false` if it already ran or was never queued.
    fn cancel_frame(&self, handle: FrameHandle) -> bool;
}

struct FrameQueue {
    next_handle: u64,
    frame: FrameIndex,
    pending: Vec<(FrameHandle, FrameCallback)>,
    in_flight: VecDeque<(FrameHandle, FrameCallback)>,
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self {
            next_handle: 1,
            frame: FrameIndex(0),
            pending: Vec::new(),
            in_flight: VecDeque::new(),
        }
    }
}

/// Tick-driven [`FrameScheduler`].
///
/// Nothing runs until the owner calls [`FrameLoop::run_frame`], which makes it suitable both for
/// deterministic replay and for embedding behind a fixed-rate timer. Clones share one queue.
#[derive(Clone, Default)]
pub struct FrameLoop {
    queue: Rc<RefCell<FrameQueue>>,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let q = self.queue.borrow();
        f.debug_struct("FrameLoop")
            .field("frame", &q.frame)
            .field("pending", &q.pending.len())
            .finish()
    }
}

impl FrameLoop {
    /// Create an idle loop positioned at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next frame [`FrameLoop::run_frame`] will execute.
    pub fn frame(&self) -> FrameIndex {
        self.queue.borrow().frame
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Execute one frame: run every callback queued before this call, in request order.
    ///
    /// Returns the number of callbacks that ran.
    pub fn run_frame(&self, host: &dyn LayoutHost) -> usize {
        let frame = {
            let mut q = self.queue.borrow_mut();
            let batch = std::mem::take(&mut q.pending);
            q.in_flight.extend(batch);
            q.frame
        };

        let mut ran = 0usize;
        loop {
            // The borrow must end before the callback runs: callbacks request and cancel frames.
            let next = self.queue.borrow_mut().in_flight.pop_front();
            let Some((_, callback)) = next else {
                break;
            };
            callback(host);
            ran += 1;
        }

        let mut q = self.queue.borrow_mut();
        q.frame = q.frame.next();
        tracing::trace!(frame = frame.0, callbacks = ran, "frame executed");
        ran
    }

    /// Execute `count` consecutive frames. Returns the total number of callbacks that ran.
    pub fn run_frames(&self, host: &dyn LayoutHost, count: u64) -> usize {
        (0..count).map(|_| self.run_frame(host)).sum()
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut q = self.queue.borrow_mut();
        let handle = FrameHandle(q.next_handle);
        q.next_handle += 1;
        q.pending.push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) -> bool {
        let mut q = self.queue.borrow_mut();
        if let Some(pos) = q.pending.iter().position(|(h, _)| *h == handle) {
            q.pending.remove(pos);
            return true;
        }
        if let Some(pos) = q.in_flight.iter().position(|(h, _)| *h == handle) {
            q.in_flight.remove(pos);
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/scheduler.rs"]
mod tests;
