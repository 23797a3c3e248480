//! Per-Frame Pass Queue
//!
//! `PassQueue` collects the passes enqueued for one camera and runs them in
//! pipeline-event order. Passes enqueued at the same event keep their enqueue
//! order, which is what lets the depth copy land before the offscreen draw.

use smallvec::SmallVec;

use super::command::CommandList;
use super::context::FrameContext;
use super::node::RenderPass;
use super::stage::RenderPassEvent;
use crate::renderer::host::RenderHost;

/// Queue entry.
struct QueuedPass<'a> {
    /// Pipeline event
    event: RenderPassEvent,
    /// Enqueue order (stable tie-breaker within an event)
    order: u16,
    /// Pass reference
    pass: &'a dyn RenderPass,
}

/// Ordered list of passes for the current camera.
///
/// # Design
///
/// - **Event-ordered**: passes are sorted by [`RenderPassEvent`]
/// - **Stable within an event**: enqueue order is the tie-breaker
/// - **Borrowing**: the queue only stores references; the feature controller
///   keeps owning its passes, so no pass can be re-setup while queued
///
/// # Usage
///
/// ```ignore
/// let mut queue = PassQueue::new();
/// feature.add_render_passes(&mut queue);
/// queue.execute(&frame, &mut host);
/// ```
pub struct PassQueue<'a> {
    entries: SmallVec<[QueuedPass<'a>; 16]>,
    next_order: u16,
}

impl Default for PassQueue<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PassQueue<'a> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_order: 0,
        }
    }

    /// Enqueues a pass at its own [`RenderPass::event`].
    #[inline]
    pub fn enqueue(&mut self, pass: &'a dyn RenderPass) -> &mut Self {
        self.enqueue_at(pass.event(), pass)
    }

    /// Enqueues a pass at an explicit event.
    pub fn enqueue_at(&mut self, event: RenderPassEvent, pass: &'a dyn RenderPass) -> &mut Self {
        self.entries.push(QueuedPass {
            event,
            order: self.next_order,
            pass,
        });
        self.next_order = self.next_order.wrapping_add(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether any pass is queued at `event`.
    #[inline]
    #[must_use]
    pub fn has_event(&self, event: RenderPassEvent) -> bool {
        self.entries.iter().any(|e| e.event == event)
    }

    /// Clears the queue (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_order = 0;
    }

    /// Returns the passes in execution order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&'a dyn RenderPass> {
        let mut keys: SmallVec<[(u16, u16, usize); 16]> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.event.order(), e.order, i))
            .collect();
        keys.sort_unstable();
        keys.into_iter().map(|(_, _, i)| self.entries[i].pass).collect()
    }

    /// Records every queued pass into a single command list.
    ///
    /// Each pass is wrapped in a debug group named after it.
    #[must_use]
    pub fn record(&self, frame: &FrameContext) -> CommandList {
        let mut cmd = CommandList::with_capacity(self.entries.len() * 8);
        for pass in self.ordered() {
            cmd.push_debug_group(pass.name());
            pass.execute(frame, &mut cmd);
            cmd.pop_debug_group();
        }
        cmd
    }

    /// Records the queue and hands the result to the host.
    pub fn execute(&self, frame: &FrameContext, host: &mut dyn RenderHost) {
        let cmd = self.record(frame);
        log::trace!(
            "Executing {} passes ({} commands) for {} camera",
            self.entries.len(),
            cmd.len(),
            frame.camera_type.name()
        );
        host.execute_commands(cmd);
    }
}
