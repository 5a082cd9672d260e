use eframe::egui::Context;

use lexgraph::{FrameHandle, FrameHost};

/// Maps animation-frame requests onto egui repaints.
///
/// egui cannot withdraw a repaint request, so cancelling only forgets the
/// handle; the animator already ignores frames it no longer expects.
pub(super) struct EguiFrameHost {
    ctx: Context,
    next: u64,
}

impl EguiFrameHost {
    pub(super) fn new(ctx: Context) -> Self {
        Self { ctx, next: 0 }
    }
}

impl FrameHost for EguiFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next = self.next.wrapping_add(1);
        self.ctx.request_repaint();
        FrameHandle::new(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        tracing::trace!(frame = handle.id(), "dropping egui frame request");
    }
}
