//! Deterministic stand-ins for the browser.
//!
//! [`ManualEnvironment`] delivers frames, resizes and pointer moves only when
//! told to, and [`RecordingPainter`] keeps every draw call for inspection.
//! Together they drive a full [`Mount`](crate::Mount) without a display.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::color::Rgba;
use crate::env::{
    Environment, FrameCallback, FrameHandle, FrameHost, ListenerId, PointerListener,
    ResizeListener,
};
use crate::error::BackdropError;
use crate::glyph::SymbolSource;
use crate::painter::{Font, Point, SurfacePainter};
use crate::pointer::PointerPosition;
use crate::viewport::ViewportSize;

/// One recorded [`SurfacePainter`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCall {
    Clear,
    StrokePath {
        points: Vec<Point>,
        color: Rgba,
        width: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        color: Rgba,
        font: Font,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Default)]
struct PaintLog {
    calls: Vec<PaintCall>,
    fail_after: Option<usize>,
}

/// Records draw calls. Clones share one log, so a test can keep a clone
/// while the renderer owns the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingPainter {
    log: Rc<RefCell<PaintLog>>,
}

impl RecordingPainter {
    /// Snapshot of every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<PaintCall> {
        self.log.borrow().calls.clone()
    }

    /// Return and forget the calls so far.
    pub fn take_calls(&self) -> Vec<PaintCall> {
        std::mem::take(&mut self.log.borrow_mut().calls)
    }

    /// Reject every call once `n` more have been recorded.
    pub fn fail_after(&self, n: usize) {
        let mut log = self.log.borrow_mut();
        log.fail_after = Some(log.calls.len() + n);
    }

    fn record(&self, call: PaintCall) -> Result<(), BackdropError> {
        let mut log = self.log.borrow_mut();
        if log.fail_after.is_some_and(|limit| log.calls.len() >= limit) {
            return Err(BackdropError::fault("surface rejected draw call"));
        }
        log.calls.push(call);
        Ok(())
    }
}

impl SurfacePainter for RecordingPainter {
    fn clear(&mut self) -> Result<(), BackdropError> {
        self.record(PaintCall::Clear)
    }

    fn stroke_path(
        &mut self,
        points: &[Point],
        color: Rgba,
        width: f64,
    ) -> Result<(), BackdropError> {
        self.record(PaintCall::StrokePath {
            points: points.to_vec(),
            color,
            width,
        })
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        color: Rgba,
        font: Font,
    ) -> Result<(), BackdropError> {
        self.record(PaintCall::FillText {
            text: text.to_owned(),
            x,
            y,
            color,
            font,
        })
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), BackdropError> {
        self.record(PaintCall::FillRect {
            x,
            y,
            width,
            height,
            color,
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackdropError> {
        self.record(PaintCall::Resize { width, height })
    }
}

/// Walks the alphabet in order: `A`, `B`, `C`, ...
#[derive(Clone, Debug, Default)]
pub struct CyclingSymbols {
    next: usize,
}

impl SymbolSource for CyclingSymbols {
    fn next_index(&mut self, len: usize) -> usize {
        let index = self.next % len;
        self.next += 1;
        index
    }
}

/// A host whose clock only moves when a test calls [`run_frame`].
///
/// [`run_frame`]: ManualEnvironment::run_frame
pub struct ManualEnvironment {
    available: Cell<bool>,
    refuse_frames: Cell<bool>,
    refuse_pointer_listeners: Cell<bool>,
    viewport: Cell<(f64, f64)>,
    clock_ms: Cell<f64>,
    frame_interval_ms: f64,
    next_id: Cell<u32>,
    frames: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    requested: Cell<u64>,
    cancelled: Cell<usize>,
    resize: RefCell<Vec<(ListenerId, ResizeListener)>>,
    pointer: RefCell<Vec<(ListenerId, PointerListener)>>,
}

impl ManualEnvironment {
    /// A host with a `width` x `height` viewport and 16ms frames.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            available: Cell::new(true),
            refuse_frames: Cell::new(false),
            refuse_pointer_listeners: Cell::new(false),
            viewport: Cell::new((width, height)),
            clock_ms: Cell::new(0.0),
            frame_interval_ms: 16.0,
            next_id: Cell::new(1),
            frames: RefCell::new(Vec::new()),
            requested: Cell::new(0),
            cancelled: Cell::new(0),
            resize: RefCell::new(Vec::new()),
            pointer: RefCell::new(Vec::new()),
        }
    }

    /// A host whose viewport cannot be measured.
    #[must_use]
    pub fn unavailable() -> Self {
        let env = Self::new(800.0, 600.0);
        env.available.set(false);
        env
    }

    /// Fail every later frame request.
    pub fn refuse_frames(&self) {
        self.refuse_frames.set(true);
    }

    /// Fail every later pointer listener registration.
    pub fn refuse_pointer_listeners(&self) {
        self.refuse_pointer_listeners.set(true);
    }

    /// Change the viewport and notify resize listeners.
    pub fn resize_to(&self, width: f64, height: f64) {
        self.viewport.set((width, height));
        let listeners: Vec<_> = self.resize.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn move_pointer(&self, x: f64, y: f64) {
        let listeners: Vec<_> = self.pointer.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(PointerPosition::new(x, y));
        }
    }

    /// Advance the clock one interval and deliver every pending frame.
    /// Returns `false` (and leaves the clock alone) if nothing was pending.
    pub fn run_frame(&self) -> bool {
        let due = std::mem::take(&mut *self.frames.borrow_mut());
        if due.is_empty() {
            return false;
        }
        let now = self.clock_ms.get() + self.frame_interval_ms;
        self.clock_ms.set(now);
        for (_, callback) in due {
            callback(now);
        }
        true
    }

    /// Run up to `n` frames, stopping early once nothing is pending.
    pub fn run_frames(&self, n: usize) -> usize {
        (0..n).take_while(|_| self.run_frame()).count()
    }

    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    #[must_use]
    pub fn frames_requested(&self) -> u64 {
        self.requested.get()
    }

    #[must_use]
    pub fn frames_cancelled(&self) -> usize {
        self.cancelled.get()
    }

    #[must_use]
    pub fn resize_listeners(&self) -> usize {
        self.resize.borrow().len()
    }

    #[must_use]
    pub fn pointer_listeners(&self) -> usize {
        self.pointer.borrow().len()
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl FrameHost for ManualEnvironment {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, BackdropError> {
        if self.refuse_frames.get() {
            return Err(BackdropError::unavailable("frame request refused"));
        }
        #[allow(clippy::cast_possible_wrap)]
        let handle = FrameHandle(self.next_id() as i32);
        self.requested.set(self.requested.get() + 1);
        self.frames.borrow_mut().push((handle, callback));
        Ok(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut frames = self.frames.borrow_mut();
        let before = frames.len();
        frames.retain(|(h, _)| *h != handle);
        if frames.len() != before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

impl Environment for ManualEnvironment {
    fn viewport_size(&self) -> Result<ViewportSize, BackdropError> {
        if !self.available.get() {
            return Err(BackdropError::unavailable("no viewport"));
        }
        let (width, height) = self.viewport.get();
        ViewportSize::new(width, height)
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, BackdropError> {
        let id = ListenerId(self.next_id());
        self.resize.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.resize.borrow_mut().retain(|(l, _)| *l != id);
    }

    fn add_pointer_listener(&self, listener: PointerListener) -> Result<ListenerId, BackdropError> {
        if self.refuse_pointer_listeners.get() {
            return Err(BackdropError::unavailable("pointer listener refused"));
        }
        let id = ListenerId(self.next_id());
        self.pointer.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_pointer_listener(&self, id: ListenerId) {
        self.pointer.borrow_mut().retain(|(l, _)| *l != id);
    }
}

impl fmt::Debug for ManualEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualEnvironment")
            .field("viewport", &self.viewport.get())
            .field("clock_ms", &self.clock_ms.get())
            .field("pending_frames", &self.pending_frames())
            .field("resize_listeners", &self.resize_listeners())
            .field("pointer_listeners", &self.pointer_listeners())
            .finish_non_exhaustive()
    }
}
