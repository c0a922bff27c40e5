//! What a backdrop needs from its host: frame callbacks, viewport
//! measurement and the two input listeners.

use std::rc::Rc;

use crate::error::BackdropError;
use crate::pointer::PointerPosition;
use crate::viewport::ViewportSize;

/// Invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Rc<dyn Fn(f64)>;
pub type ResizeListener = Rc<dyn Fn()>;
/// Invoked with the pointer position in surface coordinates.
pub type PointerListener = Rc<dyn Fn(PointerPosition)>;

/// Identifies one requested frame; only good for cancelling it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// One-shot display-refresh callbacks, `requestAnimationFrame` style.
pub trait FrameHost {
    /// Run `callback` once before the next repaint.
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, BackdropError>;

    /// Drop a pending callback. Cancelling a handle that already fired is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);
}

impl<H: FrameHost + ?Sized> FrameHost for Rc<H> {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, BackdropError> {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

pub trait Environment: FrameHost {
    /// Measure the live surface.
    fn viewport_size(&self) -> Result<ViewportSize, BackdropError>;

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, BackdropError>;

    fn remove_resize_listener(&self, id: ListenerId);

    fn add_pointer_listener(&self, listener: PointerListener) -> Result<ListenerId, BackdropError>;

    fn remove_pointer_listener(&self, id: ListenerId);
}
