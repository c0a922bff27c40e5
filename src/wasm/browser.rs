use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use crate::env::{
    Environment, FrameCallback, FrameHandle, FrameHost, ListenerId, PointerListener,
    ResizeListener,
};
use crate::error::BackdropError;
use crate::pointer::PointerPosition;
use crate::viewport::ViewportSize;

type RafClosure = Closure<dyn FnMut(f64)>;

/// The browser window as a backdrop host.
///
/// A single `requestAnimationFrame` closure is created up front and reused for
/// every frame; it forwards to whichever callback was requested last.
pub(crate) struct BrowserEnvironment {
    window: Window,
    canvas: HtmlCanvasElement,
    raf: RafClosure,
    /// Callback for the frame currently requested, if any.
    pending: Rc<RefCell<Option<FrameCallback>>>,
    next_id: Cell<u32>,
    resize: RefCell<Vec<(ListenerId, Closure<dyn FnMut()>)>>,
    pointer: RefCell<Vec<(ListenerId, Closure<dyn FnMut(MouseEvent)>)>>,
}

impl BrowserEnvironment {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
        let window = web_sys::window().ok_or_else(|| BackdropError::unavailable("no window"))?;

        let pending: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&pending);
        let raf = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            // Release the slot before running: the callback requests the next frame.
            let callback = slot.borrow_mut().take();
            if let Some(callback) = callback {
                callback(timestamp_ms);
            }
        }) as Box<dyn FnMut(f64)>);

        Ok(Self {
            window,
            canvas,
            raf,
            pending,
            next_id: Cell::new(1),
            resize: RefCell::new(Vec::new()),
            pointer: RefCell::new(Vec::new()),
        })
    }

    fn next_id(&self) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ListenerId(id)
    }
}

fn js_error(context: &str, err: &JsValue) -> BackdropError {
    BackdropError::unavailable(format!("{context}: {err:?}"))
}

impl FrameHost for BrowserEnvironment {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, BackdropError> {
        *self.pending.borrow_mut() = Some(callback);
        let id = self
            .window
            .request_animation_frame(self.raf.as_ref().unchecked_ref())
            .map_err(|e| js_error("requestAnimationFrame", &e))?;
        Ok(FrameHandle(id))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            warn!(?err, "cancelAnimationFrame failed");
        }
        self.pending.borrow_mut().take();
    }
}

impl Environment for BrowserEnvironment {
    fn viewport_size(&self) -> Result<ViewportSize, BackdropError> {
        let dimension = |value: Result<JsValue, JsValue>, name: &str| {
            value
                .map_err(|e| js_error(name, &e))?
                .as_f64()
                .ok_or_else(|| BackdropError::unavailable(format!("{name} is not a number")))
        };
        let width = dimension(self.window.inner_width(), "innerWidth")?;
        let height = dimension(self.window.inner_height(), "innerHeight")?;
        ViewportSize::new(width, height)
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Result<ListenerId, BackdropError> {
        let closure = Closure::wrap(Box::new(move || listener()) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener(resize)", &e))?;
        let id = self.next_id();
        self.resize.borrow_mut().push((id, closure));
        Ok(id)
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        let mut resize = self.resize.borrow_mut();
        if let Some(pos) = resize.iter().position(|(l, _)| *l == id) {
            let (_, closure) = resize.remove(pos);
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            {
                warn!(?err, "removeEventListener(resize) failed");
            }
        }
    }

    fn add_pointer_listener(&self, listener: PointerListener) -> Result<ListenerId, BackdropError> {
        let canvas = self.canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            listener(PointerPosition::new(
                f64::from(event.client_x()) - rect.left(),
                f64::from(event.client_y()) - rect.top(),
            ));
        }) as Box<dyn FnMut(MouseEvent)>);
        self.window
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener(mousemove)", &e))?;
        let id = self.next_id();
        self.pointer.borrow_mut().push((id, closure));
        Ok(id)
    }

    fn remove_pointer_listener(&self, id: ListenerId) {
        let mut pointer = self.pointer.borrow_mut();
        if let Some(pos) = pointer.iter().position(|(l, _)| *l == id) {
            let (_, closure) = pointer.remove(pos);
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            {
                warn!(?err, "removeEventListener(mousemove) failed");
            }
        }
    }
}

impl Drop for BrowserEnvironment {
    fn drop(&mut self) {
        // The closures are freed below; JS must not be left holding them.
        let resize: Vec<_> = self.resize.borrow().iter().map(|(id, _)| *id).collect();
        for id in resize {
            self.remove_resize_listener(id);
        }
        let pointer: Vec<_> = self.pointer.borrow().iter().map(|(id, _)| *id).collect();
        for id in pointer {
            self.remove_pointer_listener(id);
        }
        self.pending.borrow_mut().take();
    }
}
