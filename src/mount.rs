//! Wiring a [`Renderer`] to its host.
//!
//! A [`Mount`] owns exactly one frame loop and one pair of resize/pointer
//! listeners. [`Mount::unmount`] (or dropping the mount) removes all three.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{info, warn};

use crate::env::{Environment, ListenerId, PointerListener, ResizeListener};
use crate::error::BackdropError;
use crate::painter::SurfacePainter;
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::scheduler::FrameScheduler;

pub struct Mount<E, P, S>
where
    E: Environment + 'static,
    P: SurfacePainter + 'static,
    S: Scene + 'static,
{
    env: Rc<E>,
    renderer: Rc<RefCell<Renderer<P, S>>>,
    scheduler: FrameScheduler<Rc<E>>,
    resize_listener: Option<ListenerId>,
    pointer_listener: Option<ListenerId>,
    /// Cleared on unmount; listeners check it before touching the renderer.
    live: Rc<Cell<bool>>,
}

impl<E, P, S> Mount<E, P, S>
where
    E: Environment + 'static,
    P: SurfacePainter + 'static,
    S: Scene + 'static,
{
    /// Measure the viewport, build the layout, paint the first frame and
    /// start listening and animating.
    ///
    /// Fails before anything is registered if the viewport cannot be
    /// measured. A failure part way through undoes what was registered.
    pub fn mount(env: Rc<E>, painter: P, scene: S) -> Result<Self, BackdropError> {
        let size = env.viewport_size()?;
        let mut renderer = Renderer::new(painter, scene, size)?;
        renderer.draw_frame(0.0)?;
        let scene_name = renderer.scene().name();

        let mut mount = Self {
            scheduler: FrameScheduler::new(Rc::clone(&env)),
            env,
            renderer: Rc::new(RefCell::new(renderer)),
            resize_listener: None,
            pointer_listener: None,
            live: Rc::new(Cell::new(true)),
        };

        let on_resize = mount.resize_listener_fn();
        mount.resize_listener = Some(mount.env.add_resize_listener(on_resize)?);
        let on_pointer = mount.pointer_listener_fn();
        mount.pointer_listener = Some(mount.env.add_pointer_listener(on_pointer)?);

        let renderer = Rc::downgrade(&mount.renderer);
        mount.scheduler.start(move |timestamp_ms| {
            let renderer = renderer
                .upgrade()
                .ok_or_else(|| BackdropError::fault("renderer dropped"))?;
            let mut renderer = renderer
                .try_borrow_mut()
                .map_err(|_| BackdropError::fault("renderer busy"))?;
            renderer.draw_frame(timestamp_ms)
        })?;

        info!(
            scene = scene_name,
            width = size.width(),
            height = size.height(),
            "backdrop mounted"
        );
        Ok(mount)
    }

    /// Stop the loop and remove both listeners. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if !self.live.replace(false) {
            return;
        }
        self.scheduler.stop();
        if let Some(id) = self.resize_listener.take() {
            self.env.remove_resize_listener(id);
        }
        if let Some(id) = self.pointer_listener.take() {
            self.env.remove_pointer_listener(id);
        }
        info!(frames = self.scheduler.frames_drawn(), "backdrop unmounted");
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.live.get()
    }

    /// Read access to the renderer, e.g. to inspect the current layout.
    ///
    /// # Panics
    ///
    /// If called from inside a draw step or listener of this mount.
    #[must_use]
    pub fn renderer(&self) -> Ref<'_, Renderer<P, S>> {
        self.renderer.borrow()
    }

    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler<Rc<E>> {
        &self.scheduler
    }

    fn resize_listener_fn(&self) -> ResizeListener {
        let env: Weak<E> = Rc::downgrade(&self.env);
        let renderer = Rc::downgrade(&self.renderer);
        let live = Rc::clone(&self.live);
        Rc::new(move || {
            if !live.get() {
                return;
            }
            let (Some(env), Some(renderer)) = (env.upgrade(), renderer.upgrade()) else {
                return;
            };
            let size = match env.viewport_size() {
                Ok(size) => size,
                Err(err) => {
                    warn!(%err, "ignoring resize; keeping previous layout");
                    return;
                }
            };
            let Ok(mut renderer) = renderer.try_borrow_mut() else {
                warn!("renderer busy; dropping resize");
                return;
            };
            if let Err(err) = renderer.rebuild(size) {
                warn!(%err, "resize rebuild failed; keeping previous layout");
            }
        })
    }

    fn pointer_listener_fn(&self) -> PointerListener {
        let renderer = Rc::downgrade(&self.renderer);
        let live = Rc::clone(&self.live);
        Rc::new(move |position| {
            if !live.get() {
                return;
            }
            if let Some(renderer) = renderer.upgrade() {
                if let Ok(mut renderer) = renderer.try_borrow_mut() {
                    renderer.on_pointer_move(position);
                }
            }
        })
    }
}

impl<E, P, S> Drop for Mount<E, P, S>
where
    E: Environment + 'static,
    P: SurfacePainter + 'static,
    S: Scene + 'static,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<E, P, S> fmt::Debug for Mount<E, P, S>
where
    E: Environment + 'static,
    P: SurfacePainter + 'static,
    S: Scene + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("live", &self.live.get())
            .field("scheduler", &self.scheduler)
            .field("resize_listener", &self.resize_listener)
            .field("pointer_listener", &self.pointer_listener)
            .finish_non_exhaustive()
    }
}
