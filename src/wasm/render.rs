use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window,
};

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::particle::Bounds;
use crate::surface::{Surface, SurfaceSize};

struct CanvasSurface<'a>(&'a CanvasRenderingContext2d);

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self, bounds: Bounds) {
        self.0.clear_rect(0.0, 0.0, bounds.width, bounds.height);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &str) {
        self.0.begin_path();
        if self.0.arc(center.x, center.y, radius, 0.0, TAU).is_err() {
            return;
        }
        #[allow(deprecated)]
        self.0.set_fill_style(&JsValue::from_str(fill));
        self.0.fill();
    }
}

/// Event listener owned by the animator; removed again on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

struct Inner {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: RefCell<ParticleField>,
    running: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    last_frame: Cell<Option<f64>>,
    // Animation-frame callback, created once and re-requested every frame.
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    listeners: RefCell<Vec<Listener>>,
}

fn measure(window: &Window, canvas: &HtmlCanvasElement) -> SurfaceSize {
    SurfaceSize::new(
        f64::from(canvas.client_width()),
        f64::from(canvas.client_height()),
        window.device_pixel_ratio(),
    )
}

impl Inner {
    /// Match the backing store to the rendered box. The transform is set,
    /// not multiplied, so repeated resizes do not compound the scale.
    fn resize(&self) -> Result<(), JsValue> {
        let size = measure(&self.window, &self.canvas);
        let (width, height) = size.backing_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let dpr = size.pixel_ratio;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.field.borrow_mut().resize(size.bounds());
        log::debug!("particle canvas resized to {width}x{height} (dpr {dpr})");
        Ok(())
    }

    fn track_pointer(&self, event: &MouseEvent) {
        let rect = self.canvas.get_bounding_client_rect();
        let pointer = DVec2::new(
            f64::from(event.client_x()) - rect.left(),
            f64::from(event.client_y()) - rect.top(),
        );
        self.field.borrow_mut().set_pointer(Some(pointer));
    }

    fn render_frame(&self, timestamp: f64) {
        let elapsed = self
            .last_frame
            .replace(Some(timestamp))
            .map_or(0.0, |prev| timestamp - prev);
        let mut field = self.field.borrow_mut();
        field.tick(elapsed);
        field.draw(&mut CanvasSurface(&self.ctx));
    }

    fn schedule(&self) -> Result<(), JsValue> {
        let frame = self.frame.borrow();
        let Some(callback) = frame.as_ref() else {
            return Ok(());
        };
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.raf_id.set(Some(id));
        Ok(())
    }

    fn listen<F>(&self, target: EventTarget, kind: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            closure,
        });
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(id) = self.raf_id.take() {
            self.window.cancel_animation_frame(id).ok();
        }
        for listener in self.listeners.get_mut().drain(..) {
            listener
                .target
                .remove_event_listener_with_callback(
                    listener.kind,
                    listener.closure.as_ref().unchecked_ref(),
                )
                .ok();
        }
    }
}

/// Ambient particle background bound to one canvas.
///
/// The render loop, pointer tracking and resize handling all hold weak
/// references, so dropping the last handle tears everything down.
#[wasm_bindgen]
#[derive(Clone)]
pub struct ParticleAnimator {
    inner: Rc<Inner>,
}

impl ParticleAnimator {
    pub fn with_config(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d canvas context not supported")?
            .dyn_into()?;

        let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;
        let size = measure(&window, &canvas);
        let inner = Rc::new(Inner {
            window: window.clone(),
            canvas,
            ctx,
            field: RefCell::new(ParticleField::seeded(config, size.bounds(), seed)),
            running: Cell::new(false),
            raf_id: Cell::new(None),
            last_frame: Cell::new(None),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        inner.resize()?;

        let weak = Rc::downgrade(&inner);
        *inner.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.raf_id.set(None);
            if !inner.running.get() {
                return;
            }
            inner.render_frame(timestamp);
            if let Err(err) = inner.schedule() {
                log::error!("failed to schedule particle frame: {err:?}");
                inner.running.set(false);
            }
        }) as Box<dyn FnMut(f64)>));

        let weak = Rc::downgrade(&inner);
        inner.listen(window.clone().into(), "resize", move |_| {
            if let Some(inner) = weak.upgrade() {
                if let Err(err) = inner.resize() {
                    log::warn!("particle canvas resize failed: {err:?}");
                }
            }
        })?;

        let weak = Rc::downgrade(&inner);
        inner.listen(document.clone().into(), "mousemove", move |event| {
            if let (Some(inner), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) {
                inner.track_pointer(event);
            }
        })?;

        if let Some(root) = document.document_element() {
            let weak = Rc::downgrade(&inner);
            inner.listen(root.into(), "mouseleave", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.field.borrow_mut().set_pointer(None);
                }
            })?;
        }

        Ok(Self { inner })
    }
}

#[wasm_bindgen]
impl ParticleAnimator {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ParticleAnimator, JsValue> {
        Self::with_config(canvas, FieldConfig::default())
    }

    pub fn start(&self) -> Result<(), JsValue> {
        if self.inner.running.replace(true) {
            return Ok(());
        }
        self.inner.last_frame.set(None);
        self.inner.schedule()
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        self.inner.running.set(false);
        if let Some(id) = self.inner.raf_id.take() {
            self.inner.window.cancel_animation_frame(id)?;
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.inner.field.borrow().len()
    }

    /// Advance and paint one frame by hand, outside the animation loop.
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&self, timestamp: f64) {
        self.inner.render_frame(timestamp);
    }
}
