//! Ambient effects for the restaurant landing page: a pointer-reactive
//! particle background plus the page's small scroll/menu/theme widgets.
//!
//! The simulation and widget rules are plain Rust and build on any target;
//! the DOM bindings only exist on wasm32.

pub mod config;
pub mod field;
pub mod page;
pub mod particle;
pub mod surface;

pub use config::{FieldConfig, Interaction};
pub use field::ParticleField;
pub use glam::DVec2;
pub use particle::{Bounce, Bounds, Particle};
pub use surface::{Surface, SurfaceSize};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod page;
    mod render;

    pub use page::install as install_page_effects;
    pub use render::ParticleAnimator;

    thread_local! {
        static ANIMATOR: RefCell<Option<ParticleAnimator>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        page::install(&window, &document);
        mount_particles(&document)?;
        Ok(())
    }

    /// Starts the background animator on the page's `canvas.particles` and
    /// keeps it alive for [`particle_animator`]. `Ok(None)` when the page
    /// has no such canvas.
    pub fn mount_particles(document: &web_sys::Document) -> Result<Option<ParticleAnimator>, JsValue> {
        let Some(canvas) = document.query_selector("canvas.particles")? else {
            log::debug!("no particle canvas on this page");
            return Ok(None);
        };
        let animator = ParticleAnimator::new(canvas.dyn_into::<web_sys::HtmlCanvasElement>()?)?;
        animator.start()?;
        ANIMATOR.with(|slot| *slot.borrow_mut() = Some(animator.clone()));
        Ok(Some(animator))
    }

    /// Handle to the page's background animator, if one was started.
    #[wasm_bindgen(js_name = particleAnimator)]
    pub fn particle_animator() -> Option<ParticleAnimator> {
        ANIMATOR.with(|slot| slot.borrow().clone())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{install_page_effects, mount_particles, particle_animator, ParticleAnimator};
