//! DOM wiring for the landing page widgets. Every effect quietly does nothing
//! when its markup is missing; listeners live as long as the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use crate::page::{
    back_to_top_visible, counter_value, group_thousands, hero_blur, is_scrolled, is_valid_email,
    menu_filter_matches, newsletter_message, parallax_offset, scroll_progress, Carousel,
    OpeningHours, Theme, COUNTER_DURATION_MS, THEME_STORAGE_KEY,
};

type Effect = fn(&Window, &Document) -> Result<(), JsValue>;

/// Wire every widget found in `document`.
pub fn install(window: &Window, document: &Document) {
    let effects: [(&str, Effect); 10] = [
        ("scroll", scroll_effects),
        ("reveal", reveal),
        ("counters", counters),
        ("menu filter", menu_filter),
        ("carousel", carousel),
        ("opening hours", opening_hours),
        ("theme", theme_toggle),
        ("navigation", mobile_nav),
        ("newsletter", newsletter),
        ("footer", footer),
    ];
    for (name, effect) in effects {
        if let Err(err) = effect(window, document) {
            log::warn!("{name} effect not installed: {err:?}");
        }
    }
}

fn listen<F>(target: &EventTarget, kind: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn element(document: &Document, selector: &str) -> Result<Option<HtmlElement>, JsValue> {
    Ok(document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

fn elements(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

fn scroll_effects(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let bar = element(document, ".scroll-progress")?;
    let background = element(document, "[data-parallax]")?;
    let hero = element(document, ".hero")?;
    let back_to_top = element(document, ".back-to-top")?;

    let update = {
        let window = window.clone();
        move || -> Result<(), JsValue> {
            let y = scroll_y(&window);
            let viewport = window.inner_height()?.as_f64().unwrap_or(0.0);
            if let Some(bar) = &bar {
                let scrollable = f64::from(body.scroll_height()) - viewport;
                let progress = scroll_progress(y, scrollable);
                bar.style().set_property("width", &format!("{}%", progress * 100.0))?;
            }
            body.dataset()
                .set("scrolled", if is_scrolled(y) { "true" } else { "false" })?;
            if let Some(bg) = &background {
                let transform = format!("translate3d(0, {}px, 0) scale(1.1)", parallax_offset(y));
                bg.style().set_property("transform", &transform)?;
            }
            if let Some(hero) = &hero {
                hero.style()
                    .set_property("filter", &format!("blur({}px)", hero_blur(y)))?;
            }
            if let Some(button) = &back_to_top {
                button
                    .class_list()
                    .toggle_with_force("visible", back_to_top_visible(y))?;
            }
            Ok(())
        }
    };
    update()?;

    // Bursts of scroll events collapse into one update per frame.
    let pending = Rc::new(Cell::new(false));
    let frame = {
        let pending = pending.clone();
        Closure::wrap(Box::new(move || {
            pending.set(false);
            if let Err(err) = update() {
                log::warn!("scroll update failed: {err:?}");
            }
        }) as Box<dyn FnMut()>)
    };
    let win = window.clone();
    listen(window, "scroll", move |_| {
        if pending.replace(true) {
            return;
        }
        if win
            .request_animation_frame(frame.as_ref().unchecked_ref())
            .is_err()
        {
            pending.set(false);
        }
    })?;

    if let Some(button) = element(document, ".back-to-top")? {
        let window = window.clone();
        listen(&button, "click", move |_| window.scroll_to_with_x_and_y(0.0, 0.0))?;
    }
    Ok(())
}

/// Calls `on_enter` once per target, the first time it crosses `threshold`.
fn observe_once<F>(
    targets: &[HtmlElement],
    threshold: f64,
    root_margin: Option<&str>,
    mut on_enter: F,
) -> Result<(), JsValue>
where
    F: FnMut(HtmlElement) + 'static,
{
    if targets.is_empty() {
        return Ok(());
    }
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                if let Ok(el) = target.dyn_into::<HtmlElement>() {
                    on_enter(el);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    js_sys::Reflect::set(&options, &"threshold".into(), &threshold.into())?;
    if let Some(margin) = root_margin {
        js_sys::Reflect::set(&options, &"rootMargin".into(), &margin.into())?;
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for target in targets {
        observer.observe(target);
    }
    Ok(())
}

fn reveal(_window: &Window, document: &Document) -> Result<(), JsValue> {
    let targets = elements(document, ".animate-in, .service-card, .review-card")?;
    observe_once(&targets, 0.1, Some("0px 0px -50px 0px"), |el| {
        el.class_list().add_1("visible").ok();
    })
}

fn counters(window: &Window, document: &Document) -> Result<(), JsValue> {
    let stats = elements(document, ".stat-number")?;
    let window = window.clone();
    observe_once(&stats, 0.6, None, move |el| {
        let target = el
            .dataset()
            .get("target")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        if let Err(err) = count_up(&window, el, target) {
            log::warn!("counter not started: {err:?}");
        }
    })
}

/// Counts `el` up to `target`, one text update per animation frame.
fn count_up(window: &Window, el: HtmlElement, target: u64) -> Result<(), JsValue> {
    let started = Cell::new(None);
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let win = window.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let start = started.get().unwrap_or(now);
        started.set(Some(start));
        let elapsed = now - start;
        el.set_text_content(Some(&group_thousands(counter_value(elapsed, target))));
        if elapsed < COUNTER_DURATION_MS {
            if let Some(callback) = next.borrow().as_ref() {
                win.request_animation_frame(callback.as_ref().unchecked_ref())
                    .ok();
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = frame.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}

fn menu_filter(_window: &Window, document: &Document) -> Result<(), JsValue> {
    let buttons = elements(document, ".filter-btn")?;
    let cards = elements(document, ".menu-card")?;
    for button in &buttons {
        let buttons = buttons.clone();
        let cards = cards.clone();
        let clicked = button.clone();
        listen(button, "click", move |_| {
            for b in &buttons {
                b.class_list().remove_1("active").ok();
            }
            clicked.class_list().add_1("active").ok();
            let filter = clicked.dataset().get("filter").unwrap_or_default();
            for card in &cards {
                let category = card.dataset().get("cat");
                let shown = menu_filter_matches(&filter, category.as_deref());
                card.style()
                    .set_property("display", if shown { "" } else { "none" })
                    .ok();
            }
        })?;
    }
    Ok(())
}

fn carousel(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(track) = element(document, ".carousel-track")? else {
        return Ok(());
    };
    let state = Rc::new(RefCell::new(Carousel::default()));
    let offset = Rc::new(Cell::new(f64::from(track.scroll_left())));
    let paused = Rc::new(Cell::new(false));

    // Same self-rescheduling shape as the particle loop.
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let win = window.clone();
    let el = track.clone();
    let hovered = paused.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !hovered.get() {
            let actual = f64::from(el.scroll_left());
            // The visitor dragged the strip; continue from there.
            if (actual - offset.get()).abs() > 1.0 {
                offset.set(actual);
            }
            let target = state.borrow_mut().advance(
                offset.get(),
                f64::from(el.scroll_width()),
                f64::from(el.client_width()),
            );
            offset.set(target);
            el.set_scroll_left(target.round() as i32);
        }
        if let Some(callback) = next.borrow().as_ref() {
            win.request_animation_frame(callback.as_ref().unchecked_ref()).ok();
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = frame.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }

    let hovered = paused.clone();
    listen(&track, "mouseenter", move |_| hovered.set(true))?;
    listen(&track, "mouseleave", move |_| paused.set(false))?;
    Ok(())
}

fn opening_hours(_window: &Window, document: &Document) -> Result<(), JsValue> {
    if let Some(label) = element(document, ".open-state")? {
        let now = js_sys::Date::new_0();
        let status = OpeningHours::default().status_label(now.get_hours(), now.get_minutes());
        label.set_text_content(Some(status));
    }
    Ok(())
}

fn apply_theme(window: &Window, document: &Document, theme: Theme) -> Result<(), JsValue> {
    if let Some(body) = document.body() {
        body.set_attribute("data-theme", theme.as_str())?;
    }
    if let Some(storage) = window.local_storage()? {
        storage.set_item(THEME_STORAGE_KEY, theme.as_str())?;
    }
    if let Some(icon) = document.query_selector(".theme-toggle i")? {
        icon.set_class_name(theme.icon_class());
    }
    Ok(())
}

fn theme_toggle(window: &Window, document: &Document) -> Result<(), JsValue> {
    let saved = match window.local_storage()? {
        Some(storage) => storage.get_item(THEME_STORAGE_KEY)?,
        None => None,
    };
    let hour = js_sys::Date::new_0().get_hours();
    apply_theme(window, document, Theme::initial(saved.as_deref(), hour))?;

    let Some(button) = element(document, ".theme-toggle")? else {
        return Ok(());
    };
    let window = window.clone();
    let document = document.clone();
    let pressed = button.clone();
    listen(&button, "click", move |_| {
        let current = document
            .body()
            .and_then(|body| body.get_attribute("data-theme"))
            .and_then(|value| Theme::parse(&value))
            .unwrap_or(Theme::Auto);
        if let Err(err) = apply_theme(&window, &document, current.toggled()) {
            log::warn!("theme switch failed: {err:?}");
        }
        press(&window, &pressed);
    })?;
    Ok(())
}

/// Brief scale-down feedback on a pressed button.
fn press(window: &Window, button: &HtmlElement) {
    button.style().set_property("transform", "scale(0.95)").ok();
    let button = button.clone();
    let release = Closure::once_into_js(move || {
        button.style().set_property("transform", "").ok();
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(release.unchecked_ref(), 150)
        .ok();
}

fn mobile_nav(_window: &Window, document: &Document) -> Result<(), JsValue> {
    let (Some(burger), Some(nav)) = (
        element(document, ".hamburger")?,
        document.get_element_by_id("primary-navigation"),
    ) else {
        return Ok(());
    };
    let toggle = {
        let burger = burger.clone();
        let nav = nav.clone();
        move || {
            let open = burger.get_attribute("aria-expanded").as_deref() == Some("true");
            burger
                .set_attribute("aria-expanded", if open { "false" } else { "true" })
                .ok();
            nav.class_list().toggle("open").ok();
        }
    };
    let on_link = toggle.clone();
    listen(&burger, "click", move |_| toggle())?;
    listen(&nav, "click", move |event| {
        let on_anchor = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a").ok().flatten())
            .is_some();
        if on_anchor {
            on_link();
        }
    })?;
    Ok(())
}

fn newsletter(_window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(form) = document
        .query_selector(".newsletter")?
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return Ok(());
    };
    let target = form.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        let email = target
            .query_selector("[name=email]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        let ok = is_valid_email(&email);
        let (text, color) = newsletter_message(ok);
        if let Some(msg) = target
            .query_selector(".form-msg")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            msg.set_text_content(Some(text));
            msg.style().set_property("color", color).ok();
        }
        if ok {
            target.reset();
        }
    })?;
    Ok(())
}

fn footer(window: &Window, document: &Document) -> Result<(), JsValue> {
    if let Some(year) = document.get_element_by_id("year") {
        let now = js_sys::Date::new_0();
        year.set_text_content(Some(&now.get_full_year().to_string()));
    }
    if let Some(body) = document.body() {
        let loaded = Closure::once_into_js(move || {
            body.class_list().add_1("loaded").ok();
        });
        window.set_timeout_with_callback_and_timeout_and_arguments_0(loaded.unchecked_ref(), 100)?;
    }
    Ok(())
}
