//! Petal Nav entry point
//!
//! Binds the widget engine to the page and drives its frame and timer loops.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TransitionEvent, Window};

    use petal_nav::platform::apply_effects;
    use petal_nav::platform::web::{DomPanel, DomWidget};
    use petal_nav::sim::Viewport;
    use petal_nav::{Effect, Flower, Input, Tuning, WidgetError};

    /// Widget instance holding the engine and its page bindings
    struct App {
        flower: Flower,
        widget: DomWidget,
        panel: DomPanel,
        frame_requested: bool,
        /// Armed timeout handle and the deadline it was armed for
        timer: Option<(i32, f64)>,
    }

    impl App {
        fn apply(&mut self, effects: &[Effect]) {
            apply_effects(effects, &mut self.widget, &mut self.panel);
        }
    }

    type Shared = Rc<RefCell<App>>;

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn viewport(window: &Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    pub fn run() -> Result<(), WidgetError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Petal Nav starting...");

        let window = web_sys::window().ok_or(WidgetError::NoWindow)?;
        let document = window.document().ok_or(WidgetError::NoDocument)?;

        let tuning = match document
            .get_element_by_id("cluster")
            .and_then(|cluster| cluster.get_attribute("data-tuning"))
        {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };

        let widget = DomWidget::bind(&document, tuning.petal_count())?;
        let panel = DomPanel::bind(&document)?;
        let flower = Flower::new(tuning, viewport(&window))?;

        let app = Rc::new(RefCell::new(App {
            flower,
            widget,
            panel,
            frame_requested: false,
            timer: None,
        }));

        {
            let mut a = app.borrow_mut();
            let effects = a.flower.initial_effects();
            a.apply(&effects);
        }

        setup_petal_handlers(&app);
        setup_center_handlers(&app);
        setup_window_handlers(&window, &app);

        // Deep link
        if let Ok(hash) = window.location().hash() {
            if !hash.is_empty() {
                dispatch(&app, Input::Navigate(hash));
            }
        }

        schedule(&app);

        log::info!("Petal Nav running with {} petals", app.borrow().flower.petals().len());
        Ok(())
    }

    fn dispatch(app: &Shared, input: Input) {
        {
            let mut a = app.borrow_mut();
            let effects = a.flower.handle(input, now());
            a.apply(&effects);
        }
        schedule(app);
    }

    /// Request a frame while the engine is animating, and arm a timeout for
    /// the next timed phase
    fn schedule(app: &Shared) {
        let (request_frame, deadline) = {
            let a = app.borrow();
            (
                a.flower.wants_frames() && !a.frame_requested,
                a.flower.next_deadline(),
            )
        };
        if request_frame {
            app.borrow_mut().frame_requested = true;
            request_animation_frame(app.clone());
        }
        if let Some(deadline) = deadline {
            arm_timer(app, deadline);
        }
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Shared, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_requested = false;
            let effects = a.flower.frame(time);
            a.apply(&effects);
        }
        schedule(&app);
    }

    fn arm_timer(app: &Shared, deadline: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut a = app.borrow_mut();
        if let Some((_, armed)) = a.timer {
            if armed <= deadline {
                return;
            }
        }
        if let Some((handle, _)) = a.timer.take() {
            window.clear_timeout_with_handle(handle);
        }

        let delay = (deadline - now()).max(0.0).ceil() as i32;
        let app_clone = app.clone();
        let closure = Closure::once(move || {
            timer_fired(app_clone);
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => a.timer = Some((handle, deadline)),
            Err(_) => log::warn!("Failed to arm timer for {:.0}ms", deadline),
        }
        closure.forget();
    }

    fn timer_fired(app: Shared) {
        {
            let mut a = app.borrow_mut();
            a.timer = None;
            let effects = a.flower.advance(now());
            a.apply(&effects);
        }
        schedule(&app);
    }

    fn setup_petal_handlers(app: &Shared) {
        let (petals, buttons) = {
            let a = app.borrow();
            (a.widget.petals.clone(), a.widget.buttons.clone())
        };

        for (index, petal) in petals.iter().enumerate() {
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    dispatch(&app, Input::PetalActivated(index));
                });
                let _ = petal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TransitionEvent| {
                    if event.property_name() == "transform" {
                        dispatch(&app, Input::TransitionEnd(index));
                    }
                });
                let _ = petal
                    .add_event_listener_with_callback("transitionend", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // The pulse button sits inside the petal; swallow the click so it
        // only counts once
        for (index, button) in buttons.iter().enumerate() {
            let Some(button) = button else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                dispatch(&app, Input::PetalActivated(index));
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_center_handlers(app: &Shared) {
        let (center, close_button) = {
            let a = app.borrow();
            (a.widget.center.clone(), a.panel.close_button.clone())
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&app, Input::CenterActivated);
            });
            let _ = center.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key == "Enter" || key == " " {
                    event.prevent_default();
                    dispatch(&app, Input::CenterActivated);
                }
            });
            let _ = center.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(close_button) = close_button {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&app, Input::Close);
            });
            let _ = close_button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(window: &Window, app: &Shared) {
        // Escape closes the overlay
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Escape" {
                    dispatch(&app, Input::Close);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        if let Some(document) = window.document() {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                log::debug!("Visibility changed: {}", visible);
                dispatch(&app, Input::VisibilityChanged(visible));
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let app = app.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                dispatch(&app, Input::Resize(viewport(&window_clone)));
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Ok(hash) = window_clone.location().hash() {
                    dispatch(&app, Input::Navigate(hash));
                }
            });
            let _ = window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Petal Nav failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), petal_nav::WidgetError> {
    env_logger::init();
    log::info!("Petal Nav (native) starting headless session...");
    log::info!("The interactive widget runs in the browser - build for wasm32 and serve index.html");

    headless_session()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one unlock, open and close cycle on a virtual 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() -> Result<(), petal_nav::WidgetError> {
    use petal_nav::sim::Viewport;
    use petal_nav::{Flower, Input, Tuning, WidgetState};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut flower = Flower::new(Tuning::default(), Viewport::new(1280.0, 800.0))?;
    let mut now = 0.0;
    let count = flower.petals().len();

    for i in 0..count {
        flower.handle(Input::PetalActivated(i), now);
        now += 250.0;
    }
    now += flower.tuning().snap_ms;
    flower.handle(Input::TransitionEnd(count - 1), now);
    log::info!("Unlocked: {}", flower.is_unlocked());

    // Let the ring spin for a few seconds
    for _ in 0..180 {
        now += FRAME_MS;
        flower.frame(now);
        flower.advance(now);
    }
    for petal in flower.petals() {
        log::info!(
            "petal {} angle {:.3} at ({:.1}, {:.1})",
            petal.index,
            petal.angle,
            petal.pos.x,
            petal.pos.y
        );
    }
    log::info!("Label: {:?}", flower.label_text());

    flower.handle(Input::Navigate("#about".into()), now);
    for _ in 0..600 {
        if flower.state() == WidgetState::Section {
            break;
        }
        now += FRAME_MS;
        flower.frame(now);
        flower.advance(now);
    }
    for _ in 0..120 {
        now += FRAME_MS;
        flower.frame(now);
    }
    log::info!("State: {} ({:?})", flower.state().as_str(), flower.open_section());
    for petal in flower.petals() {
        log::info!(
            "petal {} perimeter {:.1} at ({:.1}, {:.1})",
            petal.index,
            petal.perimeter_distance,
            petal.pos.x,
            petal.pos.y
        );
    }

    flower.handle(Input::Close, now);
    for _ in 0..120 {
        now += FRAME_MS;
        flower.frame(now);
        flower.advance(now);
    }
    log::info!(
        "State: {}, orbit {:?}",
        flower.state().as_str(),
        flower.orbit_mode()
    );

    Ok(())
}
