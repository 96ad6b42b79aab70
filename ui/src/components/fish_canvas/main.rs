use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::{Effect, RwSignal, Set};
use leptos::reactive::spawn_local;
use leptos::{IntoView, component, view};
use shoal::{Scene, SceneConfig};
use wasm_bindgen::{JsCast, prelude::Closure};
use web_sys::HtmlCanvasElement;

use crate::components::utils::{add_listener, canvas_size, find_canvas, log_error};
use crate::render::renderer::gpu::GpuState;
use crate::render::web_gpu::init_wgpu;

pub(crate) const CANVAS_ID: &str = "fish-canvas";

/// A school of fish swimming on a canvas sized to a fraction of the window.
#[component]
pub fn FishCanvas(#[prop(optional)] config: Option<SceneConfig>) -> impl IntoView {
    let gpu_support = RwSignal::new(true);

    start_rendering(config.unwrap_or_default(), gpu_support, CANVAS_ID);

    view! {
        { super::view::canvas(gpu_support) }
    }
}

type Shared<T> = Rc<RefCell<T>>;

pub fn start_rendering(config: SceneConfig, gpu_support: RwSignal<bool>, canvas_id: &'static str) {
    Effect::new(move |_| {
        let config = config.clone();

        spawn_local(async move {
            // 1) wait until the <canvas> actually exists
            TimeoutFuture::new(0).await;

            // 2) size the canvas and build the scene for it
            let setup = || -> Result<(HtmlCanvasElement, Scene)> {
                let canvas = find_canvas(canvas_id)?;
                let (w, h) = canvas_size(config.canvas_scale)?;
                canvas.set_width(w);
                canvas.set_height(h);
                let scene = Scene::with_config(config.clone(), w as f32, h as f32)?;
                Ok((canvas, scene))
            };
            let (canvas, scene) = match setup() {
                Ok(v) => v,
                Err(err) => {
                    log_error("fish scene setup failed", &err);
                    return;
                }
            };

            // 3) init WGPU with that canvas
            let state = match init_wgpu(&canvas).await {
                Ok(s) => s,
                Err(err) => {
                    gpu_support.set(false);
                    log_error("WGPU init failed", &err);
                    return;
                }
            };

            let scene = Rc::new(RefCell::new(scene));
            let state = Rc::new(RefCell::new(state));

            if let Err(err) = follow_window_size(&canvas, config.canvas_scale, &scene, &state) {
                log_error("resize listener failed", &err);
            }
            if let Err(err) = run_frames(canvas, scene, state) {
                log_error("animation loop failed", &err);
            }
        });
    });
}

fn follow_window_size(
    canvas: &HtmlCanvasElement,
    scale: f32,
    scene: &Shared<Scene>,
    state: &Shared<GpuState>,
) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let canvas = canvas.clone();
    let scene = scene.clone();
    let state = state.clone();

    add_listener(&window, "resize", move |_: web_sys::Event| {
        let (w, h) = match canvas_size(scale) {
            Ok(size) => size,
            Err(err) => return log_error("resize", &err),
        };
        canvas.set_width(w);
        canvas.set_height(h);
        state.borrow_mut().resize(w, h);
        scene.borrow_mut().on_resize(w as f32, h as f32);
    })
}

fn run_frames(canvas: HtmlCanvasElement, scene: Shared<Scene>, state: Shared<GpuState>) -> Result<()> {
    // we’ll store the RAF callback so we can re‐schedule it each frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_: f64| {
        // 1) advance the school and draw it
        {
            let mut scene = scene.borrow_mut();
            scene.tick(canvas.width() as f32, canvas.height() as f32);

            if let Err(err) = state.borrow_mut().render(&scene) {
                // stop scheduling; the last frame stays on screen
                log_error("frame failed", &err);
                return;
            }
        }

        // 2) schedule next frame
        if let Err(err) = request_frame(&f) {
            log_error("requestAnimationFrame", &err);
        }
    }) as Box<dyn FnMut(f64)>));

    // initial kick
    request_frame(&g)
}

fn request_frame(slot: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let slot = slot.borrow();
    let cb = slot.as_ref().context("frame callback missing")?;
    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("{e:?}"))?;
    Ok(())
}
