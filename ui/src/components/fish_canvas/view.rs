use leptos::{
    IntoView,
    prelude::{ClassAttribute, ElementChild, Get, GlobalAttributes, RwSignal, Show},
    view,
};

use crate::components::utils::WebGPUNotSupportedMsg;
use super::main::CANVAS_ID;

pub(crate) fn canvas(gpu_support: RwSignal<bool>) -> impl IntoView {
    view! {
        <div class="relative w-full">
          <Show
            when=move || matches!(gpu_support.get(), true)
            fallback=move || view! { <WebGPUNotSupportedMsg/> }
          >

          <canvas
            id=CANVAS_ID
            class="w-full h-[150vh] touch-none select-none"
          ></canvas>

          </Show>
        </div>
    }
}
