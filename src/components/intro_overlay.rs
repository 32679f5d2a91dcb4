use yew::prelude::*;

const FLASH_KEYFRAMES: &str = "@keyframes cc-flash { 0%, 100% { opacity: 1; } 50% { opacity: 0.15; } }";

#[derive(Properties, PartialEq, Clone)]
pub struct IntroOverlayProps {
    pub show: bool,
    pub country: AttrValue,
}

/// Flashing start prompt shown while the session waits for input.
#[function_component(IntroOverlay)]
pub fn intro_overlay(props: &IntroOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {
        <div style="position:absolute; top:40%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.75); border:2px solid #30363d; padding:18px 26px; border-radius:14px; text-align:center; pointer-events:none;">
            <style>{ FLASH_KEYFRAMES }</style>
            <h2 style="margin:0 0 8px 0; font-size:20px; color:#58a6ff;">{ format!("Conquer {}", props.country) }</h2>
            <p style="margin:0; animation:cc-flash 1.2s ease-in-out infinite;">{"Press ← or → (A / D) to start climbing"}</p>
            <div style="margin-top:10px; font-size:11px; opacity:0.6;">{"Bounce on platforms, ride springs, dodge monsters, reach the king."}</div>
        </div>
    }
}
