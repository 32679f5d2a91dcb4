use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};
use yew::prelude::*;

use crate::config::Tuning;
use crate::model::{BreakState, InputState, PlatformKind};
use crate::session::collision::CollisionOutcome;
use crate::session::{Outcome, Session, SessionAction, SessionPhase, SessionSnapshot};

use super::{intro_overlay::IntroOverlay, outcome_overlay::OutcomeOverlay, stats_panel::StatsPanel};

/// A session built by the map, handed to the view that will run it.
#[derive(Clone, Debug)]
pub struct PreparedSession(pub Rc<Session>);

impl PartialEq for PreparedSession {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct GameViewProps {
    pub session: PreparedSession,
    /// Emitted once, after the session has been terminated.
    pub on_end: Callback<Outcome>,
}

#[function_component(GameView)]
pub fn game_view(props: &GameViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let session = {
        let prepared = props.session.0.clone();
        use_reducer(move || (*prepared).clone())
    };
    let session_ref = use_mut_ref(|| session.clone());
    let input = use_mut_ref(InputState::default);
    let reported = use_mut_ref(|| false);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Effect: update the handle the frame loop reads
    {
        let session_ref = session_ref.clone();
        let handle = session.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with((session.ticks(), session.phase()), move |_| {
            *session_ref.borrow_mut() = handle;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Effect: hand the outcome back exactly once
    {
        let reported = reported.clone();
        let on_end = props.on_end.clone();
        let phase = session.phase();
        let outcome = session.outcome();
        use_effect_with(phase, move |_| {
            if phase == SessionPhase::Terminated && !*reported.borrow() {
                *reported.borrow_mut() = true;
                on_end.emit(outcome);
            }
            || ()
        });
    }
    // Main mount effect (events, loop)
    {
        let canvas_ref = canvas_ref.clone();
        let session_ref = session_ref.clone();
        let input = input.clone();
        let draw_ref_setup = draw_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let king_img = HtmlImageElement::new().ok();
            // Draw closure
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let session_ref = session_ref.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let Some(ctx) = canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    else {
                        return;
                    };
                    let handle = session_ref.borrow();
                    draw_frame(&ctx, &handle.snapshot(), handle.tuning(), king_img.as_ref());
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();
            // RAF loop: one tick per frame, then draw
            let raf_id = Rc::new(RefCell::new(None));
            let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                Rc::new(RefCell::new(None));
            {
                let raf_id_clone = raf_id.clone();
                let closure_cell_clone = closure_cell.clone();
                let window_loop = window.clone();
                let session_ref = session_ref.clone();
                let input = input.clone();
                let draw_ref_loop = draw_ref_setup.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    let handle = session_ref.borrow().clone();
                    handle.dispatch(SessionAction::Tick(*input.borrow()));
                    if let Some(f) = &*draw_ref_loop.borrow() {
                        f();
                    }
                    if let Some(cb) = closure_cell_clone.borrow().as_ref() {
                        if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            *raf_id_clone.borrow_mut() = Some(id);
                        }
                    }
                }) as Box<dyn FnMut()>));
                if let Some(cb) = closure_cell.borrow().as_ref() {
                    if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        *raf_id.borrow_mut() = Some(id);
                    }
                }
            }
            // Arrow keys and A/D drive the two directional signals
            let key_cb = |pressed: bool| {
                let input = input.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    let mut state = input.borrow_mut();
                    match e.code().as_str() {
                        "ArrowLeft" | "KeyA" => state.left = pressed,
                        "ArrowRight" | "KeyD" => state.right = pressed,
                        _ => return,
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            let keydown_cb = key_cb(true);
            let keyup_cb = key_cb(false);
            window
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                .ok();
            window
                .add_event_listener_with_callback("keyup", keyup_cb.as_ref().unchecked_ref())
                .ok();
            // Released keys are not reported after focus loss
            let blur_cb = {
                let input = input.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    *input.borrow_mut() = InputState::default();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref())
                .ok();
            // Cleanup
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
                let _ = window
                    .remove_event_listener_with_callback("keyup", keyup_cb.as_ref().unchecked_ref());
                let _ = window
                    .remove_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
                if let Some(id) = *raf_id.borrow() {
                    let _ = window.cancel_animation_frame(id);
                }
                closure_cell.borrow_mut().take();
                draw_ref_setup.borrow_mut().take();
            }
        });
    }

    let return_to_map = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::Terminate))
    };

    let snap = session.snapshot();
    let tuning = session.tuning();
    html! {
        <div style="display:flex; justify-content:center; padding-top:16px;">
            <div style="position:relative;">
                <canvas
                    ref={canvas_ref}
                    width={tuning.screen_width.to_string()}
                    height={tuning.screen_height.to_string()}
                    style="display:block; border:1px solid #30363d; border-radius:8px;"
                />
                <StatsPanel
                    country={snap.country.to_string()}
                    score={snap.score}
                    progress={snap.progress()}
                    spring_boost={snap.spring_boost}
                />
                <IntroOverlay show={snap.phase == SessionPhase::Idle} country={snap.country.to_string()} />
                if matches!(snap.phase, SessionPhase::Won | SessionPhase::Lost) {
                    <OutcomeOverlay
                        outcome={session.outcome()}
                        country={snap.country.to_string()}
                        score={session.score()}
                        return_to_map={return_to_map}
                    />
                }
            </div>
        </div>
    }
}

fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    snap: &SessionSnapshot<'_>,
    tuning: &Tuning,
    king_img: Option<&HtmlImageElement>,
) {
    let w = tuning.screen_width;
    let h = tuning.screen_height;
    ctx.set_fill_style_str("#0e1116");
    ctx.fill_rect(0.0, 0.0, w, h);

    // Backdrop bands, scrolled at the parallax rate
    let band = h / 6.0;
    let period = 2.0 * band;
    let mut y = snap.backdrop_offset % period - period;
    ctx.set_fill_style_str("#141b24");
    while y < h {
        ctx.fill_rect(0.0, y, w, band);
        y += period;
    }

    for p in snap.platforms {
        let fill = match p.kind {
            PlatformKind::Normal => "#2ea043",
            PlatformKind::Breakable(BreakState::Intact) => "#a0522d",
            PlatformKind::Breakable(_) => "rgba(160,82,45,0.45)",
        };
        ctx.set_fill_style_str(fill);
        ctx.fill_rect(p.x, p.y, p.width, p.height);
    }

    for s in snap.springs {
        ctx.set_fill_style_str("#8b949e");
        ctx.fill_rect(s.x, s.y, s.width, s.height);
        ctx.set_fill_style_str("#c9d1d9");
        ctx.fill_rect(s.x, s.y, s.width, s.height / 4.0);
    }

    for m in snap.monsters {
        let b = m.bounds();
        ctx.set_fill_style_str("#f85149");
        ctx.fill_rect(b.left, b.top, b.right - b.left, b.bottom - b.top);
        ctx.set_fill_style_str("#fff");
        let eye_x = m.x + m.direction.sign() * m.half_width * 0.4;
        ctx.fill_rect(eye_x - 3.0, b.top + 8.0, 6.0, 6.0);
    }

    if let Some(king) = snap.king {
        let b = king.bounds();
        // Fetched on first appearance
        if let Some(img) = king_img.filter(|img| img.src().is_empty()) {
            img.set_src(&format!("assets/kings/{}", king.image));
        }
        match king_img.filter(|img| img.complete() && img.natural_width() > 0) {
            Some(img) => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    b.left,
                    b.top,
                    b.right - b.left,
                    b.bottom - b.top,
                )
                .ok();
            }
            None => {
                ctx.set_fill_style_str("#d4af37");
                ctx.fill_rect(b.left, b.top, b.right - b.left, b.bottom - b.top);
            }
        }
    }

    let body = snap.body;
    let b = body.bounds();
    let flash = match snap.landing {
        CollisionOutcome::None => None,
        CollisionOutcome::Spring(_) => Some("rgba(240,136,62,0.6)"),
        CollisionOutcome::Platform(_) | CollisionOutcome::Breakable(_) => Some("rgba(201,209,217,0.4)"),
    };
    if let Some(color) = flash {
        ctx.set_fill_style_str(color);
        ctx.fill_rect(b.left - 4.0, b.bottom - 2.0, body.width() + 8.0, 4.0);
    }
    ctx.set_fill_style_str(if snap.spring_boost { "#f0883e" } else { "#58a6ff" });
    ctx.fill_rect(b.left, b.top, body.width(), body.height());
    ctx.set_fill_style_str("#0e1116");
    let eye_x = body.x + body.facing.sign() * body.half_width * 0.5;
    ctx.fill_rect(eye_x - 2.0, b.top + 6.0, 4.0, 4.0);
}
