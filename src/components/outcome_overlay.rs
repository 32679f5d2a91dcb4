use crate::session::Outcome;
use crate::util::format_score;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct OutcomeOverlayProps {
    pub outcome: Outcome,
    pub country: AttrValue,
    pub score: f64,
    pub return_to_map: Callback<()>,
}

#[function_component]
pub fn OutcomeOverlay(props: &OutcomeOverlayProps) -> Html {
    let (title, color, line) = match props.outcome {
        Outcome::Pending => return html! {},
        Outcome::Won => ("Victory!", "#2ea043", format!("{} is yours.", props.country)),
        Outcome::Lost => ("Defeat", "#f85149", format!("{} holds out for now.", props.country)),
    };
    let return_btn = {
        let cb = props.return_to_map.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style={format!("position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid {}; padding:24px 32px; border-radius:12px; text-align:center; min-width:260px;", color)}>
            <h2 style={format!("margin:0 0 12px 0; color:{};", color)}>{ title }</h2>
            <p style="margin:4px 0;">{ line }</p>
            <p style="margin:4px 0;">{ format!("Climbed: {}", format_score(props.score)) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={return_btn}>{"Return to map"}</button>
            </div>
        </div>
    }
}
