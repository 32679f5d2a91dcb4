use crate::util::format_score;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub country: AttrValue,
    pub score: f64,
    /// Fraction of the level climbed, in `[0, 1]`.
    pub progress: f64,
    pub spring_boost: bool,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let pct = (props.progress * 100.0).floor() as u32;
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:200px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#58a6ff;", icon_style)}>{"🏳"}</span>
                <span style={format!("{} color:#58a6ff;", label_style)}>{ props.country.clone() }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{"⬆"}</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Score"}</span>
                <span style={format!("{} color:#d4af37;", value_style)}>{ format_score(props.score) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#2ea043;", icon_style)}>{"👑"}</span>
                <span style={format!("{} color:#2ea043;", label_style)}>{"Progress"}</span>
                <span style={format!("{} color:#2ea043;", value_style)}>{ format!("{}%", pct) }</span>
            </div>
            <div style="height:6px; background:#30363d; border-radius:3px; overflow:hidden;">
                <div style={format!("height:100%; width:{}%; background:#2ea043;", pct)}></div>
            </div>
            if props.spring_boost {
                <div style="color:#f0883e; font-weight:600; text-align:center;">{"Spring boost!"}</div>
            }
        </div>
    }
}
