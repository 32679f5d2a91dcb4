use std::rc::Rc;
use yew::prelude::*;

use crate::profile::PlayerProfile;
use crate::world::WorldMap;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub world: Rc<WorldMap>,
    pub profile: PlayerProfile,
    pub notice: Option<String>,
    pub on_pick: Callback<String>,
    pub switch_profile: Callback<()>,
}

#[function_component]
pub fn MapView(props: &MapViewProps) -> Html {
    let world = &props.world;
    let profile = &props.profile;
    let fresh = profile.conquered.is_empty();
    let open_countries = world.conquerable(profile);

    // Neighbour links, each pair drawn once
    let links = world.countries().iter().flat_map(|c| {
        c.neighbors
            .iter()
            .filter(move |n| c.name < **n)
            .filter_map(move |n| world.catalog().country(n).map(|o| (c, o)))
    });

    let switch_btn = {
        let cb = props.switch_profile.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div style="display:flex; flex-direction:column; align-items:center; gap:12px; padding:16px;">
            <div style="display:flex; gap:16px; align-items:center;">
                <span style="font-weight:600;">{ format!("Ruler: {}", profile.username) }</span>
                <span style="opacity:0.8;">{ format!("Countries Conquered: {}", profile.conquered.len()) }</span>
                <button onclick={switch_btn}>{"Switch profile"}</button>
            </div>
            <p style="margin:0; opacity:0.85;">
                { if fresh {
                    "Pick your starting country."
                } else if world.is_complete(profile) {
                    "Every country is yours!"
                } else {
                    "Pick a neighbouring country to invade."
                } }
            </p>
            if let Some(msg) = &props.notice {
                <div style="color:#d4af37;">{ msg.clone() }</div>
            }
            <div style="position:relative; width:640px; height:440px; background:#0d2238; border:1px solid #30363d; border-radius:12px; overflow:hidden;">
                <svg width="640" height="440" viewBox="0 0 100 100" preserveAspectRatio="none" style="position:absolute; inset:0;">
                    { for links.map(|(a, b)| html! {
                        <line
                            x1={a.x.to_string()} y1={a.y.to_string()}
                            x2={b.x.to_string()} y2={b.y.to_string()}
                            stroke="#30363d" stroke-width="0.4"
                        />
                    }) }
                </svg>
                { for world.countries().iter().map(|c| {
                    let conquered = profile.has_conquered(&c.name);
                    let open = open_countries.contains(&c.name.as_str());
                    let (bg, border) = if conquered {
                        ("#484f58", "#6e7681")
                    } else if open {
                        ("#1f6feb", "#58a6ff")
                    } else {
                        ("#21262d", "#30363d")
                    };
                    let onclick = {
                        let cb = props.on_pick.clone();
                        let name = c.name.clone();
                        Callback::from(move |_| cb.emit(name.clone()))
                    };
                    html! {
                        <button
                            key={c.name.clone()}
                            {onclick}
                            style={format!(
                                "position:absolute; left:{}%; top:{}%; transform:translate(-50%, -50%); background:{}; border:1px solid {}; color:#fff; border-radius:6px; padding:4px 8px; font-size:12px; cursor:{};{}",
                                c.x, c.y, bg, border,
                                if open { "pointer" } else { "default" },
                                if conquered { " text-decoration:line-through; opacity:0.8;" } else { "" }
                            )}
                        >
                            { c.name.clone() }
                        </button>
                    }
                }) }
            </div>
        </div>
    }
}
