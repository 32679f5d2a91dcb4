use std::rc::Rc;
use yew::prelude::*;

use super::{
    game_view::{GameView, PreparedSession},
    map_view::MapView,
    profile_select::ProfileSelect,
};
use crate::boundary::{self, SessionReport};
use crate::config::{LevelCatalog, Tuning};
use crate::profile::{browser_store, create_profile, select_profile};
use crate::session::{Outcome, Session};
use crate::util::session_seed;
use crate::world::{Selection, WorldMap};

#[derive(PartialEq, Clone)]
enum View {
    Profiles,
    Map,
    Game(PreparedSession),
}

fn report_message(report: &SessionReport) -> String {
    let mut msg = match report.outcome {
        Outcome::Won if report.newly_conquered => format!("You conquered {}!", report.country),
        Outcome::Won => format!("{} was already yours.", report.country),
        Outcome::Lost => format!("{} resisted. Try again.", report.country),
        Outcome::Pending => String::new(),
    };
    if !report.persisted {
        msg.push_str(" Progress could not be saved.");
    }
    msg
}

fn claim_message(country: &str, saved: bool) -> String {
    let mut msg = format!("{} is your starting country.", country);
    if !saved {
        msg.push_str(" Progress could not be saved.");
    }
    msg
}

#[function_component(App)]
pub fn app() -> Html {
    let store = use_memo((), |_| browser_store());
    let world = use_memo((), |_| {
        LevelCatalog::embedded()
            .map(|c| Rc::new(WorldMap::new(c)))
            .map_err(|e| e.to_string())
    });
    let tuning = use_memo((), |_| Tuning::load());
    let profile = {
        let store = store.clone();
        use_state(move || {
            store
                .current_user()
                .and_then(|u| store.load(&u).ok())
        })
    };
    let view = {
        let has_profile = profile.is_some();
        use_state(move || if has_profile { View::Map } else { View::Profiles })
    };
    let notice = use_state(|| None::<String>);

    let world = match &*world {
        Ok(w) => w.clone(),
        Err(e) => {
            log::error!("level catalog unusable: {}", e);
            return html! {
                <div style="margin:48px auto; max-width:480px; color:#f85149;">{ format!("Level catalog unusable: {}", e) }</div>
            };
        }
    };

    let on_select = {
        let store = store.clone();
        let profile = profile.clone();
        let view = view.clone();
        let notice = notice.clone();
        Callback::from(move |name: String| match select_profile(&**store, &name) {
            Ok(p) => {
                notice.set(None);
                profile.set(Some(p));
                view.set(View::Map);
            }
            Err(e) => notice.set(Some(e.to_string())),
        })
    };
    let on_create = {
        let store = store.clone();
        let profile = profile.clone();
        let view = view.clone();
        let notice = notice.clone();
        Callback::from(move |name: String| match create_profile(&**store, &name) {
            Ok(p) => {
                notice.set(None);
                profile.set(Some(p));
                view.set(View::Map);
            }
            Err(e) => notice.set(Some(e.to_string())),
        })
    };
    let switch_profile = {
        let view = view.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            notice.set(None);
            view.set(View::Profiles);
        })
    };
    let on_pick = {
        let store = store.clone();
        let world = world.clone();
        let tuning = tuning.clone();
        let profile = profile.clone();
        let view = view.clone();
        let notice = notice.clone();
        Callback::from(move |name: String| {
            let Some(mut p) = (*profile).clone() else {
                return;
            };
            match world.select(&p, &name) {
                Selection::ClaimStart(country) => {
                    if let Some(saved) = boundary::claim_start(&**store, &mut p, &country) {
                        notice.set(Some(claim_message(&country, saved)));
                        profile.set(Some(p));
                    }
                }
                Selection::Play(country) => {
                    match Session::start(world.catalog(), &country, (*tuning).clone(), session_seed()) {
                        Ok(s) => {
                            notice.set(None);
                            view.set(View::Game(PreparedSession(Rc::new(s))));
                        }
                        Err(e) => {
                            log::error!("cannot start {}: {}", country, e);
                            notice.set(Some(e.to_string()));
                        }
                    }
                }
                Selection::AlreadyConquered => {
                    notice.set(Some(format!("You already rule {}.", name)))
                }
                Selection::NotConquerable => {
                    notice.set(Some(format!("{} does not border your territory.", name)))
                }
            }
        })
    };

    match (&*view, &*profile) {
        (View::Game(prepared), Some(_)) => {
            let on_end = {
                let level = prepared.0.level().clone();
                let store = store.clone();
                let profile = profile.clone();
                let view = view.clone();
                let notice = notice.clone();
                Callback::from(move |outcome: Outcome| {
                    if let Some(mut p) = (*profile).clone() {
                        let report = boundary::on_terminate(outcome, &level, &mut p, &**store);
                        notice.set(Some(report_message(&report)));
                        profile.set(Some(p));
                    }
                    view.set(View::Map);
                })
            };
            html! { <GameView session={prepared.clone()} {on_end} /> }
        }
        (View::Map, Some(p)) => html! {
            <MapView
                world={world}
                profile={p.clone()}
                notice={(*notice).clone()}
                {on_pick}
                {switch_profile}
            />
        },
        _ => html! {
            <ProfileSelect
                usernames={store.usernames().unwrap_or_default()}
                error={(*notice).clone()}
                {on_select}
                {on_create}
            />
        },
    }
}
