use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ProfileSelectProps {
    pub usernames: Vec<String>,
    pub error: Option<String>,
    pub on_select: Callback<String>,
    pub on_create: Callback<String>,
}

/// Pick an existing profile or create a new one.
#[function_component]
pub fn ProfileSelect(props: &ProfileSelectProps) -> Html {
    let draft = use_state(String::new);

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            draft.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let create = {
        let draft = draft.clone();
        let cb = props.on_create.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit((*draft).clone());
        })
    };

    html! {
        <div style="max-width:420px; margin:48px auto; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:12px; padding:24px 28px; display:flex; flex-direction:column; gap:14px;">
            <h2 style="margin:0; color:#58a6ff; text-align:center;">{"Country Climber"}</h2>
            <p style="margin:0; text-align:center; opacity:0.8;">{"Climb to each country's king to conquer it."}</p>
            if !props.usernames.is_empty() {
                <div style="display:flex; flex-direction:column; gap:6px;">
                    <span style="font-weight:600;">{"Continue as"}</span>
                    { for props.usernames.iter().map(|name| {
                        let cb = props.on_select.clone();
                        let name_cb = name.clone();
                        html! {
                            <button key={name.clone()} onclick={Callback::from(move |_| cb.emit(name_cb.clone()))}>
                                { name.clone() }
                            </button>
                        }
                    }) }
                </div>
            }
            <form onsubmit={create} style="display:flex; gap:8px;">
                <input
                    type="text"
                    placeholder="New User"
                    value={(*draft).clone()}
                    {oninput}
                    style="flex:1;"
                />
                <button type="submit">{"Create"}</button>
            </form>
            if let Some(err) = &props.error {
                <div style="color:#f85149; font-size:13px;">{ err.clone() }</div>
            }
        </div>
    }
}
