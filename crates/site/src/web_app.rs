use leptos::*;
use shell_runtime::{use_shell_runtime, ForegroundState, LaunchPoint, ShellContext, ShellProvider};

/// Home-screen launch points: app id and icon glyph.
const HOME_APPS: [(&str, &str); 6] = [
    ("calculator", "calculate"),
    ("notes", "note"),
    ("weather", "wb_sunny"),
    ("clock", "schedule"),
    ("contacts", "contacts"),
    ("browser", "public"),
];

#[component]
pub fn SiteApp(shell: ShellContext) -> impl IntoView {
    view! {
        <ShellProvider shell=shell>
            <main class="phone-shell">
                <HomeScreen />
                <RecentsScreen />
                <NavigationBar />
            </main>
        </ShellProvider>
    }
}

#[component]
fn HomeScreen() -> impl IntoView {
    let runtime = use_shell_runtime();

    view! {
        <section class="home-screen" aria-label="Home screen">
            <For each=move || HOME_APPS key=|(app_id, _)| *app_id let:app>
                {{
                    let (app_id, icon) = app;
                    let point = LaunchPoint::new(app_id);
                    let label_point = point.clone();
                    view! {
                        <button
                            class="app-icon"
                            data-app-id=app_id
                            on:click=move |_| {
                                runtime.dispatch(|shell| shell.activate(&point));
                            }
                        >
                            <span class="material-icons-round">{icon}</span>
                            <span class="app-name">
                                {move || runtime.launch_label(&label_point)}
                            </span>
                        </button>
                    }
                }}
            </For>
            <p class="shell-status">
                {move || match runtime.foreground.get() {
                    ForegroundState::Idle => String::new(),
                    ForegroundState::Running { app_id } => app_id.to_string(),
                    ForegroundState::Stub { requested_id } => format!("{requested_id} (placeholder)"),
                }}
            </p>
        </section>
    }
}

#[component]
fn RecentsScreen() -> impl IntoView {
    let runtime = use_shell_runtime();

    view! {
        <section
            class=move || {
                if runtime.recents_visible.get() {
                    "recents-screen visible"
                } else {
                    "recents-screen"
                }
            }
            aria-label="Recent apps"
        >
            <Show
                when=move || runtime.recents.with(|recents| !recents.is_empty())
                fallback=|| view! { <p class="recents-empty">"Нет недавних приложений"</p> }
            >
                <For each=move || runtime.recents.get() key=|entry| entry.app_id.clone() let:entry>
                    {{
                        let open_id = entry.app_id.clone();
                        let close_id = entry.app_id.clone();
                        view! {
                            <div
                                class="app-card"
                                on:click=move |_| {
                                    runtime.launch_from_history(open_id.clone());
                                }
                            >
                                <span class="material-icons-round">{entry.icon_ref.clone()}</span>
                                <span class="app-card-title">{entry.display_name.clone()}</span>
                                <button
                                    class="app-card-close"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        runtime.remove_recent(close_id.clone());
                                    }
                                >
                                    "close"
                                </button>
                            </div>
                        }
                    }}
                </For>
                <button
                    class="recents-clear"
                    on:click=move |_| {
                        if let Some(Err(err)) = runtime.clear_recents() {
                            logging::warn!("clear recents failed: {err}");
                        }
                    }
                >
                    "Очистить всё"
                </button>
            </Show>
        </section>
    }
}

#[component]
fn NavigationBar() -> impl IntoView {
    let runtime = use_shell_runtime();

    view! {
        <nav class="navigation-bar">
            <button
                class="nav-button nav-button-back"
                on:click=move |_| {
                    runtime.go_back();
                }
            >
                "arrow_back"
            </button>
            <button class="nav-button nav-button-home" on:click=move |_| runtime.go_home()>
                "circle"
            </button>
            <button
                class="nav-button nav-button-recents"
                on:click=move |_| runtime.toggle_recents()
            >
                "crop_square"
            </button>
        </nav>
    }
}
