//! Light/dark theme toggle persisted in `localStorage`.

use dioxus::prelude::*;

const THEME_STORAGE_KEY: &str = "bettim-theme";
const THEMES: [(&str, &str); 3] = [("light", "Light"), ("dark", "Dark"), ("black", "Black")];

/// Set Pico's `data-theme` (and the black variant) on `<html>` and remember it
#[cfg(target_arch = "wasm32")]
fn apply_theme(theme: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(root) = window.document().and_then(|d| d.document_element()) {
        let base = if theme == "black" { "dark" } else { theme };
        let _ = root.set_attribute("data-theme", base);
        if theme == "black" {
            let _ = root.set_attribute("data-variant", "black");
        } else {
            let _ = root.remove_attribute("data-variant");
        }
    }
    if let Ok(Some(storage)) = window.local_storage() {
        let _ = storage.set_item(THEME_STORAGE_KEY, theme);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_theme(_theme: &str) {}

#[cfg(target_arch = "wasm32")]
fn stored_theme() -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()
        .flatten()?
        .get_item(THEME_STORAGE_KEY)
        .ok()
        .flatten()
}

#[cfg(not(target_arch = "wasm32"))]
fn stored_theme() -> Option<String> {
    None
}

#[component]
pub fn ThemeSwitcher() -> Element {
    let mut current = use_signal(|| "dark".to_string());

    use_effect(move || {
        if let Some(theme) = stored_theme() {
            current.set(theme);
        }
    });

    rsx! {
        div { class: "theme-switcher",
            for (id, label) in THEMES {
                button {
                    key: "{id}",
                    class: if current() == id { "active" } else { "" },
                    onclick: move |_| {
                        apply_theme(id);
                        current.set(id.to_string());
                    },
                    "{label}"
                }
            }
        }
    }
}

/// Runs in `<head>` before first paint; reads the same key the switcher writes.
pub fn theme_script() -> String {
    format!(
        r#"
(function(){{
    const t = localStorage.getItem('{key}') || 'dark';
    document.documentElement.setAttribute('data-theme', t === 'black' ? 'dark' : t);
    if (t === 'black') document.documentElement.setAttribute('data-variant', 'black');
}})();
"#,
        key = THEME_STORAGE_KEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_script_reads_the_switcher_key() {
        let script = theme_script();
        assert!(script.contains("localStorage.getItem('bettim-theme')"));
        assert!(script.contains("(function(){"));
        assert!(script.trim_end().ends_with("})();"));
    }
}
