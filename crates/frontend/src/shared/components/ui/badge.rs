use leptos::prelude::*;

const KNOWN_VARIANTS: [&str; 5] = ["primary", "success", "warning", "error", "neutral"];

fn badge_class(variant: &str) -> String {
    let variant = if KNOWN_VARIANTS.contains(&variant) {
        variant
    } else {
        "neutral"
    };
    format!("badge badge--{}", variant)
}

/// Small colored label for session states and grade outcomes
#[component]
pub fn Badge(
    /// One of "primary", "success", "warning", "error", "neutral"
    #[prop(into)]
    variant: Signal<&'static str>,
    children: Children,
) -> impl IntoView {
    view! { <span class=move || badge_class(variant.get())>{children()}</span> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_falls_back_to_neutral() {
        assert_eq!(badge_class("success"), "badge badge--success");
        assert_eq!(badge_class("purple"), "badge badge--neutral");
    }
}
