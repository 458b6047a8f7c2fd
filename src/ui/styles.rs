use crate::core::settings::WindowSettings;
use gtk4::gdk;

pub const LABEL_CLASS: &str = "refresh-label";

pub fn label_css(settings: &WindowSettings) -> String {
    let family = settings.font_family.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"
.{LABEL_CLASS} {{
    font-family: "{family}";
    font-size: {size}pt;
}}
"#,
        size = settings.font_size,
    )
}

pub fn install(display: &gdk::Display, settings: &WindowSettings) {
    let provider = gtk4::CssProvider::new();
    provider.load_from_data(&label_css(settings));
    gtk4::style_context_add_provider_for_display(
        display,
        &provider,
        gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
