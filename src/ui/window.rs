use crate::core::refresh::{DisplaySurface, RefreshLoop};
use crate::core::settings::WindowSettings;
use crate::ui::styles;
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use libadwaita as adw;
use std::rc::Rc;

pub struct LabelSurface {
    label: gtk4::Label,
}

impl DisplaySurface for LabelSurface {
    fn set_text(&self, text: &str) {
        self.label.set_text(text);
    }
}

/// The application's only window: one label, padded, in the configured font.
pub struct LabelWindow {
    window: adw::ApplicationWindow,
    label: gtk4::Label,
}

impl LabelWindow {
    pub fn new(app: &adw::Application, settings: &WindowSettings) -> Self {
        let label = gtk4::Label::builder()
            .margin_top(settings.padding)
            .margin_bottom(settings.padding)
            .halign(gtk4::Align::Center)
            .valign(gtk4::Align::Start)
            .build();
        label.add_css_class(styles::LABEL_CLASS);

        let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
        content.append(&label);

        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title(settings.title.as_str())
            .default_width(settings.width)
            .default_height(settings.height)
            .content(&content)
            .build();

        styles::install(&WidgetExt::display(&window), settings);

        Self { window, label }
    }

    pub fn surface(&self) -> Rc<dyn DisplaySurface> {
        Rc::new(LabelSurface {
            label: self.label.clone(),
        })
    }

    /// Ties the loop to the window: refresh keys trigger a cycle, closing
    /// the window stops it.
    pub fn bind(&self, refresh: &RefreshLoop) {
        let controller = gtk4::EventControllerKey::new();
        let refresh_key = refresh.clone();
        controller.connect_key_pressed(move |_, key, _, _| {
            if is_refresh_key(key) {
                refresh_key.refresh_now();
                return glib::Propagation::Stop;
            }
            glib::Propagation::Proceed
        });
        self.window.add_controller(controller);

        let refresh_close = refresh.clone();
        self.window.connect_close_request(move |_| {
            tracing::info!(
                cycles = refresh_close.cycles(),
                text = %refresh_close.text(),
                "Window closing"
            );
            refresh_close.stop();
            glib::Propagation::Proceed
        });
    }

    pub fn present(&self) {
        self.window.present();
    }
}

fn is_refresh_key(key: gdk::Key) -> bool {
    key == gdk::Key::F5 || key == gdk::Key::r
}
