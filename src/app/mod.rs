use crate::core::refresh::{LoopConfig, RefreshLoop};
use crate::core::settings::{FetchMode, Settings};
use crate::core::worker::{FetchExecutor, InlineExecutor};
use crate::sources;
use crate::ui::{BackgroundExecutor, GlibScheduler, LabelWindow};
use anyhow::{Context, Result};
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use std::rc::Rc;

const APP_ID: &str = "io.github.RefreshLabel";

/// Opens the window and blocks until it is closed.
pub fn run(settings: Settings, runtime: tokio::runtime::Handle) -> Result<()> {
    tracing::info!(app_id = APP_ID, mode = ?settings.refresh.mode, "Initializing GTK application");

    adw::init().context("Failed to initialize libadwaita")?;

    let app = adw::Application::builder().application_id(APP_ID).build();
    let settings = Rc::new(settings);

    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        activate(app, &settings, &runtime);
    });

    let exit_code = app.run_with_args::<&str>(&[]);
    if exit_code != glib::ExitCode::SUCCESS {
        anyhow::bail!("GTK application exited with {:?}", exit_code);
    }

    tracing::info!("Window closed");
    Ok(())
}

fn activate(app: &adw::Application, settings: &Settings, runtime: &tokio::runtime::Handle) {
    tracing::info!("GTK application activated");

    let window = LabelWindow::new(app, &settings.window);
    let refresh = RefreshLoop::new(
        LoopConfig::from_settings(&settings.refresh),
        sources::from_settings(&settings.source),
        Rc::new(GlibScheduler),
        executor_for(settings.refresh.mode, runtime),
        window.surface(),
    );

    window.bind(&refresh);
    window.present();
    refresh.start();
}

fn executor_for(mode: FetchMode, runtime: &tokio::runtime::Handle) -> Rc<dyn FetchExecutor> {
    match mode {
        FetchMode::Inline => Rc::new(InlineExecutor),
        FetchMode::Background => Rc::new(BackgroundExecutor::new(runtime.clone())),
    }
}
