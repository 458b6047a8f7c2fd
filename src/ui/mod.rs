mod background;
mod scheduler;
pub mod styles;
mod window;

pub use background::BackgroundExecutor;
pub use scheduler::GlibScheduler;
pub use window::LabelWindow;
