//! Home-screen widget.
//!
//! Runs outside the foreground container (possibly while the app is not
//! running at all), reads and writes the store directly on taps and
//! announces each commit on the broadcast channel.

mod console;
mod provider;
mod view;

pub use console::ConsoleHost;
pub use provider::{
    HomeWidgetProvider, RefreshTrigger, RenderError, RenderReport, TapPhase, WidgetHost,
};
pub use view::{TapBinding, TapRegion, WidgetAction, WidgetInstanceId, WidgetView};
