// Page editor: block styles, color theme and find/replace over the generated page.
// State is per session; see session::dispatch_editor.

pub mod handlers;
pub mod state;
pub mod text_replace;
pub mod theme;
