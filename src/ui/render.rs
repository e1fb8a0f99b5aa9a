//! Rendering contract consumed by the session loop and background tasks.
//!
//! `RenderSink` keeps orchestration code decoupled from stdout. `Renderer` is
//! the terminal implementation; tests substitute a recording sink.

pub use super::renderer::Renderer;

/// Injectable rendering interface.
pub trait RenderSink: Send + Sync {
    /// Clear the terminal before drawing a menu.
    fn clear(&self);
    /// Render a numbered menu.
    fn menu(&self, title: &str, entries: &[&str]);
    /// Render an input prompt without a trailing newline.
    fn prompt(&self, label: &str);
    /// Render one plain result line.
    fn line(&self, text: &str);
    /// Render a titled section divider.
    fn section(&self, title: &str);
    /// Render one key/value field row.
    fn field(&self, key: &str, value: &str);
    /// Render task lifecycle text.
    fn activity(&self, text: &str);
    /// Overwrite the current line with a live counter.
    fn progress(&self, text: &str);
    /// Render a warning line.
    fn warn(&self, msg: &str);
    /// Render an error line.
    fn error(&self, msg: &str);
    /// Render one public chat line.
    fn chat_public(&self, sender: &str, text: &str);
    /// Render one private chat line, highlighted.
    fn chat_private(&self, text: &str);
}

impl RenderSink for Renderer {
    fn clear(&self) {
        self.clear();
    }

    fn menu(&self, title: &str, entries: &[&str]) {
        self.menu(title, entries);
    }

    fn prompt(&self, label: &str) {
        self.prompt(label);
    }

    fn line(&self, text: &str) {
        self.line(text);
    }

    fn section(&self, title: &str) {
        self.section(title);
    }

    fn field(&self, key: &str, value: &str) {
        self.field(key, value);
    }

    fn activity(&self, text: &str) {
        self.activity(text);
    }

    fn progress(&self, text: &str) {
        self.progress(text);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }

    fn chat_public(&self, sender: &str, text: &str) {
        self.chat_public(sender, text);
    }

    fn chat_private(&self, text: &str) {
        self.chat_private(text);
    }
}
