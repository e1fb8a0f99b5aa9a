//! Terminal output renderer.
//!
//! Menus, prompts, results and chat go to stdout; warnings and errors go to
//! stderr. A live progress line stays open (no newline) until the next regular
//! line is printed.

use super::settings;
use crossterm::cursor::MoveTo;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct Renderer {
    color: bool,
    clear_screen: bool,
    /// A progress line is open on stdout.
    progress_open: AtomicBool,
}

impl Renderer {
    pub fn new(color: bool, clear_screen: bool) -> Self {
        Self {
            color,
            clear_screen,
            progress_open: AtomicBool::new(false),
        }
    }

    fn close_progress(&self) {
        if self.progress_open.swap(false, Ordering::Relaxed) {
            println!();
        }
    }

    pub fn clear(&self) {
        self.close_progress();
        if !self.clear_screen {
            println!();
            return;
        }
        let mut out = io::stdout();
        let _ = out.queue(Clear(ClearType::All));
        let _ = out.queue(MoveTo(0, 0));
        let _ = out.flush();
    }

    pub fn menu(&self, title: &str, entries: &[&str]) {
        self.close_progress();
        let heading = format!(
            "{} {title} {}",
            settings::MENU_TITLE_PREFIX,
            settings::MENU_TITLE_PREFIX
        );
        if self.color {
            println!("{}", heading.with(settings::COLOR_MENU_TITLE).bold());
        } else {
            println!("{heading}");
        }
        for (idx, entry) in entries.iter().enumerate() {
            let number = format!("{}.", idx + 1);
            if self.color {
                println!("{} {entry}", number.with(settings::COLOR_MENU_NUMBER));
            } else {
                println!("{number} {entry}");
            }
        }
    }

    pub fn prompt(&self, label: &str) {
        self.close_progress();
        if self.color {
            print!("{}", label.with(settings::COLOR_PROMPT));
        } else {
            print!("{label}");
        }
        let _ = io::stdout().flush();
    }

    pub fn line(&self, text: &str) {
        self.close_progress();
        println!("{text}");
    }

    pub fn section(&self, title: &str) {
        self.close_progress();
        if self.color {
            println!(
                "\n{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                title.with(settings::COLOR_SECTION_TITLE).bold()
            );
        } else {
            println!("\n{title}:");
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        self.close_progress();
        if self.color {
            println!(
                "{}{} {}",
                settings::INDENT_1,
                format!("{key}:").with(settings::COLOR_FIELD_KEY),
                value.with(settings::COLOR_FIELD_VALUE),
            );
        } else {
            println!("{}{key}: {value}", settings::INDENT_1);
        }
    }

    pub fn activity(&self, text: &str) {
        self.close_progress();
        if self.color {
            println!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                text.with(settings::COLOR_ACTIVITY).bold()
            );
        } else {
            println!("{text}");
        }
    }

    pub fn progress(&self, text: &str) {
        self.progress_open.store(true, Ordering::Relaxed);
        if self.color {
            print!("\r{}          ", text.with(settings::COLOR_PROGRESS));
        } else {
            print!("\r{text}          ");
        }
        let _ = io::stdout().flush();
    }

    pub fn warn(&self, msg: &str) {
        self.close_progress();
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_WARNING.with(settings::COLOR_WARNING).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_WARNING);
        }
    }

    pub fn error(&self, msg: &str) {
        self.close_progress();
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_ERROR.with(settings::COLOR_ERROR).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_ERROR);
        }
    }

    pub fn chat_public(&self, sender: &str, text: &str) {
        self.close_progress();
        if self.color {
            println!(
                "{} {text}",
                format!("[{sender}]:").with(settings::COLOR_CHAT_SENDER)
            );
        } else {
            println!("[{sender}]: {text}");
        }
    }

    pub fn chat_private(&self, text: &str) {
        self.close_progress();
        let line = format!("{} {text}", settings::LABEL_PRIVATE);
        if self.color {
            println!("{}", line.with(settings::COLOR_CHAT_PRIVATE).bold());
        } else {
            println!("{line}");
        }
    }
}
