//! Terminal output for command results.
//!
//! Results go to stdout so they can be piped; diagnostics go through `log`
//! to stderr. Colors honor NO_COLOR.

use crate::logging::should_use_color;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::IsTerminal;
use std::time::Duration;

/// Print a heading with colored styling and clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    if should_use_color() {
        println!("\n{}", line.bright_blue());
        println!("{}", format!(" {} ", text).bold());
        println!("{}\n", line.bright_blue());
    } else {
        println!("\n{line}\n {text} \n{line}\n");
    }
}

/// Print a section heading (smaller than main heading)
pub fn print_section(text: &str) {
    if should_use_color() {
        println!("\n{}", format!("» {text}").bold());
    } else {
        println!("\n» {text}");
    }
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    if should_use_color() {
        println!("  {}: {}", label.bright_cyan(), value);
    } else {
        println!("  {label}: {value}");
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        println!("  ✓ {}", message.green());
    } else {
        println!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        println!("  ⚠ {}", message.yellow());
    } else {
        println!("  ⚠ {message}");
    }
}

/// Print a fatal error to stderr
pub fn print_error(message: &str) {
    if should_use_color() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {message}");
    }
}

/// Spinner on stderr for a blocking step; hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if std::io::stderr().is_terminal() {
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_message(message.to_string());
    pb
}
