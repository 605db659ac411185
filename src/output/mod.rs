//! Styled terminal output for export progress
//!
//! Progress goes to stdout; errors go to stderr so scripts can capture them.

use owo_colors::OwoColorize;

const MINT: (u8, u8, u8) = (152, 225, 152);
const CORAL: (u8, u8, u8) = (255, 160, 160);
const CREAM: (u8, u8, u8) = (255, 230, 160);
const SKY: (u8, u8, u8) = (160, 200, 255);
const LAVENDER: (u8, u8, u8) = (181, 174, 254);
const GREY: (u8, u8, u8) = (160, 160, 160);

fn paint(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    text.truecolor(r, g, b).to_string()
}

fn symbol(text: &str, (r, g, b): (u8, u8, u8)) -> String {
    text.truecolor(r, g, b).bold().to_string()
}

pub fn success(message: &str) {
    println!("{} {}", symbol("✓", MINT), message.bright_white());
}

/// Print an error line to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", symbol("✗", CORAL), message.bright_white());
}

pub fn warning(message: &str) {
    println!("{} {}", symbol("⚠", CREAM), message.bright_white());
}

pub fn info(message: &str) {
    println!("{} {}", symbol("ℹ", SKY), message.bright_white());
}

/// Header followed by a separator line
pub fn section(title: &str) {
    println!("\n{}", title.truecolor(LAVENDER.0, LAVENDER.1, LAVENDER.2).bold());
    println!("{}", paint(&"─".repeat(50), GREY));
}

pub fn key_value(key: &str, value: &str) {
    println!("  {} {}", paint(&format!("{}:", key), GREY), value.bright_white());
}

pub fn dimmed(message: &str) {
    println!("{}", paint(message, GREY));
}
