//! Output primitives: JSON mode, colours, common field rendering.

use crossterm::tty::IsTty;
use owo_colors::OwoColorize;
use serde_json::to_string_pretty;

/// Prints a value as pretty JSON (the `--json` output mode).
pub fn json<T: serde::Serialize>(value: &T) {
    match to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(error) => eprintln!("fcli: error: could not serialize output: {error}"),
    }
}

/// Colour is used when stdout is a terminal and `NO_COLOR` does not
/// disable it (any non-empty value other than "no" disables).
pub fn color_enabled() -> bool {
    if let Ok(value) = std::env::var("NO_COLOR") {
        if !value.is_empty() && value != "no" {
            return false;
        }
    }
    std::io::stdout().is_tty()
}

/// State with a colour cue: open-ish green, closed/merged red-ish.
pub fn state(value: &str) -> String {
    if !color_enabled() {
        return value.to_string();
    }
    match value {
        "open" | "opened" | "active" | "New" | "Open" => value.green().to_string(),
        "closed" | "Closed" => value.red().to_string(),
        "merged" => value.magenta().to_string(),
        _ => value.to_string(),
    }
}

/// Renders a label name in its colour (`0xRRGGBB00`).
pub fn label_chip(name: &str, color: u32) -> String {
    if !color_enabled() || color == 0 {
        return name.to_string();
    }
    let r = ((color >> 24) & 0xff) as u8;
    let g = ((color >> 16) & 0xff) as u8;
    let b = ((color >> 8) & 0xff) as u8;
    name.truecolor(r, g, b).to_string()
}

/// Yes/no rendering for boolean detail fields.
pub fn yesno(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Single `key: value` line of a detail view.
pub fn field(key: &str, value: &str) {
    println!("{key:>14} : {value}");
}
