use anyhow::{anyhow, bail, Context, Result};

use modeller::input::{ElementState, Key, MouseButton, NamedKey};
use modeller::{Action, Viewer};

/// One scripted input. Positions are window pixels with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Down { button: MouseButton, x: f32, y: f32 },
    Up { button: MouseButton, x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Key { key: Key, x: f32, y: f32 },
    Resize { width: u32, height: u32 },
    /// Triggers an action directly, bypassing the input bindings.
    Action(Action),
}

/// A parsed command and the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

impl Step {
    /// Feeds the step to a viewer and returns whether it asked for a redraw.
    pub fn apply(&self, viewer: &mut Viewer) -> bool {
        match &self.command {
            Command::Down { button, x, y } => viewer.handle_mouse_button(*button, ElementState::Pressed, *x, *y),
            Command::Up { button, x, y } => viewer.handle_mouse_button(*button, ElementState::Released, *x, *y),
            Command::Move { x, y } => viewer.handle_mouse_move(*x, *y),
            Command::Key { key, x, y } => viewer.handle_keystroke(key, *x, *y),
            Command::Resize { width, height } => {
                viewer.resize(*width, *height);
                true
            }
            Command::Action(action) => {
                let handled = viewer.trigger(action);
                log::debug!("line {}: '{}' ran {} handler(s)", self.line, action, handled);
                true
            }
        }
    }
}

fn parse_button(word: &str) -> Result<MouseButton> {
    Ok(match word {
        "left" => MouseButton::Left,
        "middle" => MouseButton::Middle,
        "right" => MouseButton::Right,
        "wheelup" => MouseButton::WheelUp,
        "wheeldown" => MouseButton::WheelDown,
        _ => bail!("unknown button '{}'", word),
    })
}

fn parse_key(word: &str) -> Result<Key> {
    Ok(match word {
        "up" => Key::Named(NamedKey::ArrowUp),
        "down" => Key::Named(NamedKey::ArrowDown),
        "left" => Key::Named(NamedKey::ArrowLeft),
        "right" => Key::Named(NamedKey::ArrowRight),
        "escape" => Key::Named(NamedKey::Escape),
        _ => {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Character(c),
                _ => bail!("unknown key '{}'", word),
            }
        }
    })
}

fn parse_number<T: std::str::FromStr>(words: &[&str], index: usize, what: &str) -> Result<T> {
    let word = words
        .get(index)
        .ok_or_else(|| anyhow!("missing {}", what))?;
    word.parse().map_err(|_| anyhow!("invalid {} '{}'", what, word))
}

fn expect_arity(words: &[&str], count: usize, usage: &str) -> Result<()> {
    if words.len() != count {
        bail!("expected '{}'", usage);
    }
    Ok(())
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words[0] {
        "down" | "up" => {
            expect_arity(&words, 4, "down|up <button> <x> <y>")?;
            let button = parse_button(words[1])?;
            let (x, y) = (parse_number(&words, 2, "x")?, parse_number(&words, 3, "y")?);
            if words[0] == "down" {
                Command::Down { button, x, y }
            } else {
                Command::Up { button, x, y }
            }
        }
        "move" => {
            expect_arity(&words, 3, "move <x> <y>")?;
            Command::Move {
                x: parse_number(&words, 1, "x")?,
                y: parse_number(&words, 2, "y")?,
            }
        }
        "key" => {
            expect_arity(&words, 4, "key <key> <x> <y>")?;
            Command::Key {
                key: parse_key(words[1])?,
                x: parse_number(&words, 2, "x")?,
                y: parse_number(&words, 3, "y")?,
            }
        }
        "resize" => {
            expect_arity(&words, 3, "resize <width> <height>")?;
            Command::Resize {
                width: parse_number(&words, 1, "width")?,
                height: parse_number(&words, 2, "height")?,
            }
        }
        "action" => {
            let action: Action = words[1..].join(" ").parse()?;
            Command::Action(action)
        }
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

/// Parses a whole script. Errors name the offending line (1-based).
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        if let Some(command) = parse_command(line).with_context(|| format!("line {}", line_number))? {
            steps.push(Step { line: line_number, command });
        }
    }
    Ok(steps)
}
