//! Line-oriented driver standing in for a rendering layer.
//!
//! Each input line is parsed into a [`HostCommand`], dispatched against the
//! engine, and the resulting snapshot is rendered as text or JSON. Rooms are
//! addressed by their position; commands that take a position default to the
//! focused room.

use std::fmt::Write as _;

use carousel::engine::{Action, EngineCore};
use carousel::focus::Mode;
use carousel::publish::Snapshot;
use carousel::rooms::RoomId;

pub const HELP: &str = "\
commands:
  toggle                      switch between browsing and viewing
  drag <delta> <dist> <dir>   one drag sample (dir: -1, 0, 1)
  end                         release the drag
  add                         provision a new room
  dup [n]                     duplicate room n (default: focused)
  rm [n]                      remove room n (default: focused)
  fav [n]                     toggle favourite on room n (default: focused)
  resize <w> <h>              set the viewport size
  focus <n>                   jump to room n
  share                       print the focused image source
  show                        print the current snapshot
  help                        print this help
  quit                        exit";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReplError {
    #[error("unknown command `{0}`; try `help`")]
    UnknownCommand(String),
    #[error("`{command}` needs <{argument}>")]
    MissingArgument { command: &'static str, argument: &'static str },
    #[error("`{value}` is not a valid {argument}")]
    InvalidNumber { argument: &'static str, value: String },
    #[error("no room at position {0}")]
    NoSuchRoom(usize),
    #[error("the gallery is empty")]
    EmptyGallery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Toggle,
    Drag { delta: f64, distance: f64, direction: f64 },
    End,
    Add,
    Duplicate(Option<usize>),
    Remove(Option<usize>),
    Favourite(Option<usize>),
    Resize { width: f64, height: f64 },
    Focus(usize),
    Share,
    Show,
    Help,
    Quit,
}

/// What the host loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Apply(Vec<Action>),
    Show,
    Help,
    Quit,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ReplError`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<HostCommand>, ReplError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head {
        "toggle" | "t" => HostCommand::Toggle,
        "drag" | "d" => HostCommand::Drag {
            delta: required(&mut words, "drag", "delta")?,
            distance: required(&mut words, "drag", "dist")?,
            direction: required(&mut words, "drag", "dir")?,
        },
        "end" | "e" => HostCommand::End,
        "add" | "a" => HostCommand::Add,
        "dup" => HostCommand::Duplicate(optional(&mut words, "position")?),
        "rm" => HostCommand::Remove(optional(&mut words, "position")?),
        "fav" => HostCommand::Favourite(optional(&mut words, "position")?),
        "resize" => HostCommand::Resize {
            width: required(&mut words, "resize", "w")?,
            height: required(&mut words, "resize", "h")?,
        },
        "focus" | "f" => HostCommand::Focus(required(&mut words, "focus", "n")?),
        "share" => HostCommand::Share,
        "show" | "s" => HostCommand::Show,
        "help" | "?" => HostCommand::Help,
        "quit" | "q" | "exit" => HostCommand::Quit,
        other => return Err(ReplError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a, T: std::str::FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<T, ReplError> {
    let word = words.next().ok_or(ReplError::MissingArgument { command, argument })?;
    word.parse()
        .map_err(|_| ReplError::InvalidNumber { argument, value: word.to_string() })
}

fn optional<'a, T: std::str::FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    argument: &'static str,
) -> Result<Option<T>, ReplError> {
    words
        .next()
        .map(|word| {
            word.parse()
                .map_err(|_| ReplError::InvalidNumber { argument, value: word.to_string() })
        })
        .transpose()
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Apply a parsed command to the engine.
///
/// # Errors
///
/// Returns [`ReplError::NoSuchRoom`] or [`ReplError::EmptyGallery`] when a
/// command addresses a room that does not exist.
pub fn dispatch(core: &mut EngineCore, command: HostCommand) -> Result<Step, ReplError> {
    let actions = match command {
        HostCommand::Toggle => core.toggle_mode(),
        HostCommand::Drag { delta, distance, direction } => core.drag_update(delta, distance, direction),
        HostCommand::End => core.drag_end(),
        HostCommand::Add => core.add_room(),
        HostCommand::Duplicate(at) => {
            let id = target(core, at)?;
            core.duplicate(&id)
        }
        HostCommand::Remove(at) => {
            let id = target(core, at)?;
            core.remove(&id)
        }
        HostCommand::Favourite(at) => {
            let id = target(core, at)?;
            core.toggle_favourite(&id)
        }
        HostCommand::Resize { width, height } => core.resize(width, height),
        HostCommand::Focus(index) => {
            if index >= core.len() {
                return Err(ReplError::NoSuchRoom(index));
            }
            core.set_focus(index)
        }
        HostCommand::Share => {
            if core.is_empty() {
                return Err(ReplError::EmptyGallery);
            }
            core.share()
        }
        HostCommand::Show => return Ok(Step::Show),
        HostCommand::Help => return Ok(Step::Help),
        HostCommand::Quit => return Ok(Step::Quit),
    };
    Ok(Step::Apply(actions))
}

fn target(core: &EngineCore, at: Option<usize>) -> Result<RoomId, ReplError> {
    match at {
        Some(index) => core.rooms().get(index).map(|r| r.id).ok_or(ReplError::NoSuchRoom(index)),
        None => core.focused_room().map(|r| r.id).ok_or(ReplError::EmptyGallery),
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Human-readable view of a snapshot: a header line, then one line per room.
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mode = match snapshot.mode {
        Mode::Browsing => "browsing",
        Mode::Viewing => "viewing",
    };
    let focus = snapshot
        .focus
        .map_or_else(|| "-".to_string(), |f| format!("{}/{}", f + 1, snapshot.items.len()));

    let mut out = format!(
        "rev {}  {mode}  focus {focus}  viewport {}x{}",
        snapshot.revision, snapshot.viewport.width, snapshot.viewport.height
    );
    if snapshot.drag.active {
        let _ = write!(out, "  drag {:+.1} ({:.1})", snapshot.drag.axis_delta, snapshot.drag.travelled);
    }

    for item in &snapshot.items {
        let marker = if Some(item.index) == snapshot.focus { '>' } else { ' ' };
        let t = &item.transform;
        let state = if item.exiting {
            "exiting"
        } else if t.visible {
            "visible"
        } else {
            "hidden"
        };
        let star = if item.room.favourited { " *" } else { "" };
        let _ = write!(
            out,
            "\n{marker} [{}] x={:.1} scale={:.2} blur={:.1} panel={:.2} {state}  {}{star}",
            item.index, t.x, t.scale, t.blur_px, t.overlay_opacity, item.room.title
        );
        if t.controls_visible {
            out.push_str("  [fav] [rm]");
        }
    }
    if snapshot.add_control_visible {
        out.push_str(if snapshot.add_control_busy { "\n  […] fetching" } else { "\n  [+] add room" });
    }
    out
}

/// One-line notice for actions worth telling the user about.
#[must_use]
pub fn describe_action(action: &Action) -> Option<String> {
    match action {
        Action::Navigated { from, to } => Some(format!("moved {} -> {}", from + 1, to + 1)),
        Action::SpringBack => Some("spring back".into()),
        Action::ProvisionRequested => Some("fetching a new room...".into()),
        Action::RoomAdded { id, .. } => Some(format!("added {id}")),
        Action::ExitStarted { id, .. } => Some(format!("removing {id}")),
        Action::RoomRemoved { id, .. } => Some(format!("removed {id}")),
        Action::ShareReady { source } => Some(format!("share: {source}")),
        Action::RenderNeeded | Action::Settle { .. } => None,
    }
}

#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;
