use std::time::Duration;

use carousel::engine::{Action, EngineCore};
use carousel::fallback::demo_rooms;
use carousel::rooms::RoomId;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use roomreel::config::{ConfigError, GalleryConfig};
use roomreel::provider::ProviderError;
use roomreel::repl::{self, Step};
use roomreel::services::provision::{ProvisionOutcome, Provisioner};

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, thiserror::Error)]
enum HostError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("provider setup: {0}")]
    Provider(#[from] ProviderError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roomreel", about = "Room gallery carousel driven from the terminal")]
struct Cli {
    /// Viewport width in pixels.
    #[arg(long, env = "GALLERY_WIDTH", default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, env = "GALLERY_HEIGHT", default_value_t = 800.0)]
    height: f64,

    /// Start with no rooms instead of the bundled demo set.
    #[arg(long)]
    empty: bool,

    /// Print each snapshot as one JSON line instead of text.
    #[arg(long)]
    json: bool,
}

/// Results of background work, delivered back to the host loop.
#[derive(Debug)]
enum HostEvent {
    Provisioned(ProvisionOutcome),
    ExitFinished(RoomId),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!(error = %e, "roomreel stopped");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), HostError> {
    let config = GalleryConfig::from_env()?;
    if config.access_key.is_none() {
        info!("UNSPLASH_ACCESS_KEY not set; new rooms come from the placeholder sequence");
    }
    let provisioner = Provisioner::from_config(&config)?;

    let rooms = if cli.empty { Vec::new() } else { demo_rooms() };
    let mut core = EngineCore::with_rooms(rooms);
    core.resize(cli.width, cli.height);

    let (events_tx, mut events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let mut host = Host {
        core,
        provisioner,
        events: events_tx,
        exit_delay: Duration::from_millis(config.exit_animation_ms),
        json: cli.json,
    };
    info!(rooms = host.core.len(), width = cli.width, height = cli.height, "gallery ready");
    host.show()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !host.on_line(&line)? {
                    break;
                }
            }
            Some(event) = events_rx.recv() => host.on_event(event)?,
        }
    }

    host.provisioner.cancel_in_flight();
    Ok(())
}

// =============================================================================
// HOST
// =============================================================================

struct Host {
    core: EngineCore,
    provisioner: Provisioner,
    events: mpsc::Sender<HostEvent>,
    exit_delay: Duration,
    json: bool,
}

impl Host {
    /// Handle one input line. Returns `false` when the user asked to quit.
    fn on_line(&mut self, line: &str) -> Result<bool, HostError> {
        let command = match repl::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(e) => {
                println!("error: {e}");
                return Ok(true);
            }
        };

        match repl::dispatch(&mut self.core, command) {
            Ok(Step::Apply(actions)) => self.apply(actions)?,
            Ok(Step::Show) => self.show()?,
            Ok(Step::Help) => println!("{}", repl::HELP),
            Ok(Step::Quit) => return Ok(false),
            Err(e) => println!("error: {e}"),
        }
        Ok(true)
    }

    fn on_event(&mut self, event: HostEvent) -> Result<(), HostError> {
        match event {
            HostEvent::Provisioned(outcome) => {
                let mut actions = match outcome {
                    ProvisionOutcome::Ready { room, origin } => {
                        let id = room.id;
                        self.core.append_room(room).unwrap_or_else(|e| {
                            warn!(error = %e, room_id = %id, ?origin, "provisioned room rejected");
                            Vec::new()
                        })
                    }
                    other => {
                        debug!(outcome = ?other, "provision produced no room");
                        Vec::new()
                    }
                };
                // A superseded or rejected request may leave another one running.
                actions.extend(self.core.set_provision_pending(self.provisioner.is_pending()));
                self.apply(actions)?;
            }
            HostEvent::ExitFinished(id) => {
                let actions = self.core.exit_complete(&id);
                self.apply(actions)?;
            }
        }
        Ok(())
    }

    /// Carry out the side effects the engine asked for, then redraw once.
    fn apply(&mut self, actions: Vec<Action>) -> Result<(), HostError> {
        let mut render = false;
        for action in &actions {
            match action {
                Action::RenderNeeded => render = true,
                Action::ProvisionRequested => {
                    self.spawn_provision();
                    render |= !self.core.set_provision_pending(true).is_empty();
                }
                Action::ExitStarted { id, .. } => self.spawn_exit_timer(*id),
                _ => {}
            }
            if !self.json {
                if let Some(notice) = repl::describe_action(action) {
                    println!("{notice}");
                }
            }
        }
        if render {
            self.show()?;
        }
        Ok(())
    }

    fn show(&self) -> Result<(), HostError> {
        let snapshot = self.core.snapshot();
        if self.json {
            println!("{}", snapshot.to_json()?);
        } else {
            println!("{}", repl::render_snapshot(snapshot));
        }
        Ok(())
    }

    fn spawn_provision(&self) {
        let provisioner = self.provisioner.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = provisioner.request_new_room().await;
            if events.send(HostEvent::Provisioned(outcome)).await.is_err() {
                debug!("host loop closed before provision finished");
            }
        });
    }

    /// Stand-in for the renderer's exit animation: report it done after the delay.
    fn spawn_exit_timer(&self, id: RoomId) {
        let events = self.events.clone();
        let delay = self.exit_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if events.send(HostEvent::ExitFinished(id)).await.is_err() {
                debug!(room_id = %id, "host loop closed before exit finished");
            }
        });
    }
}
