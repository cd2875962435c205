//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns the components and the `SyncEngine`.
//! - Terminal events arrive on an `AppMessage` channel from a blocking reader.
//! - Poll results, command outcomes and toast expiries arrive as `SyncEvent`s
//!   on a second channel and are handed to the engine unchanged.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use anyhow::Context;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use farm_proto::client::DeviceClient;
use farm_proto::config::Config;

use crate::{
    action::Action,
    component::Component,
    components::{
        header::Header, relay_panel::RelayPanel, rename_form::RenameForm,
        telemetry_panel::TelemetryPanel,
    },
    dispatcher::CommandDispatcher,
    engine::{Effect, Sequencer, SyncEngine, SyncEvent},
    notifier::ToastTimer,
    poller::Poller,
    widgets::{
        status_bar::{self, InputMode},
        toast,
    },
};

/// UI maintenance tick: pending-marker pulse and intent timeouts.
const UI_TICK: Duration = Duration::from_millis(100);

#[derive(Debug)]
enum AppMessage {
    Event(Event),
}

pub struct App {
    engine: SyncEngine,
    poller: Poller,
    dispatcher: CommandDispatcher,
    toast_timer: ToastTimer,
    sync_tx: mpsc::Sender<SyncEvent>,
    sync_rx: Option<mpsc::Receiver<SyncEvent>>,

    header: Header,
    relays: RelayPanel,
    telemetry: TelemetryPanel,
    rename_form: RenameForm,

    input_mode: InputMode,
    should_quit: bool,
}

impl App {
    pub fn new(client: DeviceClient, config: &Config) -> Self {
        let (sync_tx, sync_rx) = mpsc::channel::<SyncEvent>(256);
        let sequencer = Sequencer::new();
        let poller = Poller::new(client.clone(), sequencer.clone(), sync_tx.clone());
        let dispatcher = CommandDispatcher::new(client, sequencer, sync_tx.clone());

        Self {
            engine: SyncEngine::new(config.sync.ordering, config.ui.toast_toggle_failures),
            poller,
            dispatcher,
            toast_timer: ToastTimer::new(),
            sync_tx,
            sync_rx: Some(sync_rx),
            header: Header::new(),
            relays: RelayPanel::new(),
            telemetry: TelemetryPanel::new(),
            rename_form: RenameForm::new(),
            input_mode: InputMode::Normal,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let sync_rx = self.sync_rx.take().context("app already ran")?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("terminal ready, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, sync_rx).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        mut sync_rx: mpsc::Receiver<SyncEvent>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        let poll_task = self.poller.clone().spawn();
        info!(base_url = self.poller.base_url(), "polling started");

        let mut ui_tick = tokio::time::interval(UI_TICK);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }
                Some(ev) = sync_rx.recv() => {
                    self.apply_sync(ev);
                    // Drain whatever else completed in the meantime.
                    while let Ok(ev) = sync_rx.try_recv() {
                        self.apply_sync(ev);
                    }
                    needs_redraw = true;
                }
                _ = ui_tick.tick() => {
                    needs_redraw = self.engine.tick();
                }
            }
        }

        poll_task.abort();
        self.toast_timer.cancel();
        info!("farmdash exiting");
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }
        match self.input_mode {
            InputMode::Rename => self.rename_form.handle_key(key, self.engine.state()),
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => vec![Action::Quit],
                KeyCode::Char('g') => vec![Action::Reload],
                KeyCode::Char('n') => vec![Action::OpenRename],
                _ => self.relays.handle_key(key, self.engine.state()),
            },
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Toggle { device, desired } => {
                self.engine.toggle_requested(device, desired);
                self.dispatcher.toggle(device, desired);
            }
            Action::OpenRename => {
                self.rename_form.open(self.engine.state());
                self.input_mode = InputMode::Rename;
            }
            Action::SubmitRename {
                motor_name,
                light_name,
            } => {
                self.dispatcher.rename(&motor_name, &light_name);
                self.rename_form.close();
                self.input_mode = InputMode::Normal;
            }
            Action::CloseRename => {
                self.rename_form.close();
                self.input_mode = InputMode::Normal;
            }
            Action::Reload => {
                self.engine.reset_loading();
                self.poller.refresh_now();
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn apply_sync(&mut self, event: SyncEvent) {
        for effect in self.engine.apply(event) {
            match effect {
                Effect::ScheduleToast(ticket) => {
                    self.toast_timer.schedule(ticket, self.sync_tx.clone())
                }
                Effect::RefreshNow => {
                    self.poller.refresh_now();
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let state = self.engine.state();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.min_height()),
                Constraint::Length(self.relays.min_height()),
                Constraint::Min(self.telemetry.min_height()),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], state);
        self.relays.draw(frame, outer[1], state);
        self.telemetry.draw(frame, outer[2], state);
        status_bar::draw_keys_bar(frame, outer[3], self.input_mode);

        self.rename_form.draw(frame, area, state);
        toast::draw(frame, area, self.engine.toast());
    }
}
