use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use minefield_common::{
    models::{CellView, GameConfig, GameStatus, Pos, SessionInfo},
    protocol::{FlagResult, RevealResult, SessionEvent},
};

use crate::{error::EngineError, logic::Session};

fn validate_config(config: &GameConfig) -> Result<(), EngineError> {
    if config.width == 0
        || config.height == 0
        || config.mines == 0
        || config.mines >= config.total_cells()
    {
        warn!(
            "Rejecting invalid configuration: {}x{} with {} mines",
            config.width, config.height, config.mines
        );
        return Err(EngineError::InvalidConfiguration {
            width: config.width,
            height: config.height,
            mines: config.mines,
        });
    }
    Ok(())
}

/// Orchestrates one active [`Session`] and the observers watching it.
///
/// Every state-changing action returns its change-set to the caller and is
/// also broadcast as a [`SessionEvent`] to all subscribers, so a renderer
/// can either consume return values directly or register for events.
pub struct GameController {
    config: GameConfig,
    session: Session,
    subscribers: HashMap<Uuid, Sender<SessionEvent>>,
}

impl GameController {
    #[instrument(level = "trace")]
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        validate_config(&config)?;
        Ok(Self {
            config,
            session: Session::new(config),
            subscribers: HashMap::new(),
        })
    }

    /// Replaces the active session with a fresh one for `config`. On an
    /// invalid configuration the running session is left untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn new_game(&mut self, config: GameConfig) -> Result<SessionInfo, EngineError> {
        validate_config(&config)?;
        info!(
            "Starting new game: {}x{} with {} mines",
            config.width, config.height, config.mines
        );
        self.config = config;
        self.session = Session::new(config);
        let init = self.init_event();
        self.broadcast(init);
        Ok(self.session.info())
    }

    /// Discards the session and replays the current configuration. Mines
    /// are rolled anew on the next first reveal.
    #[instrument(level = "trace", skip(self))]
    pub fn reset(&mut self) -> SessionInfo {
        info!("Resetting game {}", self.session.id());
        self.session = Session::new(self.config);
        let init = self.init_event();
        self.broadcast(init);
        self.session.info()
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealResult, EngineError> {
        self.check_bounds(pos)?;
        let result = self.session.reveal(pos);
        if !result.is_no_op() {
            self.broadcast(SessionEvent::Update {
                updates: result.updates.clone(),
                status: result.status,
                flags_remaining: result.flags_remaining,
            });
        }
        Ok(result)
    }

    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagResult, EngineError> {
        self.check_bounds(pos)?;
        let result = self.session.toggle_flag(pos);
        if let Some(update) = &result.update {
            self.broadcast(SessionEvent::Update {
                updates: vec![update.clone()],
                status: result.status,
                flags_remaining: result.flags_remaining,
            });
        }
        Ok(result)
    }

    pub fn cell_view(&self, pos: Pos) -> Result<CellView, EngineError> {
        self.check_bounds(pos)?;
        Ok(self
            .session
            .cell_view(pos)
            .unwrap_or(CellView::Hidden))
    }

    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    pub fn flags_remaining(&self) -> usize {
        self.session.flags_remaining()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn session_info(&self) -> SessionInfo {
        self.session.info()
    }

    pub fn board_snapshot(&self) -> Vec<Vec<CellView>> {
        self.session.board_rows()
    }

    /// Registers an observer. The receiver immediately gets an `Init`
    /// event with the current board so it can render without waiting for
    /// the next action.
    #[instrument(level = "trace", skip(self))]
    pub fn subscribe(&mut self) -> (Uuid, Receiver<SessionEvent>) {
        let (sender, receiver) = mpsc::channel();
        let id = Uuid::new_v4();
        let _ = sender.send(self.init_event());
        self.subscribers.insert(id, sender);
        info!(
            "Subscriber {} added, total subscribers: {}",
            id,
            self.subscribers.len()
        );
        (id, receiver)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn unsubscribe(&mut self, id: &Uuid) {
        if self.subscribers.remove(id).is_some() {
            info!(
                "Subscriber {} removed, remaining subscribers: {}",
                id,
                self.subscribers.len()
            );
        } else {
            warn!("Attempted to remove non-existent subscriber: {}", id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn init_event(&self) -> SessionEvent {
        SessionEvent::Init {
            id: self.session.id().to_string(),
            width: self.config.width,
            height: self.config.height,
            mines: self.config.mines,
            board: self.session.board_rows(),
        }
    }

    fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers.retain(|id, sender| {
            if sender.send(event.clone()).is_ok() {
                true
            } else {
                debug!("Dropping disconnected subscriber {}", id);
                false
            }
        });
    }

    fn check_bounds(&self, pos: Pos) -> Result<(), EngineError> {
        if self.session.in_bounds(pos) {
            Ok(())
        } else {
            warn!("Position ({}, {}) is out of bounds", pos.x, pos.y);
            Err(EngineError::OutOfBounds {
                pos,
                width: self.config.width,
                height: self.config.height,
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
