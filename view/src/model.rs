use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};

use minefield_common::{
    models::{GameStatus, Pos},
    protocol::SessionEvent,
};

use crate::board::BoardView;

/// UI-facing events derived while applying a session's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A game was created or reset.
    GameInitialized {
        width: usize,
        height: usize,
        mines: usize,
    },
    /// Cell states changed at these positions.
    BoardUpdated { changed: Vec<Pos> },
    /// The session reached a new status (won/lost, or back in progress
    /// after a reset).
    StatusChanged { status: GameStatus },
}

/// Applies a session's event stream to a [`BoardView`].
pub struct ViewModel {
    receiver: Receiver<SessionEvent>,
    board: Option<BoardView>,
}

impl ViewModel {
    pub fn new(receiver: Receiver<SessionEvent>) -> Self {
        Self {
            receiver,
            board: None,
        }
    }

    pub fn board(&self) -> Option<&BoardView> {
        self.board.as_ref()
    }

    /// Drains all pending session events and returns the UI events they
    /// translate into. Synchronous; call it once per UI tick.
    pub fn pump(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        while let Ok(event) = self.receiver.try_recv() {
            match event {
                SessionEvent::Init {
                    id,
                    width,
                    height,
                    mines,
                    board,
                } => {
                    info!(
                        "Initialized view for session {}: {}x{} with {} mines",
                        id, width, height, mines
                    );
                    self.board = Some(BoardView::new(width, height, mines, board));
                    events.push(GameEvent::GameInitialized {
                        width,
                        height,
                        mines,
                    });
                }
                SessionEvent::Update {
                    updates,
                    status,
                    flags_remaining,
                } => {
                    let Some(board) = &mut self.board else {
                        warn!("Dropping update received before init");
                        continue;
                    };

                    debug!(
                        "Applying {} cell updates, status: {:?}",
                        updates.len(),
                        status
                    );

                    let changed: Vec<Pos> = updates.iter().map(|update| update.pos).collect();
                    for update in &updates {
                        board.apply(update);
                    }
                    let status_changed = board.status != status;
                    board.status = status;
                    board.flags_remaining = flags_remaining;

                    if !changed.is_empty() {
                        events.push(GameEvent::BoardUpdated { changed });
                    }
                    if status_changed {
                        events.push(GameEvent::StatusChanged { status });
                    }
                }
            }
        }

        events
    }
}
