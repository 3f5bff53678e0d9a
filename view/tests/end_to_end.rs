use minefield_common::models::{GameConfig, GameStatus, Pos};
use minefield_engine::GameController;
use minefield_view::{GameEvent, ViewModel};

#[test]
fn view_tracks_a_full_game() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = GameConfig {
        width: 4,
        height: 4,
        mines: 15,
        marks: false,
    };
    let mut controller = GameController::new(config).unwrap();
    let (_, receiver) = controller.subscribe();
    let mut view = ViewModel::new(receiver);

    let events = view.pump();
    assert_eq!(
        events,
        vec![GameEvent::GameInitialized {
            width: 4,
            height: 4,
            mines: 15
        }]
    );

    // the first click is the only safe cell, so the game is won outright
    controller.reveal(Pos { x: 0, y: 0 }).unwrap();
    let events = view.pump();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GameEvent::BoardUpdated { .. }));
    assert_eq!(
        events[1],
        GameEvent::StatusChanged {
            status: GameStatus::Won
        }
    );

    let board = view.board().unwrap();
    assert!(board.is_won());
    assert_eq!(board.flags_remaining, 0);
    assert_eq!(board.count_cells()["flagged"], 15);
    assert_eq!(board.count_cells()["revealed"], 1);

    // the projected board agrees with the engine cell by cell
    for y in 0..4 {
        for x in 0..4 {
            let pos = Pos { x, y };
            assert_eq!(
                *board.cell(pos).unwrap(),
                controller.cell_view(pos).unwrap()
            );
        }
    }

    controller.reset();
    let events = view.pump();
    assert_eq!(
        events,
        vec![GameEvent::GameInitialized {
            width: 4,
            height: 4,
            mines: 15
        }]
    );
    assert!(!view.board().unwrap().is_finished());
}
