use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_match3::core::{find_matches_into, Board, GameConfig, GameSnapshot, GameState};
use tui_match3::engine::{Journal, Session};
use tui_match3::store::MemoryStore;
use tui_match3::types::{GameAction, Direction, Pos};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

const QUIET: [&str; 8] = [
    "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG", "BYMCRGBY",
];

// Single test per binary: the counter is process-global.
#[test]
fn settled_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let board = Board::from_rows(&QUIET).unwrap();
    let mut matches = Vec::with_capacity(32);
    let mut snap = GameSnapshot::default();

    let game = GameState::from_board(board.clone(), 3, GameConfig::default());
    let mut session = Session::with_game(game, "gate", 3, MemoryStore::new(), Journal::disabled());

    // Warm-up.
    find_matches_into(&board, &mut matches);
    session.tick(16).unwrap();
    session.snapshot_into(&mut snap);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            find_matches_into(&board, &mut matches);
            let _ = session.tick(16);
            session.snapshot_into(&mut snap);
        }

        for _ in 0..50 {
            let _ = session.apply(GameAction::MoveCursor(Direction::Right));
            let _ = session.apply(GameAction::MoveCursor(Direction::Down));
            let _ = session.apply(GameAction::Select);
            let _ = session.apply(GameAction::Deselect);
            let _ = session.apply(GameAction::MoveCursor(Direction::Left));
            let _ = session.apply(GameAction::MoveCursor(Direction::Up));
        }

        // A wasted swap scans and reverts without starting a cascade.
        let _ = session.apply(GameAction::SelectAt(Pos::new(0, 0)));
        let _ = session.apply(GameAction::SelectAt(Pos::new(1, 0)));
        let _ = session.tick(16);
    });

    assert!(matches.is_empty());
    assert_eq!(session.game().level().moves_remaining, 19);
    assert!(allocs == 0);
}
