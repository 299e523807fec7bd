use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_match3::core::{Board, GameConfig, GameSnapshot, GameState};
use tui_match3::term::{FrameBuffer, GameView, Viewport};
use tui_match3::types::{Overlay, Pos};

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

#[test]
fn term_game_view_render_is_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let mut rows = [
        "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG",
        "BYMCRGBY",
    ];
    rows[0] = "RRYRMCRG";
    let mut game = GameState::from_board(Board::from_rows(&rows).unwrap(), 5, GameConfig::default());
    let mut snap = GameSnapshot::default();

    // Warm-up.
    game.snapshot_into(&mut snap);
    view.render(&snap, &mut fb);

    // Start a cascade so falling tiles are part of the measured frames.
    game.attempt_move(Pos::new(2, 0), Pos::new(3, 0)).unwrap();
    game.tick(0).unwrap();
    game.snapshot_into(&mut snap);
    assert!(!snap.falling.is_empty());

    let allocs = with_alloc_counting(|| {
        for _ in 0..60 {
            game.snapshot_into(&mut snap);
            snap.selected = Some(Pos::new(4, 4));
            view.render(&snap, &mut fb);
        }

        snap.overlay = Overlay::GameOver {
            total_score: 12_345,
            new_highscore: true,
        };
        view.render(&snap, &mut fb);
        snap.overlay = Overlay::LevelComplete {
            level: 3,
            next_move_limit: 18,
            next_time_limit_secs: 55,
        };
        view.render(&snap, &mut fb);
    });

    assert!(allocs == 0);
}
