use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use zen_tetris::core::{GameEngine, GameSnapshot};
use zen_tetris::term::{FrameBuffer, GameView, Viewport};
use zen_tetris::types::GameAction;

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

// Both checks live in one test so the counter is never shared between threads.
#[test]
fn frame_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut game = GameEngine::new(1);
    let mut snap = GameSnapshot::default();
    let view = GameView::default();
    let viewport = Viewport::new(60, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    // Warm-up.
    game.tick(16);
    game.apply_action(GameAction::MoveLeft);
    game.snapshot_into(&mut snap);
    view.render_into(&snap, viewport, &mut fb);

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            game.tick(16);
        }

        for _ in 0..50 {
            game.apply_action(GameAction::MoveLeft);
            game.apply_action(GameAction::MoveRight);
            game.apply_action(GameAction::Rotate);
        }

        // Undisturbed pieces stack in the middle columns and never complete a
        // row, so this covers lock, spawn, game over and restart.
        for _ in 0..40 {
            game.apply_action(GameAction::HardDrop);
            game.tick(16);
            if game.game_over() {
                game.apply_action(GameAction::Restart);
            }
        }

        for _ in 0..10 {
            game.snapshot_into(&mut snap);
            view.render_into(&snap, viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
