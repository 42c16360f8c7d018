//! Tetromino tests - shape table, spawn placement and clockwise rotation

use zen_tetris::core::tetromino::base_shape;
use zen_tetris::core::Tetromino;
use zen_tetris::types::PieceKind;

// ============== Shape Tests ==============

#[test]
fn test_spawn_shapes() {
    assert_eq!(
        base_shape(PieceKind::I).offsets().as_slice(),
        &[(0, 0), (1, 0), (2, 0), (3, 0)]
    );
    assert_eq!(
        base_shape(PieceKind::O).offsets().as_slice(),
        &[(0, 0), (1, 0), (0, 1), (1, 1)]
    );
    assert_eq!(
        base_shape(PieceKind::T).offsets().as_slice(),
        &[(1, 0), (0, 1), (1, 1), (2, 1)]
    );
    assert_eq!(
        base_shape(PieceKind::S).offsets().as_slice(),
        &[(1, 0), (2, 0), (0, 1), (1, 1)]
    );
    assert_eq!(
        base_shape(PieceKind::Z).offsets().as_slice(),
        &[(0, 0), (1, 0), (1, 1), (2, 1)]
    );
    assert_eq!(
        base_shape(PieceKind::J).offsets().as_slice(),
        &[(0, 0), (0, 1), (1, 1), (2, 1)]
    );
    assert_eq!(
        base_shape(PieceKind::L).offsets().as_slice(),
        &[(2, 0), (0, 1), (1, 1), (2, 1)]
    );
}

#[test]
fn test_every_piece_has_four_distinct_blocks() {
    for kind in PieceKind::ALL {
        let mut piece = Tetromino::spawned(kind);
        for _ in 0..4 {
            let mut blocks = piece.blocks().to_vec();
            blocks.sort();
            blocks.dedup();
            assert_eq!(blocks.len(), 4, "{:?}", kind);
            piece.rotate();
        }
    }
}

#[test]
fn test_spawn_dimensions() {
    let dims = |k| {
        let s = base_shape(k);
        (s.rows(), s.cols())
    };
    assert_eq!(dims(PieceKind::I), (1, 4));
    assert_eq!(dims(PieceKind::O), (2, 2));
    for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
        assert_eq!(dims(kind), (2, 3));
    }
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_is_centered_on_row_zero() {
    assert_eq!(Tetromino::spawned(PieceKind::I).x, 3);
    assert_eq!(Tetromino::spawned(PieceKind::O).x, 4);
    assert_eq!(Tetromino::spawned(PieceKind::T).x, 4);
    for kind in PieceKind::ALL {
        assert_eq!(Tetromino::spawned(kind).y, 0);
    }
}

#[test]
fn test_piece_color_follows_kind() {
    for kind in PieceKind::ALL {
        assert_eq!(Tetromino::new(kind).color(), kind.color());
    }
    assert_eq!(PieceKind::I.color().to_array(), [139, 115, 85]);
    assert_eq!(PieceKind::O.color().to_array(), [210, 180, 140]);
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_swaps_dimensions() {
    let mut piece = Tetromino::new(PieceKind::I);
    piece.rotate();
    assert_eq!((piece.shape().rows(), piece.shape().cols()), (4, 1));
    assert_eq!(piece.shape().offsets().as_slice(), &[(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_t_rotation_sequence() {
    let mut piece = Tetromino::new(PieceKind::T);

    piece.rotate();
    assert_eq!(piece.shape().offsets().as_slice(), &[(0, 0), (0, 1), (1, 1), (0, 2)]);

    piece.rotate();
    assert_eq!(piece.shape().offsets().as_slice(), &[(0, 0), (1, 0), (2, 0), (1, 1)]);

    piece.rotate();
    assert_eq!(piece.shape().offsets().as_slice(), &[(1, 0), (0, 1), (1, 1), (1, 2)]);
}

#[test]
fn test_four_rotations_restore_the_matrix() {
    for kind in PieceKind::ALL {
        let original = Tetromino::new(kind);
        let mut piece = original;
        for _ in 0..4 {
            piece.rotate();
        }
        assert_eq!(piece, original, "{:?}", kind);
    }
}

#[test]
fn test_o_rotation_is_identity() {
    let original = Tetromino::new(PieceKind::O);
    let mut piece = original;
    piece.rotate();
    assert_eq!(piece.shape(), original.shape());
}

#[test]
fn test_rotation_keeps_anchor() {
    let mut piece = Tetromino::spawned(PieceKind::L);
    piece.shift(1, 5);
    let (x, y) = (piece.x, piece.y);
    piece.rotate();
    assert_eq!((piece.x, piece.y), (x, y));
}
