//! Canonical chess-rule constants.
//!
//! This module stores static rule-related literals such as the standard
//! starting position FEN and the pawn start/promotion rows used by move
//! generation.

use crate::game_state::chess_types::{Color, PieceKind};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Back-rank order from column 1 to column 8.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Pieces a pawn may become on its promotion row, in emission order.
pub const PROMOTION_CHOICES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[inline]
pub const fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::Light => 1,
        Color::Dark => -1,
    }
}

#[inline]
pub const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::Light => 2,
        Color::Dark => 7,
    }
}

#[inline]
pub const fn promotion_row(color: Color) -> u8 {
    match color {
        Color::Light => 8,
        Color::Dark => 1,
    }
}

#[inline]
pub const fn back_row(color: Color) -> u8 {
    match color {
        Color::Light => 1,
        Color::Dark => 8,
    }
}
