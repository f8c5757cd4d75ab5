//! Value types shared by the board, move generation and the wire protocol.
//!
//! Every type here is a small `Copy` value. Serde encodings are the ones the
//! session protocol puts on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ChessErrors;
use crate::utils::algebraic::position_to_algebraic;

pub use crate::game_state::board::Board;
pub use crate::game_state::game_state::{Game, Outcome};

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Seat name used in player-facing text.
    pub const fn seat_name(self) -> &'static str {
        match self {
            Color::Light => "WHITE",
            Color::Dark => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "light"),
            Color::Dark => write!(f, "dark"),
        }
    }
}

/// Piece kind (color is carried separately by [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "PAWN",
            PieceKind::Knight => "KNIGHT",
            PieceKind::Bishop => "BISHOP",
            PieceKind::Rook => "ROOK",
            PieceKind::Queen => "QUEEN",
            PieceKind::King => "KING",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

/// A board square. Rows and columns are both 1-based, `(1, 1)` is `a1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: i64,
    col: i64,
}

impl TryFrom<RawPosition> for Position {
    type Error = ChessErrors;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match (i8::try_from(raw.row), i8::try_from(raw.col)) {
            (Ok(row), Ok(col)) => Position::new(row, col),
            _ => Err(ChessErrors::InvalidPosition {
                row: raw.row,
                col: raw.col,
            }),
        }
    }
}

impl Position {
    /// Builds a position, rejecting coordinates outside `1..=8`.
    pub fn new(row: i8, col: i8) -> Result<Self, ChessErrors> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(ChessErrors::InvalidPosition {
                row: row.into(),
                col: col.into(),
            })
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Moves the position by a row and column offset. `None` when the result
    /// falls off the board.
    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Position::new(self.row as i8 + d_row, self.col as i8 + d_col).ok()
    }

    /// All 64 squares, row by row starting at `a1`.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&position_to_algebraic(*self))
    }
}

/// A move from one square to another, optionally promoting a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub start: Position,
    pub end: Position,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    #[inline]
    pub const fn new(start: Position, end: Position, promotion: Option<PieceKind>) -> Self {
        Self {
            start,
            end,
            promotion,
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)?;
        if let Some(promotion) = self.promotion {
            write!(f, " promoting to {promotion}")?;
        }
        Ok(())
    }
}
