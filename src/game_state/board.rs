//! 8x8 piece grid.
//!
//! `Board` is plain data: a square either holds one piece or nothing. It is
//! `Clone` so the legality filter can simulate moves on a scratch copy.

use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::{back_row, pawn_start_row, BACK_RANK};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // [row - 1][col - 1]
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    #[inline]
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting arrangement, light on rows 1-2.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for color in [Color::Light, Color::Dark] {
            for (col_index, kind) in BACK_RANK.iter().enumerate() {
                let col = col_index as u8 + 1;
                board.place(back_row(color), col, Piece::new(color, *kind));
                board.place(pawn_start_row(color), col, Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<Piece> {
        self.squares[position.row() as usize - 1][position.col() as usize - 1]
    }

    /// Puts `piece` on `position`, replacing whatever was there.
    #[inline]
    pub fn set_piece(&mut self, position: Position, piece: Option<Piece>) {
        self.squares[position.row() as usize - 1][position.col() as usize - 1] = piece;
    }

    /// Empties `position` and returns the piece that was on it.
    #[inline]
    pub fn clear(&mut self, position: Position) -> Option<Piece> {
        self.squares[position.row() as usize - 1][position.col() as usize - 1].take()
    }

    /// Every occupied square with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|position| self.piece_at(position).map(|piece| (position, piece)))
    }

    /// Occupied squares of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }

    fn place(&mut self, row: u8, col: u8, piece: Piece) {
        self.squares[row as usize - 1][col as usize - 1] = Some(piece);
    }
}
