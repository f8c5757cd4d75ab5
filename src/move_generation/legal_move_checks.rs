use crate::game_state::chess_types::{Board, Color, Position};
use crate::move_generation::move_generator::generate_pseudo_legal_moves;

/// True if any `attacker_color` piece has a pseudo-legal move ending on
/// `square`.
pub fn is_square_attacked(board: &Board, square: Position, attacker_color: Color) -> bool {
    board.pieces_of(attacker_color).any(|(from, _)| {
        generate_pseudo_legal_moves(board, from)
            .iter()
            .any(|mv| mv.end == square)
    })
}

/// A color without a king on the board is never in check.
#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.find_king(color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked};
    use crate::game_state::chess_types::{Board, Color, Piece, PieceKind, Position};

    fn sq(row: i8, col: i8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn start_position_has_no_check() {
        let board = Board::starting();
        assert!(!is_king_in_check(&board, Color::Light));
        assert!(!is_king_in_check(&board, Color::Dark));
    }

    #[test]
    fn rook_on_open_file_checks_king() {
        let mut board = Board::empty();
        board.set_piece(sq(1, 5), Some(Piece::new(Color::Light, PieceKind::King)));
        board.set_piece(sq(8, 5), Some(Piece::new(Color::Dark, PieceKind::Rook)));
        assert!(is_king_in_check(&board, Color::Light));

        board.set_piece(sq(4, 5), Some(Piece::new(Color::Light, PieceKind::Bishop)));
        assert!(!is_king_in_check(&board, Color::Light));
    }

    #[test]
    fn pawn_pushes_do_not_attack() {
        let mut board = Board::empty();
        board.set_piece(sq(4, 4), Some(Piece::new(Color::Dark, PieceKind::Pawn)));
        assert!(!is_square_attacked(&board, sq(3, 4), Color::Dark));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let mut board = Board::empty();
        board.set_piece(sq(8, 8), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert!(!is_king_in_check(&board, Color::Light));
    }
}
