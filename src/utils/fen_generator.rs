//! Game-to-FEN serializer.
//!
//! Only placement and side to move carry information here; castling and
//! en-passant fields are always `-` and the clocks are fixed at `0 1`.

use crate::game_state::chess_types::{Color, Game, Piece, PieceKind, Position};

pub fn generate_fen(game: &Game) -> String {
    let side_to_move = match game.turn {
        Color::Light => "w",
        Color::Dark => "b",
    };
    format!("{} {} - - 0 1", generate_board_field(game), side_to_move)
}

fn generate_board_field(game: &Game) -> String {
    let mut out = String::new();

    for row in (1..=8i8).rev() {
        let mut empty_count = 0u8;

        for col in 1..=8i8 {
            let piece = Position::new(row, col)
                .ok()
                .and_then(|position| game.board.piece_at(position));
            if let Some(piece) = piece {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece_to_fen_char(piece));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row > 1 {
            out.push('/');
        }
    }

    out
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match piece.color {
        Color::Light => base.to_ascii_uppercase(),
        Color::Dark => base,
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{ChessMove, Game, Position};

    #[test]
    fn new_game_matches_starting_fen() {
        assert_eq!(generate_fen(&Game::new_game()), STARTING_POSITION_FEN);
    }

    #[test]
    fn fen_tracks_moves_and_side_to_move() {
        let mut game = Game::new_game();
        game.make_move(ChessMove::new(
            Position::new(2, 5).unwrap(),
            Position::new(4, 5).unwrap(),
            None,
        ))
        .unwrap();
        assert_eq!(
            generate_fen(&game),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
        );
    }

    #[test]
    fn parsed_position_writes_back_unchanged() {
        let fen = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
        assert_eq!(Game::from_fen(fen).unwrap().get_fen(), fen);
    }
}
