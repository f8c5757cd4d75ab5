//! FEN-to-Game parser.
//!
//! Reads the piece placement and side-to-move fields. Up to four trailing
//! fields (castling, en passant, clocks) are accepted and ignored.

use crate::errors::ChessErrors;
use crate::game_state::chess_types::{Board, Color, Game, Piece, PieceKind, Position};

pub fn parse_fen(fen: &str) -> Result<Game, ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().unwrap_or("w");

    if parts.count() > 4 {
        return Err(invalid("FEN has extra trailing fields"));
    }

    let board = parse_board(board_part)?;
    let turn = parse_side_to_move(side_part)?;
    Ok(Game::from_board(board, turn))
}

fn parse_board(board_part: &str) -> Result<Board, ChessErrors> {
    let rows: Vec<&str> = board_part.split('/').collect();
    if rows.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    let mut board = Board::empty();
    for (fen_row_idx, row_str) in rows.iter().enumerate() {
        let row = 8 - fen_row_idx as i8;
        let mut col = 1i8;

        for ch in row_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                col += empty_count as i8;
                if col > 9 {
                    return Err(invalid(&format!("rank {row} has too many files")));
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
            let position = Position::new(row, col)
                .map_err(|_| invalid(&format!("rank {row} has too many files")))?;
            board.set_piece(position, Some(piece));
            col += 1;
        }

        if col != 9 {
            return Err(invalid(&format!("rank {row} does not sum to 8 files")));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(&format!("invalid side-to-move field: {side_part}"))),
    }
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}

fn invalid(reason: &str) -> ChessErrors {
    ChessErrors::InvalidFen(reason.to_owned())
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ChessErrors;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Board, Color};

    #[test]
    fn parse_starting_fen() {
        let game = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(game.turn, Color::Light);
        assert_eq!(game.board, Board::starting());
        assert!(!game.over);
    }

    #[test]
    fn placement_only_defaults_to_light() {
        let game = parse_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(game.turn, Color::Light);
        assert_eq!(game.board.pieces().count(), 2);
    }

    #[test]
    fn rejects_bad_layouts() {
        for fen in [
            "8/8/8/8/8/8/8 w",
            "9/8/8/8/8/8/8/8 w",
            "ppppppppp/8/8/8/8/8/8/8 w",
            "7/8/8/8/8/8/8/8 w",
            "x7/8/8/8/8/8/8/8 w",
            "8/8/8/8/8/8/8/8 z",
            "8888888888888888/8/8/8/8/8/8/8 w",
            "44444444/8/8/8/8/8/8/8 w",
        ] {
            assert!(matches!(parse_fen(fen), Err(ChessErrors::InvalidFen(_))), "{fen}");
        }
    }
}
