//! Crate root module declarations for the Plum Chess match server.
//!
//! This file exposes the rules engine (game state, move generation, FEN
//! helpers), the live session layer, and the TCP server so the binary,
//! tests, and benches can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod move_generator;
    pub mod perft;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
}

pub mod session {
    pub mod collaborators;
    pub mod connection_registry;
    pub mod errors;
    pub mod handler;
    pub mod memory_store;
    pub mod protocol;
    pub mod testing;
}

pub mod server {
    pub mod config;
    pub mod transport;
}
