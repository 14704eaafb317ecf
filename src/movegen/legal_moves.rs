use crate::board::bitboard::square_mask;
use crate::board::position::{Color, Move, Position};
use crate::movegen::moves::{generate_pseudo_legal, MAX_MOVES};

/// All legal moves for the side to move: the pseudo-legal set filtered by
/// the own-king-not-left-in-check rule.
///
/// The filter simulates only the occupancy change of each move (clear the
/// origin, set the target, and for en passant clear the captured pawn) and
/// asks whether the king's post-move square is attacked under it. The enemy
/// kind boards of the real position are consulted unchanged; a capture only
/// removes an attacker, so the stale boards can at most report phantom
/// attacks, never hide real ones. The filter never calls `unmake`.
pub fn generate_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(MAX_MOVES);
    generate_pseudo_legal(pos, &mut moves);

    let king_sq = pos.king_square();
    if king_sq >= 64 {
        // No king to protect; nothing can be filtered meaningfully.
        return moves;
    }
    let occupancy = pos.all_occupancy();
    let mover = pos.side_to_move;

    moves.retain(|&mv| {
        let from = mv.from();
        let to = mv.to();
        let mut simulated = (occupancy & !square_mask(from)) | square_mask(to);
        if mv.is_en_passant() {
            let victim_sq = match mover {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            simulated &= !square_mask(victim_sq);
        }
        let king_after = if from == king_sq { to } else { king_sq };
        !pos.is_square_attacked(simulated, king_after)
    });
    moves
}

/// Counts the leaf nodes reachable in exactly `depth` plies. The standard
/// move-generator diagnostic.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let undo = pos.make(mv);
        nodes += perft(pos, depth - 1);
        pos.unmake(undo);
    }
    nodes
}
