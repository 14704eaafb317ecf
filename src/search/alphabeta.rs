use crate::board::position::{Color, Move, Piece, Position};
use crate::eval::evaluate::{evaluate, Score, DRAW_VALUE, MATE_VALUE};
use crate::eval::material::piece_value;
use crate::movegen::legal_moves::generate_legal_moves;
use crate::search::transposition::{position_key, TranspositionCache, DEFAULT_CACHE_SIZE_MB};

const INFINITY: Score = 1_000_000;

/// Result of asking for a best move: either a move, or the game is already
/// decided for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Best(Move),
    WhiteWins,
    Draw,
    BlackWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Stalemate,
    Checkmate,
}

/// Terminal state of the side to move.
pub fn game_status(pos: &Position) -> GameStatus {
    if !generate_legal_moves(pos).is_empty() {
        GameStatus::InProgress
    } else if pos.in_check() {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

/// Picks the best move for the side to move by bounded alpha-beta search.
/// White maximizes and black minimizes the white-perspective evaluation.
/// The transposition cache lives and dies with this call.
pub fn best_move(pos: &mut Position, depth: u32) -> SearchOutcome {
    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        return if pos.in_check() {
            match pos.side_to_move {
                Color::White => SearchOutcome::BlackWins,
                Color::Black => SearchOutcome::WhiteWins,
            }
        } else {
            SearchOutcome::Draw
        };
    }

    let mut cache = TranspositionCache::new(DEFAULT_CACHE_SIZE_MB);
    let maximizing = pos.side_to_move == Color::White;
    let mut best_of_white = -INFINITY;
    let mut best_of_black = INFINITY;
    let mut best = moves[0];
    let mut best_value = if maximizing { -INFINITY } else { INFINITY };

    for mv in moves {
        let undo = pos.make(mv);
        let value = search(pos, depth.saturating_sub(1), best_of_white, best_of_black, &mut cache);
        pos.unmake(undo);
        if maximizing {
            if value > best_value {
                best_value = value;
                best = mv;
            }
            best_of_white = best_of_white.max(value);
        } else {
            if value < best_value {
                best_value = value;
                best = mv;
            }
            best_of_black = best_of_black.min(value);
        }
    }

    SearchOutcome::Best(best)
}

/// One node of the tree walk. `best_of_white`/`best_of_black` are the
/// alpha-beta window; the branch is abandoned once they cross.
fn search(
    pos: &mut Position,
    depth: u32,
    mut best_of_white: Score,
    mut best_of_black: Score,
    cache: &mut TranspositionCache,
) -> Score {
    let moves = generate_legal_moves(pos);
    if moves.is_empty() {
        // Mate scores carry the sign of the mated side so the parent picks
        // against them.
        return if pos.in_check() {
            match pos.side_to_move {
                Color::White => -MATE_VALUE,
                Color::Black => MATE_VALUE,
            }
        } else {
            DRAW_VALUE
        };
    }

    let key = position_key(pos);
    if let Some(value) = cache.probe(key) {
        return value;
    }

    if depth == 0 {
        return quiescence(pos);
    }

    let maximizing = pos.side_to_move == Color::White;
    let mut value = if maximizing { -INFINITY } else { INFINITY };
    for mv in moves {
        let undo = pos.make(mv);
        let child = search(pos, depth - 1, best_of_white, best_of_black, cache);
        pos.unmake(undo);
        if maximizing {
            value = value.max(child);
            best_of_white = best_of_white.max(child);
        } else {
            value = value.min(child);
            best_of_black = best_of_black.min(child);
        }
        if best_of_black <= best_of_white {
            break;
        }
    }

    cache.store(key, value);
    value
}

/// Evaluation of a leaf that refuses to misjudge a position mid-exchange.
/// If the opponent's just-moved piece stands unattacked the position is
/// quiet and the static evaluation is returned. Otherwise the cheapest
/// capture of that square is played and the question asked again, except
/// that an attacker worth more than its victim which would itself hang is
/// not played at all.
fn quiescence(pos: &mut Position) -> Score {
    let last = pos.last_move;
    if last == Move::NULL {
        return evaluate(pos);
    }
    let target = last.to();
    if !pos.is_square_attacked_by_mover(pos.all_occupancy(), target) {
        return evaluate(pos);
    }

    let victim_value = piece_value(pos.piece_at[target as usize]);
    let mut cheapest: Option<Move> = None;
    let mut cheapest_value = INFINITY;
    for mv in generate_legal_moves(pos) {
        let captures_target = mv.to() == target || mv.is_en_passant();
        if !captures_target {
            continue;
        }
        let attacker_value = piece_value(pos.piece_at[mv.from() as usize]);
        if attacker_value < cheapest_value {
            cheapest_value = attacker_value;
            cheapest = Some(mv);
        }
    }
    // Attacked, but every capture of the square is illegal (a pinned
    // attacker): nothing to resolve.
    let Some(reply) = cheapest else {
        return evaluate(pos);
    };

    let undo = pos.make(reply);
    // A heavier piece capturing a lighter one into a defended square loses
    // the exchange; the recapture would not be played.
    if cheapest_value > victim_value
        && pos.is_square_attacked_by_mover(pos.all_occupancy(), reply.to())
    {
        pos.unmake(undo);
        return evaluate(pos);
    }
    let value = quiescence(pos);
    pos.unmake(undo);
    value
}
