use crate::board::bitboard::pop_lsb;
use crate::board::position::{Piece, Position};
use crate::eval::material::piece_value;
use crate::eval::pst::{black_bonus, white_bonus};

pub type Score = i32;

/// Mated-side score magnitude. Larger than any material total a board can
/// hold, so a forced mate always outranks a won position.
pub const MATE_VALUE: Score = 100_000;
pub const DRAW_VALUE: Score = 0;

/// Static evaluation, positive when white stands better: material plus the
/// positional tables, summed over all pieces. Black reads its table through
/// the mirror.
pub fn evaluate(pos: &Position) -> Score {
    let mut total = 0;
    for kind in Piece::ALL {
        let value = piece_value(kind);

        let mut white = pos.white_bb(kind);
        while white != 0 {
            let sq = pop_lsb(&mut white);
            total += value + white_bonus(kind, sq);
        }

        let mut black = pos.black_bb(kind);
        while black != 0 {
            let sq = pop_lsb(&mut black);
            total -= value + black_bonus(kind, sq);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::bitboard::{square_mask, EMPTY};
    use crate::board::position::{CastleRights, Color, Move};

    #[test]
    fn test_startpos_is_balanced() {
        assert_eq!(evaluate(&Position::startpos()), 0);
    }

    #[test]
    fn test_evaluation_ignores_side_to_move_sign() {
        // The score is fixed from white's perspective; flipping the mover
        // changes nothing.
        let mut pos = Position::startpos();
        pos.make(Move::new(12, 28)); // e4
        let after_e4 = evaluate(&pos);
        pos.make(Move::new(52, 36)); // e5
        let after_e5 = evaluate(&pos);
        // e4/e5 occupy mirrored central squares: back to balance.
        assert_eq!(after_e5, 0);
        assert!(after_e4 > 0, "the centre push should please white");
    }

    #[test]
    fn test_material_dominates_position() {
        // White is a knight up; no placement of the remaining pieces can
        // flip the sign.
        let mut white = [EMPTY; 6];
        white[Piece::King.index()] = square_mask(0);
        white[Piece::Knight.index()] = square_mask(7); // worst square available
        let mut black = [EMPTY; 6];
        black[Piece::King.index()] = square_mask(59); // best black king square
        let pos = Position::from_bitboards(
            white,
            black,
            [CastleRights::None, CastleRights::None],
            Color::White,
            Move::NULL,
        );
        assert!(evaluate(&pos) > 100);
    }

    #[test]
    fn test_capture_shifts_material_balance() {
        let mut pos = Position::startpos();
        pos.make(Move::new(12, 28)); // e4
        pos.make(Move::new(51, 35)); // d5
        pos.make(Move::new(28, 35)); // exd5
        assert!(evaluate(&pos) >= 100, "white is a clean pawn up");
    }

    #[test]
    fn test_mate_value_outranks_any_material() {
        // Nine queens and change stay below MATE_VALUE.
        assert!(9 * 900 + 2 * 500 + 4 * 300 + 10_000 < MATE_VALUE);
    }
}
