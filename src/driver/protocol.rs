use anyhow::{bail, ensure, Context, Result};
use std::fmt::Write as _;

use crate::board::bitboard::{square_mask, EMPTY};
use crate::board::position::{CastleRights, Color, Move, Piece, Position};
use crate::search::alphabeta::{best_move, game_status, GameStatus, SearchOutcome};

/// Fixed search depth for mode 1.
const SEARCH_DEPTH: u32 = 4;

const MODE_BEST_MOVE: i64 = 1;
const MODE_GAME_STATUS: i64 = 2;

const STATUS_IN_PROGRESS: i64 = 100;
const STATUS_STALEMATE: i64 = 0;
const STATUS_CHECKMATED: i64 = -1;

const BOARD_VALUES: usize = 64;
const METADATA_VALUES: usize = 6;
const REQUEST_VALUES: usize = 1 + BOARD_VALUES + METADATA_VALUES;

/// Reads one request from standard input, writes the response to standard
/// output. Malformed input surfaces as an error and a non-zero exit.
pub fn run() -> Result<()> {
    use std::io::Read;
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading the request from stdin")?;
    let response = handle_request(&input)?;
    println!("{response}");
    Ok(())
}

/// The whole protocol: a mode value, 64 board values in row-major order
/// with black's back rank first (positive = white, magnitudes 1..6 =
/// pawn..king), then the metadata row [castle-black, castle-white,
/// side-to-move, last-to-row, last-to-col, last-was-double-push].
pub fn handle_request(input: &str) -> Result<String> {
    let values: Vec<i64> = input
        .split_whitespace()
        .map(|token| token.parse::<i64>().with_context(|| format!("bad token {token:?}")))
        .collect::<Result<_>>()?;
    ensure!(
        values.len() == REQUEST_VALUES,
        "expected {REQUEST_VALUES} values, got {}",
        values.len()
    );

    let pos = parse_position(&values[1..])?;
    match values[0] {
        MODE_BEST_MOVE => best_move_response(pos),
        MODE_GAME_STATUS => Ok(status_response(&pos).to_string()),
        mode => bail!("unknown mode {mode}"),
    }
}

fn best_move_response(mut pos: Position) -> Result<String> {
    match best_move(&mut pos, SEARCH_DEPTH) {
        SearchOutcome::Best(mv) => {
            pos.make(mv);
            Ok(serialize_position(&pos))
        }
        // No legal moves: a bare integer instead of a board — the mated
        // side's value, or zero for stalemate.
        SearchOutcome::Draw => Ok(STATUS_STALEMATE.to_string()),
        SearchOutcome::WhiteWins | SearchOutcome::BlackWins => {
            Ok(side_value(pos.side_to_move).to_string())
        }
    }
}

fn status_response(pos: &Position) -> i64 {
    match game_status(pos) {
        GameStatus::InProgress => STATUS_IN_PROGRESS,
        GameStatus::Stalemate => STATUS_STALEMATE,
        GameStatus::Checkmate => STATUS_CHECKMATED,
    }
}

fn parse_position(values: &[i64]) -> Result<Position> {
    let mut white = [EMPTY; 6];
    let mut black = [EMPTY; 6];
    for row in 0..8usize {
        for col in 0..8usize {
            let value = values[row * 8 + col];
            if value == 0 {
                continue;
            }
            let kind = piece_from_magnitude(value.unsigned_abs())
                .with_context(|| format!("bad piece value {value} at row {row}, col {col}"))?;
            let boards = if value > 0 { &mut white } else { &mut black };
            boards[kind.index()] |= square_mask(board_square(row, col));
        }
    }
    ensure!(
        white[Piece::King.index()].count_ones() == 1,
        "white must have exactly one king"
    );
    ensure!(
        black[Piece::King.index()].count_ones() == 1,
        "black must have exactly one king"
    );

    let metadata = &values[BOARD_VALUES..];
    let castle_black = castle_rights(metadata[0]).context("castling state (black)")?;
    let castle_white = castle_rights(metadata[1]).context("castling state (white)")?;
    let side_to_move = match metadata[2] {
        1 => Color::White,
        -1 => Color::Black,
        other => bail!("bad side-to-move {other}"),
    };
    let last_move = parse_last_move(metadata, side_to_move)?;

    let (friendly, enemy) = match side_to_move {
        Color::White => (white, black),
        Color::Black => (black, white),
    };
    Ok(Position::from_bitboards(
        friendly,
        enemy,
        [castle_white, castle_black],
        side_to_move,
        last_move,
    ))
}

/// Only a fresh double push matters to the engine (the en-passant window);
/// everything else about the previous move is irrelevant and parses to the
/// null move.
fn parse_last_move(metadata: &[i64], side_to_move: Color) -> Result<Move> {
    let (row, col, double_push) = (metadata[3], metadata[4], metadata[5]);
    ensure!(matches!(double_push, 0 | 1), "bad double-push flag {double_push}");
    if double_push == 0 {
        return Ok(Move::NULL);
    }
    ensure!(
        (0..8).contains(&row) && (0..8).contains(&col),
        "double push with target off the board ({row}, {col})"
    );
    let to = board_square(row as usize, col as usize);
    // The pusher was the side that just moved; its double push can only
    // have landed on its own fourth rank.
    let from = match side_to_move.opposite() {
        Color::White => {
            ensure!((24..32).contains(&to), "white double push cannot land on {to}");
            to - 16
        }
        Color::Black => {
            ensure!((32..40).contains(&to), "black double push cannot land on {to}");
            to + 16
        }
    };
    Ok(Move::new(from, to))
}

fn serialize_position(pos: &Position) -> String {
    let mut out = String::with_capacity(256);
    for row in 0..8usize {
        for col in 0..8usize {
            let sq = board_square(row, col);
            if col > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", square_value(pos, sq));
        }
        out.push('\n');
    }

    let last = pos.last_move;
    let (last_row, last_col, double_push) = if last == Move::NULL {
        (-1, -1, 0)
    } else {
        let to = last.to();
        let was_double = pos.piece_at[to as usize] == Piece::Pawn && to.abs_diff(last.from()) == 16;
        (7 - (to >> 3) as i64, (to & 7) as i64, i64::from(was_double))
    };
    let _ = write!(
        out,
        "{} {} {} {} {} {}",
        pos.castling[Color::Black as usize] as u8,
        pos.castling[Color::White as usize] as u8,
        side_value(pos.side_to_move),
        last_row,
        last_col,
        double_push
    );
    out
}

/// Row 0 is black's back rank; column 0 is file a.
#[inline(always)]
fn board_square(row: usize, col: usize) -> u8 {
    ((7 - row) * 8 + col) as u8
}

fn square_value(pos: &Position, sq: u8) -> i64 {
    let kind = pos.piece_at[sq as usize];
    if kind == Piece::Empty {
        return 0;
    }
    let magnitude = kind as i64;
    if pos.white_bb(kind) & square_mask(sq) != 0 {
        magnitude
    } else {
        -magnitude
    }
}

fn piece_from_magnitude(magnitude: u64) -> Option<Piece> {
    match magnitude {
        1 => Some(Piece::Pawn),
        2 => Some(Piece::Knight),
        3 => Some(Piece::Bishop),
        4 => Some(Piece::Rook),
        5 => Some(Piece::Queen),
        6 => Some(Piece::King),
        _ => None,
    }
}

fn castle_rights(raw: i64) -> Result<CastleRights> {
    u8::try_from(raw)
        .ok()
        .and_then(CastleRights::from_raw)
        .with_context(|| format!("bad castling state {raw}"))
}

const fn side_value(color: Color) -> i64 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}
