use lib::chess::{Board, Color, Ledger, MoveKind, Role, Square};
use lib::rules::{Resolver, Snapshot};
use test_strategy::proptest;

fn perft(resolver: &Resolver, board: &Board, turn: Color, depth: u8) -> usize {
    let moves = resolver.resolve(board, turn).moves.into_values().flatten();

    match depth {
        0 => 1,
        1 => moves.count(),
        d => moves
            .map(|m| {
                let mut next = board.clone();
                next.apply_move(m);
                if m.kind() == MoveKind::Promotion {
                    next.promote(m.whither(), Role::Queen);
                }

                next.decrement_lifetimes();
                perft(resolver, &next, !turn, d - 1)
            })
            .sum(),
    }
}

fn position(placement: [&str; 8], tracked: &[&str]) -> Board {
    let mut ledger = Ledger::default();
    for sq in tracked {
        ledger.track(sq.parse::<Square>().unwrap());
    }

    let snapshot = Snapshot {
        placement: placement.map(String::from).into(),
        ledger,
        turn: Color::White,
        halfturns: 0,
    };

    snapshot.board().unwrap()
}

#[cfg(not(tarpaulin))]
#[proptest(cases = 1)]
fn perft_expands_expected_number_of_nodes() {
    let resolver = Resolver::default();

    // https://www.chessprogramming.org/Perft_Results#Initial_Position
    assert_eq!(perft(&resolver, &Board::default(), Color::White, 4), 197281);

    // https://www.chessprogramming.org/Perft_Results#Position_2
    let board = position(
        [
            "r...k..r", "p.ppqpb.", "bn..pnp.", "...PN...", ".p..P...", "..N..Q.p", "PPPBBPPP",
            "R...K..R",
        ],
        &["a1", "e1", "h1", "a8", "e8", "h8"],
    );

    assert_eq!(perft(&resolver, &board, Color::White, 3), 97862);

    // https://www.chessprogramming.org/Perft_Results#Position_3
    let board = position(
        [
            "........", "..p.....", "...p....", "KP.....r", ".R...p.k", "........", "....P.P.",
            "........",
        ],
        &[],
    );

    assert_eq!(perft(&resolver, &board, Color::White, 4), 43238);
}
