use fourline::game::board::Board;
use fourline::game::core::{Move, Player};
use fourline::search::tree::{NodeId, Tree};
use fourline::search::{self, Budget, Config, Search};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn config(iterations: u64) -> Config {
    Config {
        budget: Budget::iterations(iterations),
        ..Config::default()
    }
}

fn best_move(notation: &str, iterations: u64, seed: u64) -> Move {
    let board = Board::try_from(notation).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    search::compute_move(&board, &config(iterations), &mut rng).unwrap()
}

fn check_invariants(tree: &Tree) {
    for (id, node) in tree.nodes() {
        assert!(node.wins() <= node.visits());
        let children = node.children().map(|child| tree.get(child)).collect::<Vec<_>>();
        let child_visits: u64 = children.iter().map(|child| child.visits()).sum();
        let child_wins: u64 = children.iter().map(|child| child.wins()).sum();
        for child in &children {
            assert_eq!(child.parent(), Some(id));
            assert_eq!(child.player(), node.board().to_move());
        }

        if node.board().outcome().is_terminal() {
            assert!(children.is_empty());
            assert!(node.visits() >= 1);
        } else if id == Tree::ROOT {
            assert_eq!(node.visits(), child_visits);
            assert_eq!(node.wins(), child_wins);
        } else {
            // One playout started from the node itself when it was created.
            assert_eq!(node.visits(), child_visits + 1);
            assert!(node.wins() - child_wins <= 1);
        }
    }
}

#[test]
fn single_legal_move() {
    let notation = "XOXOXO./XOXOXO./OXOXOX./OXOXOX./XOXOXO./XOXOXO. O";
    for seed in 0..5 {
        assert_eq!(best_move(notation, 50, seed), Move::new(6).unwrap());
    }
}

#[test]
fn takes_immediate_win() {
    assert_eq!(
        best_move("......./......./......./......./XXX..../OOO.... O", 2_000, 1),
        Move::new(3).unwrap()
    );
    // The searching player does not have to be the computer.
    assert_eq!(
        best_move("......./......./......./......./OOO..../XXX.... X", 2_000, 1),
        Move::new(3).unwrap()
    );
}

#[test]
fn blocks_immediate_loss() {
    assert_eq!(
        best_move("......./......./......./......./O....../XXX..O. O", 5_000, 3),
        Move::new(3).unwrap()
    );
}

#[test]
fn board_is_not_modified() {
    let board = Board::try_from("......./......./......./......./..X..../..OX... O").unwrap();
    let copy = board.clone();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let _ = search::compute_move(&board, &config(500), &mut rng).unwrap();
    assert_eq!(board, copy);
}

#[test]
fn finished_game() {
    let board = Board::try_from("......./......./......./......./XXX..../OOOO... X").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let error = search::compute_move(&board, &config(10), &mut rng).unwrap_err();
    assert!(error.to_string().contains("the game is over"), "{error}");

    let draw = Board::try_from("XOXOXOX/XOXOXOX/OXOXOXO/OXOXOXO/XOXOXOX/XOXOXOX X").unwrap();
    assert!(search::compute_move(&draw, &config(10), &mut rng).is_err());
}

#[test]
fn reproducible_with_seed() {
    let run = |seed| {
        let mut search = Search::new(Board::initial(Player::Computer), config(1_000));
        let result = search.run(&mut ChaCha20Rng::seed_from_u64(seed));
        let stats = search
            .tree()
            .nodes()
            .map(|(_, node)| (node.visits(), node.wins()))
            .collect::<Vec<_>>();
        (result.best_move, result.iterations, result.nodes, stats)
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn tree_statistics_are_consistent() {
    for (notation, iterations) in [
        ("......./......./......./......./......./....... O", 3_000),
        ("......./......./......./......./XXX..../OOO.... O", 1_000),
        ("XOXOXO./XOXOXO./OXOXOX./OXOXOX./XOXOXO./XOXOXO. X", 500),
    ] {
        let board = Board::try_from(notation).unwrap();
        let mut search = Search::new(board, config(iterations));
        let result = search.run(&mut ChaCha20Rng::seed_from_u64(iterations));
        assert_eq!(result.iterations, iterations);
        assert_eq!(search.tree().get(Tree::ROOT).visits(), iterations);
        assert_eq!(result.nodes, search.tree().len());
        check_invariants(search.tree());
    }
}

#[test]
fn at_least_one_iteration() {
    let mut search = Search::new(
        Board::initial(Player::Human),
        Config {
            budget: Budget::Time(std::time::Duration::ZERO),
            ..Config::default()
        },
    );
    let result = search.run(&mut ChaCha20Rng::seed_from_u64(0));
    assert_eq!(result.iterations, 1);
    assert_eq!(search.tree().len(), 2);
    let expanded: Vec<NodeId> = search.tree().get(Tree::ROOT).children().collect();
    assert_eq!(expanded.len(), 1);
    assert_eq!(
        search.tree().get(expanded[0]).last_move(),
        Some(result.best_move)
    );
}
