//! Implements [Monte Carlo Tree Search] (MCTS) with the UCT selection policy.
//!
//! Each iteration consists of four phases:
//!
//! 1. Selection: starting from the root, descend through fully expanded nodes
//!    by picking the child with the highest UCT score for the player to move.
//! 2. Expansion: add one randomly chosen unexpanded move of the selected node
//!    to the tree.
//! 3. Simulation: play a random game from the new node until it is over.
//! 4. Backpropagation: record the result in every node from the new one up to
//!    the root.
//!
//! After the budget runs out, the move of the root child with the highest win
//! rate is played.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::game::board::Board;
use crate::game::core::{Move, Player};
use crate::search::simulation::simulate;
use crate::search::tree::{Node, NodeId, Tree};
use crate::search::{Config, Limiter};

/// Summary of a finished search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// Move to play.
    pub best_move: Move,
    /// Completed iterations, equal to the number of root visits.
    pub iterations: u64,
    /// Wall clock time spent searching.
    pub elapsed: Duration,
    /// Win rate of the chosen move from the searching player's perspective.
    pub win_rate: f64,
    /// Size of the tree.
    pub nodes: usize,
}

/// Search state for a single turn.
pub struct Search {
    tree: Tree,
    config: Config,
    /// The player the search picks a move for. Playout wins are credited to
    /// this player.
    perspective: Player,
}

impl Search {
    /// Starts a new search from `root`. The tree only contains the root until
    /// the first iteration.
    #[must_use]
    pub fn new(root: Board, config: Config) -> Self {
        let perspective = root.to_move();
        Self {
            tree: Tree::new(root),
            config,
            perspective,
        }
    }

    /// Runs iterations until the budget is exhausted and picks the move. At
    /// least one iteration is always completed.
    ///
    /// # Panics
    ///
    /// Panics if the root position is already decided: there is no move to
    /// choose.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SearchResult {
        let limiter = Limiter::new(self.config.budget);
        let mut iterations = 0;
        loop {
            self.iterate(rng);
            iterations += 1;
            if limiter.exhausted(iterations) {
                break;
            }
        }

        let best = self.best_child();
        let best_move = best
            .last_move()
            .expect("children of the root are reached by a move");
        let result = SearchResult {
            best_move,
            iterations,
            elapsed: limiter.timer.elapsed(),
            win_rate: best.win_rate(),
            nodes: self.tree.len(),
        };
        debug!(
            nodes = result.nodes,
            root_visits = self.tree.get(Tree::ROOT).visits(),
            "search tree"
        );
        info!(
            best_move = %result.best_move,
            iterations = result.iterations,
            elapsed_ms = result.elapsed.as_millis(),
            win_rate = result.win_rate,
            "search finished"
        );
        result
    }

    /// Runs one select, expand, simulate and backpropagate cycle.
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let selected = self.select();
        let leaf = self.expand(selected, rng);
        let outcome = simulate(self.tree.get(leaf).board().clone(), rng);
        trace!(
            column = ?self.tree.get(leaf).last_move().map(Move::column),
            %outcome,
            "playout"
        );
        self.tree.backpropagate(leaf, outcome, self.perspective);
    }

    /// The search tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Descends from the root while the current node is not terminal and all
    /// of its moves are expanded.
    fn select(&self) -> NodeId {
        let mut current = Tree::ROOT;
        loop {
            let node = self.tree.get(current);
            let (moves, outcome) = node.board().legal_moves_and_outcome();
            if outcome.is_terminal() || moves.iter().any(|m| node.child(m.column()).is_none()) {
                return current;
            }
            current = self.best_uct_child(node);
        }
    }

    /// Picks the child with the highest UCT score. The exploitation term is
    /// the win rate of the player to move at `node`: the searching player
    /// maximizes its own win rate and the opponent minimizes it. Ties go to
    /// the lowest column.
    #[allow(clippy::cast_precision_loss)]
    fn best_uct_child(&self, node: &Node) -> NodeId {
        let maximizing = node.board().to_move() == self.perspective;
        let parent_visits = (node.visits() as f64).ln();
        let mut best = None;
        for id in node.children() {
            let child = self.tree.get(id);
            let win_rate = child.win_rate();
            let exploitation = if maximizing { win_rate } else { 1.0 - win_rate };
            let exploration = (parent_visits / child.visits() as f64).sqrt();
            let score = self.config.exploration.mul_add(exploration, exploitation);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((id, score));
            }
        }
        let (id, _) = best.expect("fully expanded non-terminal node has children");
        id
    }

    /// Adds a random unexpanded move of `id` to the tree and returns the new
    /// child. A terminal node can not be expanded and is returned as is.
    fn expand<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> NodeId {
        let node = self.tree.get(id);
        let (mut moves, outcome) = node.board().legal_moves_and_outcome();
        if outcome.is_terminal() {
            return id;
        }
        moves.retain(|m| node.child(m.column()).is_none());
        let next_move = *moves
            .choose(rng)
            .expect("selected non-terminal node has an unexpanded move");
        self.tree.add_child(id, next_move)
    }

    /// Root child with the highest win rate, ties go to the lowest column.
    ///
    /// # Panics
    ///
    /// Panics if no child of the root was expanded.
    fn best_child(&self) -> &Node {
        let mut best: Option<&Node> = None;
        for id in self.tree.get(Tree::ROOT).children() {
            let child = self.tree.get(id);
            if best.map_or(true, |best| child.win_rate() > best.win_rate()) {
                best = Some(child);
            }
        }
        best.expect("the search finished without expanding a single move")
    }
}
