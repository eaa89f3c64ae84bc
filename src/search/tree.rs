//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous [`Vec`] and refer to each other through
//! [`NodeId`] indices: a parent owns its children through the arena and a
//! child only keeps the index of its parent. The whole tree is released at
//! once when [`Tree`] is dropped at the end of the computer's turn, nothing is
//! reused across turns.

use crate::game::board::Board;
use crate::game::core::{Move, Outcome, Player, COLS};

/// Index of a node in the [`Tree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Position reached by a sequence of moves from the root of the search.
#[derive(Debug, Clone)]
pub struct Node {
    board: Board,
    /// Player who made the move leading here.
    player: Player,
    /// Move leading here, `None` for the root.
    last_move: Option<Move>,
    parent: Option<NodeId>,
    /// Children indexed by column: `None` if the move was not expanded yet or
    /// is not legal.
    children: [Option<NodeId>; COLS],
    /// Number of completed iterations that went through this node.
    visits: u64,
    /// Number of those iterations whose playout was won by the player the
    /// search is run for.
    wins: u64,
}

impl Node {
    fn new(board: Board, player: Player, last_move: Option<Move>, parent: Option<NodeId>) -> Self {
        Self {
            board,
            player,
            last_move,
            parent,
            children: [None; COLS],
            visits: 0,
            wins: 0,
        }
    }

    /// Position at this node.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Player who moved to reach this node. For the root this is the opponent
    /// of the player to move.
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    /// Move played to reach this node, `None` for the root.
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child reached by playing in `column`, if it was expanded.
    #[must_use]
    pub const fn child(&self, column: usize) -> Option<NodeId> {
        self.children[column]
    }

    /// Expanded children in column order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn visits(&self) -> u64 {
        self.visits
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn wins(&self) -> u64 {
        self.wins
    }

    /// Fraction of the iterations through this node that ended in a win.
    ///
    /// # Panics
    ///
    /// Panics if the node was never visited: nodes must not be compared
    /// before the iteration that created them is backpropagated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        assert!(self.visits > 0, "win rate of an unvisited node is undefined");
        self.wins as f64 / self.visits as f64
    }
}

/// Search tree rooted at the position the search starts from.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// The root is always the first node in the arena.
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a tree with a single unvisited root holding `board`.
    #[must_use]
    pub fn new(board: Board) -> Self {
        let player = !board.to_move();
        Self {
            nodes: vec![Node::new(board, player, None, None)],
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the tree has at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their IDs, parents before children.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Creates the child of `parent` reached by `next_move` and returns its ID.
    ///
    /// # Panics
    ///
    /// Panics if the child already exists or if the move is not legal in the
    /// parent's position. Either means the search statistics are corrupt.
    pub fn add_child(&mut self, parent: NodeId, next_move: Move) -> NodeId {
        let column = next_move.column();
        let node = self.get(parent);
        assert!(
            node.children[column].is_none(),
            "child in column {column} already exists"
        );
        let mut board = node.board.clone();
        let player = board.to_move();
        assert!(
            board.apply(next_move),
            "expanding illegal move {next_move} in {board}"
        );

        let child = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(board, player, Some(next_move), Some(parent)));
        self.get_mut(parent).children[column] = Some(child);
        child
    }

    /// Records the playout `outcome` in every node from `leaf` up to and
    /// including the root. Wins are credited when `outcome` is a win of
    /// `perspective`.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: Outcome, perspective: Player) {
        let won = outcome.winner() == Some(perspective);
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if won {
                node.wins += 1;
            }
            current = node.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(column: usize) -> Move {
        Move::new(column).unwrap()
    }

    #[test]
    fn root() {
        let tree = Tree::new(Board::initial(Player::Computer));
        assert_eq!(tree.len(), 1);
        let root = tree.get(Tree::ROOT);
        assert_eq!(root.player(), Player::Human);
        assert_eq!(root.last_move(), None);
        assert_eq!(root.parent(), None);
        assert_eq!(root.children().count(), 0);
        assert_eq!(root.visits(), 0);
    }

    #[test]
    fn add_child() {
        let mut tree = Tree::new(Board::initial(Player::Computer));
        let child = tree.add_child(Tree::ROOT, column(4));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(Tree::ROOT).child(4), Some(child));
        assert_eq!(tree.get(Tree::ROOT).child(3), None);

        let node = tree.get(child);
        assert_eq!(node.player(), Player::Computer);
        assert_eq!(node.last_move(), Some(column(4)));
        assert_eq!(node.parent(), Some(Tree::ROOT));
        assert_eq!(node.board().to_move(), Player::Human);
        assert_eq!(node.board().at(5, 4), Some(Player::Computer));
        // The root position stays untouched.
        assert_eq!(tree.get(Tree::ROOT).board().discs(), 0);
    }

    #[test]
    #[should_panic(expected = "child in column 2 already exists")]
    fn duplicate_child() {
        let mut tree = Tree::new(Board::initial(Player::Human));
        let _ = tree.add_child(Tree::ROOT, column(2));
        let _ = tree.add_child(Tree::ROOT, column(2));
    }

    #[test]
    fn backpropagate() {
        let mut tree = Tree::new(Board::initial(Player::Computer));
        let child = tree.add_child(Tree::ROOT, column(0));
        let grandchild = tree.add_child(child, column(1));

        tree.backpropagate(grandchild, Outcome::ComputerWins, Player::Computer);
        tree.backpropagate(child, Outcome::HumanWins, Player::Computer);
        tree.backpropagate(child, Outcome::Draw, Player::Computer);

        assert_eq!(tree.get(Tree::ROOT).visits(), 3);
        assert_eq!(tree.get(Tree::ROOT).wins(), 1);
        assert_eq!(tree.get(child).visits(), 3);
        assert_eq!(tree.get(grandchild).visits(), 1);
        assert_eq!(tree.get(grandchild).wins(), 1);
        assert!((tree.get(child).win_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn counters_do_not_wrap() {
        let mut tree = Tree::new(Board::initial(Player::Computer));
        let child = tree.add_child(Tree::ROOT, column(3));
        tree.get_mut(Tree::ROOT).visits = u64::from(u32::MAX);
        tree.get_mut(Tree::ROOT).wins = u64::from(u32::MAX);
        tree.backpropagate(child, Outcome::ComputerWins, Player::Computer);
        assert_eq!(tree.get(Tree::ROOT).visits(), u64::from(u32::MAX) + 1);
        assert_eq!(tree.get(Tree::ROOT).wins(), u64::from(u32::MAX) + 1);
        assert_eq!(tree.get(child).visits(), 1);
    }

    #[test]
    #[should_panic(expected = "unvisited node")]
    fn unvisited_win_rate() {
        let tree = Tree::new(Board::initial(Player::Computer));
        let _ = tree.get(Tree::ROOT).win_rate();
    }
}
