use crate::game::core::Move;

/// A line of human input during the game.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Drop a disc into the column.
    Column(Move),
    Quit,
    /// Anything that could not be understood, with the reason.
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        match input {
            "quit" | "q" | "exit" => Self::Quit,
            _ => match Move::try_from(input) {
                Ok(next_move) => Self::Column(next_move),
                Err(e) => Self::Unknown(format!("{e:#}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column() {
        assert_eq!(Command::parse("3\n"), Command::Column(Move::new(3).unwrap()));
        assert_eq!(Command::parse("  0 "), Command::Column(Move::new(0).unwrap()));
    }

    #[test]
    fn quit() {
        assert_eq!(Command::parse("quit\n"), Command::Quit);
        assert_eq!(Command::parse("q"), Command::Quit);
    }

    #[test]
    fn unknown() {
        let Command::Unknown(reason) = Command::parse("9") else {
            panic!("column 9 should be rejected");
        };
        assert!(reason.contains("out of range"), "{reason}");

        let Command::Unknown(reason) = Command::parse("left") else {
            panic!("non-numeric input should be rejected");
        };
        assert!(reason.contains("expected a column number"), "{reason}");

        assert!(matches!(Command::parse(""), Command::Unknown(_)));
    }
}
