use std::io;

/// One line of input to the interactive game loop.
pub enum PlayCommand {
    Move(String),      // a move in coordinate notation, e.g. "e2e4" or "e7e8q"
    Undo,              // undo - take back the last move
    Moves,             // moves - list the legal moves
    Fen,               // fen - print the position as FEN
    New,               // new - reset to the starting position
    Position(String),  // position <fen> - load a position
    Board,             // board - print the board
    Quit,              // quit the program

    Invalid(String), // placeholder for invalid commands so we can pattern match
}

impl PlayCommand {
    pub fn receive() -> PlayCommand {
        let mut input = String::new();

        if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
            // Closed input ends the session.
            return PlayCommand::Quit;
        }

        let parts = input.as_str().trim().split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            ["undo"] => PlayCommand::Undo,
            ["moves"] => PlayCommand::Moves,
            ["fen"] => PlayCommand::Fen,
            ["new"] => PlayCommand::New,
            ["position", fen @ ..] if !fen.is_empty() => PlayCommand::Position(fen.join(" ")),
            ["board"] => PlayCommand::Board,
            ["quit"] | ["exit"] => PlayCommand::Quit,
            [notation] => PlayCommand::Move(notation.to_string()),
            _ => PlayCommand::Invalid(input.trim().to_string()),
        }
    }
}
