use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rozhodci::{Game, GameController, PlayCommand};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rozhodci")]
#[command(about = "Chess rules engine with perft and play harnesses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count move paths from a position, split by root move
    Perft {
        /// Depth in plies
        #[arg(short, long, default_value_t = 4)]
        depth: usize,
        /// Position to count from, standard start when omitted
        #[arg(short, long)]
        fen: Option<String>,
        /// Split the root moves across threads
        #[arg(short, long)]
        parallel: bool,
    },
    /// Play an interactive game on stdin
    Play {
        /// Position to start from
        #[arg(short, long)]
        fen: Option<String>,
    },
    /// Play random legal moves against itself, an end-to-end exercise of the rules
    Selfplay {
        /// Number of games
        #[arg(short, long, default_value_t = 1)]
        games: usize,
        /// RNG seed for reproducible games
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Perft {
            depth,
            fen,
            parallel,
        } => run_perft(depth, fen.as_deref(), parallel),
        Commands::Play { fen } => run_play(fen.as_deref()),
        Commands::Selfplay { games, seed } => run_selfplay(games, seed),
    }
}

fn controller_from(fen: Option<&str>) -> GameController {
    let mut controller = GameController::new();

    if let Some(fen) = fen {
        if let Err(error) = controller.new_game_from_fen(fen) {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    }

    controller
}

fn run_perft(depth: usize, fen: Option<&str>, parallel: bool) {
    let mut controller = controller_from(fen);

    let start = Instant::now();
    let moves = if parallel {
        controller.perft_parallel(depth)
    } else {
        controller.perft(depth)
    };
    let elapsed = start.elapsed();

    for (board_move, count) in &moves {
        println!("{}: {}", board_move.unparse(), count);
    }

    let nodes: usize = moves.iter().map(|(_, count)| count).sum();
    log::info!("depth {} took {:?}", depth, elapsed);

    println!("\nNodes: {}", nodes);
}

fn run_play(fen: Option<&str>) {
    let mut controller = controller_from(fen);
    controller.print();

    loop {
        match PlayCommand::receive() {
            PlayCommand::Move(notation) => match controller.try_move_piece(&notation) {
                Ok(_) => {
                    controller.print();
                    report_state(&mut controller);
                }
                Err(error) => println!("{}", error),
            },
            PlayCommand::Undo => match controller.try_unmove_piece() {
                Ok(board_move) => {
                    println!("took back {}", board_move.unparse());
                    controller.print();
                }
                Err(error) => println!("{}", error),
            },
            PlayCommand::Moves => {
                let moves = controller
                    .game
                    .get_moves()
                    .iter()
                    .map(|board_move| board_move.unparse())
                    .collect::<Vec<_>>();

                println!("{}", moves.join(" "));
            }
            PlayCommand::Fen => controller.print_fen(),
            PlayCommand::New => {
                controller.new_game();
                controller.print();
            }
            PlayCommand::Position(fen) => match controller.new_game_from_fen(&fen) {
                Ok(()) => controller.print(),
                Err(error) => println!("{}", error),
            },
            PlayCommand::Board => controller.print(),
            PlayCommand::Quit => break,
            PlayCommand::Invalid(input) => println!("unknown command: {}", input),
        }
    }
}

fn report_state(controller: &mut GameController) {
    let game = &mut controller.game;

    if game.is_checkmate() {
        println!("checkmate, {:?} wins", !game.turn());
    } else if game.is_stalemate() {
        println!("stalemate");
    } else if game.is_draw() {
        println!("draw");
    } else if game.is_check() {
        println!("check");
    }
}

fn run_selfplay(games: usize, seed: Option<u64>) {
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for index in 1..=games {
        let mut game = Game::new();
        let mut plies = 0;

        // Cap the game length so two bare kings cannot wander forever.
        while !game.is_game_over() && plies < 600 {
            let moves = game.get_moves();
            let board_move = moves[rng.random_range(0..moves.len())];

            if game.make_move(board_move).is_err() {
                break;
            }
            plies += 1;

            log::debug!("game {}: {}", index, board_move.unparse());
        }

        let verdict = if game.is_checkmate() {
            format!("checkmate, {:?} wins", !game.turn())
        } else if game.is_stalemate() {
            "stalemate".to_string()
        } else if game.is_insufficient_material() {
            "insufficient material".to_string()
        } else {
            "unfinished".to_string()
        };

        println!("game {}: {} plies, {}", index, plies, verdict);
        log::info!("game {} final position: {}", index, game.get_fen());
    }
}
