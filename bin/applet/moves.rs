use super::load;
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::rules::Options;
use std::path::PathBuf;
use tracing::instrument;

/// Lists the legal moves of the side to move.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Moves {
    /// The rules configuration.
    #[clap(short, long, default_value_t)]
    options: Options,

    /// A game snapshot in RON, the starting position if omitted.
    snapshot: Option<PathBuf>,
}

impl Moves {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let game = load(self.snapshot.as_deref(), self.options)?;
        let resolution = game.resolution();

        println!("{}", game.board());
        println!("turn: {}", game.turn());
        println!("check: {}", resolution.check);

        match game.outcome() {
            Some(o) => println!("outcome: {}", o),
            None => println!("outcome: none"),
        }

        for (whence, moves) in &resolution.moves {
            let targets: Vec<_> = moves.iter().map(|m| m.whither().to_string()).collect();
            println!("{}: {}", whence, targets.join(" "));
        }

        Ok(())
    }
}
