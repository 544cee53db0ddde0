use anyhow::{Context, Error as Anyhow};
use clap::Subcommand;
use derive_more::From;
use lib::rules::{Game, Options, Snapshot};
use std::{fs, path::Path};

mod moves;
mod play;

#[derive(Debug, From, Subcommand)]
pub enum Applet {
    Moves(moves::Moves),
    Play(play::Play),
}

impl Default for Applet {
    fn default() -> Self {
        moves::Moves::default().into()
    }
}

impl Applet {
    pub fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Moves(a) => a.execute(),
            Applet::Play(a) => a.execute(),
        }
    }
}

/// Resumes the game saved at `path`, or starts a new one.
fn load(path: Option<&Path>, options: Options) -> Result<Game, Anyhow> {
    let path = match path {
        None => return Ok(Game::new(options)),
        Some(path) => path,
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;

    let snapshot: Snapshot = text.parse()?;
    Ok(Game::resume(&snapshot, options)?)
}
