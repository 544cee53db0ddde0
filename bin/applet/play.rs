use super::load;
use anyhow::Error as Anyhow;
use clap::Parser;
use derive_more::{Display, Error};
use lib::chess::{Promotion, Square};
use lib::rules::Options;
use std::{path::PathBuf, str::FromStr};
use tracing::{info, instrument};

/// A move in coordinate notation, such as `e2e4` or `b7b8q`.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq)]
#[display(fmt = "{}{}", whence, whither)]
struct Step {
    whence: Square,
    whither: Square,
    promotion: Option<Promotion>,
}

/// The reason why parsing [`Step`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "`{}` is not a move, expected something like `e2e4` or `b7b8q`", _0)]
struct ParseStepError(#[error(not(source))] String);

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || ParseStepError(s.into());

        let whence = s.get(..2).ok_or_else(fail)?;
        let whither = s.get(2..4).ok_or_else(fail)?;
        let suffix = s.get(4..).ok_or_else(fail)?;

        let promotion = match suffix {
            "" => None,
            p => Some(p.parse().map_err(|_| fail())?),
        };

        Ok(Step {
            whence: whence.parse().map_err(|_| fail())?,
            whither: whither.parse().map_err(|_| fail())?,
            promotion,
        })
    }
}

/// Plays a sequence of moves and prints the resulting snapshot.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The rules configuration.
    #[clap(short, long, default_value_t)]
    options: Options,

    /// A game snapshot in RON to resume from, the starting position if omitted.
    #[clap(short, long)]
    snapshot: Option<PathBuf>,

    /// The moves to play in coordinate notation.
    #[clap(required = true)]
    moves: Vec<Step>,
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut game = load(self.snapshot.as_deref(), self.options)?;

        for step in self.moves {
            game.play(step.whence, step.whither)?;

            if game.pending_promotion().is_some() {
                game.promote(step.promotion.unwrap_or(Promotion::Queen))?;
            }

            info!(%step, turn = %game.turn(), check = game.resolution().check);
        }

        if let Some(o) = game.outcome() {
            info!(outcome = %o);
        }

        println!("{:#}", game.snapshot()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_parsed_from_coordinates() {
        let s: Step = "e2e4".parse().unwrap();
        assert_eq!(s.whence, "e2".parse().unwrap());
        assert_eq!(s.whither, "e4".parse().unwrap());
        assert_eq!(s.promotion, None);
        assert_eq!(s.to_string(), "e2e4");
    }

    #[test]
    fn step_may_carry_a_promotion() {
        let s: Step = "b7b8n".parse().unwrap();
        assert_eq!(s.promotion, Some(Promotion::Knight));
    }

    #[test]
    fn malformed_steps_are_rejected() {
        for s in ["", "e2", "e2e", "e2e9", "i2e4", "e7e8k", "e2e4qq"] {
            assert_eq!(s.parse::<Step>(), Err(ParseStepError(s.into())));
        }
    }
}
