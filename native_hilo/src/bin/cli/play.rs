use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use hilo_shared::{Direction, Outcome, Phase, RoundEvent};
use native_hilo::game::{EngineError, Session};
use native_hilo::pretty::{format_card, format_event_human, format_scoreboard, format_state_human};
use native_hilo::storage;
use native_hilo::supply::CardSupply;

use super::args::Command;

pub const INSTRUCTIONS: &str = "\
How to play:
  A card is face up. Guess whether the next card is higher or lower.
  Aces are high, twos are low. An equal card counts as a correct guess.
  Every correct guess scores a point; one wrong guess ends the game.

Commands:
  h  guess higher       l  guess lower
  d  retry a failed draw
  r  restart            s  show the table
  ?  help               q  quit
";

/// Terminal front end around a [`Session`].
pub struct Table<S> {
    session: Session<S>,
    color: bool,
    reveal: Duration,
}

impl<S: CardSupply> Table<S> {
    pub fn new(session: Session<S>, color: bool, reveal: Duration) -> Self {
        Self {
            session,
            color,
            reveal,
        }
    }

    /// Print the instructions the first time this store sees a player.
    pub fn onboard(&mut self, force: bool) {
        let engine = self.session.engine_mut();
        if force || !storage::has_seen_instructions(engine.store()) {
            println!("{}", INSTRUCTIONS);
            if let Err(e) = storage::mark_instructions_seen(engine.store_mut()) {
                tracing::warn!(error = %e, "could not remember that instructions were shown");
            }
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        if self.session.state().phase == Phase::AwaitingFirstCard {
            self.attempt(Command::Draw).await;
        }
        self.show_table();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.prompt();
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => println!("{}", INSTRUCTIONS),
                Ok(Command::State) => self.show_table(),
                Ok(cmd) => self.attempt(cmd).await,
                Err(e) => eprintln!("{}", e),
            }
        }
        println!("{}", format_scoreboard(&self.session.engine().public(), self.color));
        Ok(())
    }

    async fn attempt(&mut self, cmd: Command) {
        let result = match cmd {
            Command::Guess(direction) => self.guess(direction).await,
            Command::Draw => self.draw().await,
            Command::Restart => self.session.restart().await.map(|_| ()),
            _ => Ok(()),
        };
        match result {
            Ok(()) => {}
            Err(EngineError::CardSupplyUnavailable(e)) => {
                tracing::debug!(error = %e, "draw failed");
                let msg = format_event_human(&RoundEvent::SupplyFailed(e.to_string()), self.color);
                println!("{}\n  type d to try again", msg);
            }
            Err(e @ EngineError::InvalidState { .. }) => {
                println!("{}", self.hint_for(&e));
            }
        }
        if matches!(cmd, Command::Restart | Command::Draw) {
            self.show_table();
        }
    }

    async fn guess(&mut self, direction: Direction) -> Result<(), EngineError> {
        self.session.guess(direction).await?;
        self.reveal_and_resolve().await
    }

    /// Retry path: fetch whichever card the engine is waiting for, and finish
    /// the round if that card was the one a guess was waiting on.
    async fn draw(&mut self) -> Result<(), EngineError> {
        self.session.draw_card().await?;
        if self.session.state().phase == Phase::Revealing {
            self.reveal_and_resolve().await?;
        }
        Ok(())
    }

    async fn reveal_and_resolve(&mut self) -> Result<(), EngineError> {
        println!("  next card: {}", "[face down]".dimmed());
        tokio::time::sleep(self.reveal).await;
        if let Some(card) = self.session.state().current_card {
            println!("  turned:    {}", format_card(card, self.color));
        }

        let high_before = self.session.state().high_score;
        let outcome = self.session.resolve_round().await;
        let state = self.session.state();
        let text = match outcome {
            Ok(Outcome::Correct) => format_event_human(&RoundEvent::Correct { score: state.score }, self.color),
            Ok(Outcome::Incorrect) => format_event_human(&RoundEvent::GameOver { score: state.score }, self.color),
            Err(ref e) if e.is_supply_failure() => {
                // the point was scored; only the next card is missing
                format_event_human(&RoundEvent::Correct { score: state.score }, self.color)
            }
            Err(_) => String::new(),
        };
        if !text.is_empty() {
            println!("{}", text);
        }
        if state.high_score > high_before {
            println!("{}", format_event_human(&RoundEvent::NewHighScore(state.high_score), self.color));
        }
        outcome?;
        self.show_table();
        Ok(())
    }

    fn hint_for(&self, e: &EngineError) -> String {
        match self.session.state().phase {
            Phase::GameOver => "The game is over, type r to play again.".to_string(),
            Phase::AwaitingFirstCard | Phase::RoundResolved => {
                "No card on the table yet, type d to draw.".to_string()
            }
            _ => e.to_string(),
        }
    }

    fn show_table(&self) {
        println!("{}", format_state_human(&self.session.engine().public(), self.color));
    }

    fn prompt(&self) {
        let label = match self.session.state().phase {
            Phase::AwaitingGuess => "higher or lower? (h/l)",
            Phase::GameOver => "play again? (r/q)",
            _ => "retry? (d/r/q)",
        };
        if self.color {
            println!("{}", label.bold());
        } else {
            println!("{}", label);
        }
    }
}
