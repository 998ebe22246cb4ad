use hilo_shared::{Card, Outcome, Phase, RoundEvent, RoundStatePublic};
use owo_colors::OwoColorize;

pub fn format_card(card: Card, color: bool) -> String {
    let text = format!("{} ({})", card.short(), card);
    if !color {
        return text;
    }
    if card.is_red() {
        text.red().bold().to_string()
    } else {
        text.cyan().bold().to_string()
    }
}

fn format_slot(card: Option<Card>, color: bool) -> String {
    match card {
        Some(c) => format_card(c, color),
        None => "-".to_string(),
    }
}

pub fn format_event_human(ev: &RoundEvent, color: bool) -> String {
    match ev {
        RoundEvent::CardDrawn(c) => format!("drew {}", format_card(*c, color)),
        RoundEvent::GuessMade(d) => format!("guessed {}", d),
        RoundEvent::Correct { score } => {
            let msg = format!("Correct! Keep going! (score {})", score);
            if color {
                msg.green().to_string()
            } else {
                msg
            }
        }
        RoundEvent::NewHighScore(s) => {
            let msg = format!("New high score: {}", s);
            if color {
                msg.yellow().bold().to_string()
            } else {
                msg
            }
        }
        RoundEvent::GameOver { score } => {
            let msg = format!("Game Over! Your guess was wrong. (final score {})", score);
            if color {
                msg.red().bold().to_string()
            } else {
                msg
            }
        }
        RoundEvent::SupplyFailed(e) => {
            let msg = format!("Failed to fetch card from API: {}", e);
            if color {
                msg.magenta().to_string()
            } else {
                msg
            }
        }
        RoundEvent::Restarted => "new game".to_string(),
    }
}

pub fn format_scoreboard(gs: &RoundStatePublic, color: bool) -> String {
    let score = gs.score.to_string();
    let high = gs.high_score.to_string();
    if color {
        format!(
            "{} {}   {} {}",
            "SCORE".bold(),
            score.cyan().bold(),
            "HIGH SCORE".bold(),
            high.magenta().bold()
        )
    } else {
        format!("SCORE {}   HIGH SCORE {}", score, high)
    }
}

/// Multi-line summary of the round for terminals and logs.
pub fn format_state_human(gs: &RoundStatePublic, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format_scoreboard(gs, color));
    out.push('\n');

    let current = if gs.hints.face_down {
        "[face down]".to_string()
    } else if gs.hints.loading && gs.current_card.is_none() {
        "Loading...".to_string()
    } else {
        format_slot(gs.current_card, color)
    };
    out.push_str(&format!("  previous: {}\n", format_slot(gs.previous_card, color)));
    out.push_str(&format!("  current:  {}\n", current));

    match (gs.phase, gs.last_outcome) {
        (Phase::GameOver, _) => {
            let msg = "Game Over! Your guess was wrong.";
            out.push_str(&if color {
                msg.red().bold().to_string()
            } else {
                msg.to_string()
            });
        }
        (_, Some(Outcome::Correct)) => out.push_str("Correct! Keep going!"),
        (phase, _) => out.push_str(&format!("[{}]", phase)),
    }
    out
}
