//! Interactive guided playback on the terminal.

use std::time::Duration;

use anyhow::Result;
use larder_core::{
    format_duration, Playback, PlaybackClock, PlaybackEvent, RecipeId, RecipeStore, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;

use crate::display::{ingredient_line, step_heading};
use crate::App;

const HELP: &str = "[n]ext  [p]revious  [s]tart timer  [x] stop timer  [q]uit";

/// Map one line of input to a playback event.
fn parse_key(line: &str) -> Option<PlaybackEvent> {
    match line.trim().to_lowercase().as_str() {
        "n" | "next" => Some(PlaybackEvent::Next),
        "p" | "prev" | "previous" => Some(PlaybackEvent::Previous),
        "s" | "start" => Some(PlaybackEvent::StartTimer),
        "x" | "stop" => Some(PlaybackEvent::StopTimer),
        "q" | "quit" => Some(PlaybackEvent::Close),
        _ => None,
    }
}

pub async fn play_recipe(app: &App, id: RecipeId) -> Result<()> {
    let recipe = app.store.get(id).await?;
    println!("{}", recipe.metadata.title);

    let span = tracing::info_span!("playback", recipe = %id, steps = recipe.steps.len());
    let playback = Playback::new(recipe.steps)?;
    run_session(playback, app.config.tick_period())
        .instrument(span)
        .await
}

async fn run_session(mut playback: Playback, period: Duration) -> Result<()> {
    let mut clock = PlaybackClock::new(period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    playback.open();
    tracing::info!("session opened");
    print_step(&playback);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    playback.close();
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(event) = parse_key(&line) else {
                    println!("{}", HELP);
                    continue;
                };
                playback.handle(event);
                if event == PlaybackEvent::Close {
                    break;
                }
                print_step(&playback);
            }
            _ = clock.next_tick() => {
                playback.tick();
                print_timer(playback.timer());
            }
        }
        clock.sync(&playback);
    }

    clock.sync(&playback);
    tracing::info!("session closed");
    Ok(())
}

fn print_step(playback: &Playback) {
    let (Some(index), Some(step)) = (playback.current_index(), playback.current_step()) else {
        return;
    };

    println!();
    println!("Step {}/{}", index + 1, playback.steps().len());
    println!("{}", step_heading(step));
    for entry in step.ingredients() {
        println!("   - {}", ingredient_line(entry));
    }
    if step.is_timed() {
        print_timer(playback.timer());
        if playback.timer() == TimerState::Idle {
            println!("Press s to start the timer");
        }
    }
    println!("{}", HELP);
}

fn print_timer(timer: TimerState) {
    match timer {
        TimerState::Idle => {}
        TimerState::Running { remaining_secs } => {
            println!("Time left: {}", format_duration(remaining_secs))
        }
        TimerState::Expired { .. } => println!("Time is up!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("n"), Some(PlaybackEvent::Next));
        assert_eq!(parse_key(" P "), Some(PlaybackEvent::Previous));
        assert_eq!(parse_key("s"), Some(PlaybackEvent::StartTimer));
        assert_eq!(parse_key("x"), Some(PlaybackEvent::StopTimer));
        assert_eq!(parse_key("q"), Some(PlaybackEvent::Close));
        assert_eq!(parse_key("jump"), None);
    }
}
