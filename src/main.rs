use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io::{self, Stdout};
use std::thread;
use std::time::Duration;

mod game;
mod maze;
mod render;

use game::{AttackOutcome, Command, Outcome, Session};
use render::Renderer;

const TRANSITION_PAUSE_MS: u64 = 2000;

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    if result.is_ok() {
        println!("Thanks for playing!");
    }
    result
}

fn run(stdout: &mut Stdout) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut session = Session::new(1, &mut rng);
    let mut renderer = Renderer::new(session.width, session.height);
    let mut status = String::new();

    loop {
        renderer.render(stdout, &session, &status)?;
        let cmd = next_command()?;
        status.clear();

        match session.apply(cmd, &mut rng) {
            Outcome::Playing => {}
            Outcome::Attacked(AttackOutcome::Defeated) => status.push_str("Enemy defeated!"),
            Outcome::Attacked(AttackOutcome::NoTarget) => {
                status.push_str("No enemy in range to attack!");
            }
            Outcome::LevelComplete => {
                let msg = format!("Level {} completed! Loading next level...", session.level);
                renderer.render(stdout, &session, &msg)?;
                thread::sleep(Duration::from_millis(TRANSITION_PAUSE_MS));
                session.advance(&mut rng);
                renderer = Renderer::new(session.width, session.height);
            }
            Outcome::GameOver => {
                renderer.render(stdout, &session, "You were caught by an enemy! Game Over.")?;
                thread::sleep(Duration::from_millis(TRANSITION_PAUSE_MS));
                return Ok(());
            }
            Outcome::Quit => return Ok(()),
        }
    }
}

fn next_command() -> io::Result<Command> {
    loop {
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                return Ok(match key.code {
                    KeyCode::Char('w') => Command::Up,
                    KeyCode::Char('a') => Command::Left,
                    KeyCode::Char('s') => Command::Down,
                    KeyCode::Char('d') => Command::Right,
                    KeyCode::Char('f') => Command::Attack,
                    KeyCode::Char('q') => Command::Quit,
                    _ => Command::Unknown,
                });
            }
        }
    }
}
