//! Interactive quiz session.
//!
//! A single-threaded event loop: one-second ticks, stdin lines and
//! feedback-clear notifications are multiplexed with `select!` on a
//! current-thread runtime. The controller never sees more than one of them
//! at a time.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use quizdeck_core::{
    Config, CoreError, Event, KeyValueStore, MemoryStore, QuizController, QuizState, SqliteStore,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::render;

#[derive(Args)]
pub struct PlayArgs {
    /// Name for the start form (prompted when omitted)
    #[arg(long)]
    name: Option<String>,
    /// Email for the start form (prompted when omitted)
    #[arg(long)]
    email: Option<String>,
    /// JSON question file, overriding `questions_path`
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Keep progress in memory only; nothing is saved for resume
    #[arg(long)]
    memory: bool,
}

type Input = Lines<BufReader<Stdin>>;

/// One line of user input on the quiz, end, exit or report screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select(usize),
    Next,
    Exit,
    Report,
    Home,
    Time,
    Quit,
    Help,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let cmd = match line.trim().to_ascii_lowercase().as_str() {
            "a" | "1" => Command::Select(0),
            "b" | "2" => Command::Select(1),
            "c" | "3" => Command::Select(2),
            "d" | "4" => Command::Select(3),
            "n" | "next" => Command::Next,
            "x" | "exit" => Command::Exit,
            "r" | "report" => Command::Report,
            "h" | "home" => Command::Home,
            "t" | "time" => Command::Time,
            "q" | "quit" => Command::Quit,
            "?" | "help" => Command::Help,
            _ => return None,
        };
        Some(cmd)
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let bank = super::load_bank(&config, args.questions.as_deref())?;
    let store: Box<dyn KeyValueStore> = if args.memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(SqliteStore::open()?)
    };
    let quiz = QuizController::new(bank, config.settings(), store);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()?;
    runtime.block_on(session(quiz, args.name, args.email))
}

struct Session<S: KeyValueStore> {
    quiz: QuizController<S>,
    feedback_tx: mpsc::UnboundedSender<usize>,
    /// A new countdown started; the tick interval must be realigned.
    restart_ticker: bool,
}

/// What woke the event loop.
enum Wake {
    Tick,
    Line(Option<String>),
    ClearFeedback(usize),
}

async fn session<S: KeyValueStore>(
    quiz: QuizController<S>,
    name: Option<String>,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();
    let (feedback_tx, mut feedback_rx) = mpsc::unbounded_channel::<usize>();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut session = Session {
        quiz,
        feedback_tx,
        restart_ticker: false,
    };

    let resume = match session.quiz.saved_progress() {
        Some(saved) => {
            println!("{}", render::resume_prompt(&saved, session.quiz.bank().len()));
            let answer = input.next_line().await?.unwrap_or_default();
            matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        }
        None => false,
    };
    let events = session.quiz.initialize(|_| resume)?;
    session.react(&events);

    if session.quiz.state() == QuizState::NotStarted
        && !start_form(&mut session, &mut input, name, email).await?
    {
        return Ok(());
    }

    loop {
        if std::mem::take(&mut session.restart_ticker) {
            ticker.reset();
        }

        let wake = tokio::select! {
            _ = ticker.tick() => Wake::Tick,
            line = input.next_line() => Wake::Line(line?),
            Some(option_index) = feedback_rx.recv() => Wake::ClearFeedback(option_index),
        };

        match wake {
            Wake::Tick => {
                let events = session.quiz.tick()?;
                session.react(&events);
            }
            Wake::Line(None) => break,
            Wake::Line(Some(line)) => match Command::parse(&line) {
                Some(Command::Quit) => break,
                Some(Command::Home) => {
                    let events = session.quiz.go_home();
                    session.react(&events);
                    if !start_form(&mut session, &mut input, None, None).await? {
                        break;
                    }
                }
                Some(command) => session.handle(command),
                None if line.trim().is_empty() => {}
                None => println!("unknown input '{}', type ? for help", line.trim()),
            },
            Wake::ClearFeedback(option_index) => {
                session.quiz.clear_feedback(option_index);
            }
        }
    }

    if matches!(session.quiz.state(), QuizState::InProgress { .. }) {
        println!("Progress saved after the last finished question; run `quizdeck play` to resume.");
    }
    Ok(())
}

/// Collect name and email until the quiz starts. Returns false on end of input.
async fn start_form<S: KeyValueStore>(
    session: &mut Session<S>,
    input: &mut Input,
    mut name: Option<String>,
    mut email: Option<String>,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        let name_value = match name.take() {
            Some(value) => value,
            None => match prompt(input, "Name: ").await? {
                Some(value) => value,
                None => return Ok(false),
            },
        };
        let email_value = match email.take() {
            Some(value) => value,
            None => match prompt(input, "Email: ").await? {
                Some(value) => value,
                None => return Ok(false),
            },
        };

        match session.quiz.start(&name_value, &email_value) {
            Ok(events) => {
                session.react(&events);
                return Ok(true);
            }
            Err(CoreError::Validation(e)) => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
}

async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    println!("{label}");
    input.next_line().await
}

impl<S: KeyValueStore> Session<S> {
    fn handle(&mut self, command: Command) {
        let result = match command {
            Command::Select(option_index) => self.quiz.select_option(option_index),
            Command::Next => self.quiz.advance(),
            Command::Exit => self.quiz.exit(),
            Command::Report => self.quiz.show_report(),
            Command::Time => {
                match self.quiz.timer() {
                    Some(timer) => println!("{}", render::timer_text(&timer.display())),
                    None => println!("No question on screen."),
                }
                return;
            }
            Command::Help => {
                println!("[a-d] select  [n] next  [x] exit  [r] report  [h] home  [t] time  [q] quit");
                return;
            }
            Command::Home | Command::Quit => return,
        };

        match result {
            Ok(events) => self.react(&events),
            Err(e) => println!("{e}"),
        }
    }

    /// Apply the side effects the events ask for, then redraw if the screen
    /// content changed.
    fn react(&mut self, events: &[Event]) {
        let mut redraw = false;
        for event in events {
            match event {
                Event::TimerStarted { .. } => self.restart_ticker = true,
                Event::TimerWarning { remaining_secs, .. } => {
                    println!("Hurry up: {remaining_secs}s left!");
                }
                Event::TimerCompleted { .. } => println!("Time's up!"),
                Event::FeedbackShown {
                    option_index,
                    correct,
                    clear_after_ms,
                    ..
                } => {
                    println!("{}", render::feedback_text(*correct));
                    let tx = self.feedback_tx.clone();
                    let option_index = *option_index;
                    let delay = Duration::from_millis(*clear_after_ms);
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(option_index);
                    });
                }
                Event::OptionSelected { .. }
                | Event::QuestionLoaded { .. }
                | Event::ScreenChanged { .. } => redraw = true,
                _ => {}
            }
        }
        if redraw {
            render::print_view(&self.quiz.view());
        }
    }
}
