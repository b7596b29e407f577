mod event;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use tracing::{error, info, warn};

use event::{Command, EventHandler};
use keystride::clock::SystemClock;
use keystride::config::Config;
use keystride::engine::format::{format_duration, format_time};
use keystride::generator::WordSupply;
use keystride::generator::quotes::QuoteLength;
use keystride::logging;
use keystride::session::{
    Difficulty, DisplayChar, ModeKind, ResultStatus, ResultsRecord, TypingTest,
};
use keystride::store::{JsonStore, ResultStore};

#[derive(Parser)]
#[command(name = "keystride", version, about = "Terminal typing speed test")]
struct Cli {
    #[arg(short, long, help = "Test mode (words, time, quote, custom)")]
    mode: Option<ModeKind>,

    #[arg(short, long, help = "Number of words for words and custom modes")]
    count: Option<usize>,

    #[arg(short, long, help = "Time limit in seconds for time mode")]
    time: Option<u32>,

    #[arg(short, long, help = "Word list (english, english_uk, programming)")]
    language: Option<String>,

    #[arg(short, long, help = "Difficulty (normal, expert, master)")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, help = "Add punctuation and capitals")]
    punctuation: bool,

    #[arg(short, long, help = "Mix numbers into the words")]
    numbers: bool,

    #[arg(long, help = "Quote length (short, medium, long, extended)")]
    quote_length: Option<QuoteLength>,

    #[arg(long, help = "Config file to use instead of the default")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        let test = &mut config.test;
        if let Some(mode) = self.mode {
            test.mode = mode;
        }
        if let Some(count) = self.count {
            test.word_count = count;
        }
        if let Some(time) = self.time {
            test.time_seconds = time;
        }
        if let Some(language) = &self.language {
            test.language = language.clone();
        }
        if let Some(difficulty) = self.difficulty {
            test.difficulty = difficulty;
        }
        if let Some(length) = self.quote_length {
            test.quote_length = Some(length);
        }
        test.punctuation |= self.punctuation;
        test.numbers |= self.numbers;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            eprintln!("warning: {err:#}; using default settings");
            Config::default()
        }),
    };
    cli.apply(&mut config);

    // stderr would tear the raw-mode line, so logs always go to a file.
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("keystride.log"));
    logging::init_with_file(&log_path);
    info!(data_dir = %config.data_dir.display(), "starting");

    let supply = WordSupply::new(&config.data_dir);
    info!(wordlists = %supply.wordlists_dir().display(), "word supply ready");
    let mut test = TypingTest::new(
        config.test_config(),
        Box::new(supply),
        Box::new(SystemClock::new()),
    );
    let mut store = JsonStore::with_base_dir(config.data_dir.clone())?;

    enable_raw_mode().context("enabling raw mode")?;
    let outcome = run(&mut test);
    disable_raw_mode()?;
    println!();

    match outcome? {
        Some(results) if !results.has_input() => {
            info!("timed test expired untouched, not saved");
            println!("Test abandoned.");
        }
        Some(results) => {
            let is_best = store.save_result(&results).unwrap_or_else(|err| {
                error!(%err, "could not save result");
                eprintln!("warning: result not saved: {err:#}");
                false
            });
            report(&results, is_best);
        }
        None => println!("Test abandoned."),
    }
    Ok(())
}

/// Drive the test until it ends (`Some`) or the user quits (`None`).
fn run(test: &mut TypingTest) -> Result<Option<ResultsRecord>> {
    let events = EventHandler::new(Duration::from_millis(100));
    let mut out = io::stdout();
    render(&mut out, test)?;

    loop {
        match events.next()? {
            Command::Tick => {
                test.check_time_limit();
            }
            Command::Quit => {
                warn!("test abandoned");
                return Ok(None);
            }
            Command::Restart => test.reset(),
            Command::Type(key) => {
                test.process_key(key);
            }
        }
        if let Some(results) = test.results() {
            return Ok(Some(results.clone()));
        }
        render(&mut out, test)?;
    }
}

fn render(out: &mut impl Write, test: &TypingTest) -> Result<()> {
    let status = match test.remaining() {
        Some(left) => format_time(left),
        None => format!("{:>3.0}%", test.progress()),
    };
    let live_wpm = test.stats().wpm(test.elapsed());
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("{status} {live_wpm:>6.1} wpm  "))
    )?;

    for (slot, current) in test.window() {
        for ch in slot.display_chars() {
            let styled = match ch {
                DisplayChar::Correct(c) => c.green(),
                DisplayChar::Incorrect { expected, .. } => expected.red(),
                DisplayChar::Pending(c) if current => c.white().underlined(),
                DisplayChar::Pending(c) => c.dark_grey(),
                DisplayChar::Extra(c) => c.dark_red(),
            };
            queue!(out, PrintStyledContent(styled))?;
        }
        queue!(out, Print(' '))?;
    }
    out.flush()?;
    Ok(())
}

fn report(results: &ResultsRecord, is_best: bool) {
    match &results.status {
        ResultStatus::Completed => println!("Test complete."),
        ResultStatus::Failed { reason } => println!("Test failed: {reason}."),
    }
    println!(
        "wpm {:.2}  raw {:.2}  accuracy {:.2}%  consistency {:.2}%",
        results.wpm, results.raw_wpm, results.accuracy, results.consistency
    );
    println!(
        "characters {} (correct/incorrect/extra/missed)",
        results.characters
    );
    println!(
        "time {}  words {}/{}",
        format_duration(results.duration),
        results.words_completed,
        results.total_words
    );
    if is_best {
        println!("New personal best!");
    }
}
