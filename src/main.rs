mod app;
mod calendar;
mod entry;
mod help;
mod theme;
use crate::app::App;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use lexopt::{Arg, Parser, ValueExt};
use rangepick::adapter::{Clock, TimeAdapter};
use rangepick::config::{ConfigError, FullscreenMode, PickerOptions, DEFAULT_SEPARATOR};
use rangepick::model::ModelValue;
use rangepick::picker::DateRangePicker;
use rangepick::text::{parse_input_value, InputFormat, ParseOptions};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::Date;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_MONTHS: usize = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    range: bool,
    months: usize,
    auto_apply: bool,
    min: Option<Date>,
    max: Option<Date>,
    separator: String,
    input_format: InputFormat,
    display_format: String,
    fullscreen: FullscreenMode,
    presets: bool,
    swipe: bool,
    log_file: Option<PathBuf>,
    initial: Option<String>,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            range: false,
            months: DEFAULT_MONTHS,
            auto_apply: true,
            min: None,
            max: None,
            separator: String::from(DEFAULT_SEPARATOR),
            input_format: InputFormat::default(),
            display_format: String::from("fullDate"),
            fullscreen: FullscreenMode::default(),
            presets: true,
            swipe: true,
            log_file: None,
            initial: None,
        }
    }
}

impl RunOptions {
    fn picker_options(&self) -> PickerOptions<TimeAdapter> {
        PickerOptions::new()
            .range(self.range)
            .months(self.months)
            .auto_apply(self.auto_apply)
            .min(self.min)
            .max(self.max)
            .separator(self.separator.as_str())
            .input_format(self.input_format)
            .display_format(self.display_format.as_str())
            .fullscreen(self.fullscreen)
            .show_presets(self.presets)
            .swipeable(self.swipe)
    }

    /// Parses the initial value the way typed input is parsed
    fn initial_value(&self, adapter: &TimeAdapter) -> Result<ModelValue<Date>, lexopt::Error> {
        let Some(raw) = self.initial.as_deref() else {
            return Ok(ModelValue::Empty);
        };
        let value = parse_input_value(
            adapter,
            raw,
            &ParseOptions {
                range: self.range,
                separator: &self.separator,
                input: self.input_format,
            },
        );
        if value.is_empty() {
            Err(lexopt::Error::ParsingFailed {
                value: raw.to_owned(),
                error: Box::new(ConfigError::InvalidDate {
                    field: "initial",
                    value: raw.to_owned(),
                }),
            })
        } else {
            Ok(value)
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('r') | Arg::Long("range") => opts.range = true,
                Arg::Short('m') | Arg::Long("months") => opts.months = parser.value()?.parse()?,
                Arg::Long("no-auto-apply") => opts.auto_apply = false,
                Arg::Long("min") => opts.min = Some(parser.value()?.parse_with(bound("min"))?),
                Arg::Long("max") => opts.max = Some(parser.value()?.parse_with(bound("max"))?),
                Arg::Long("separator") => opts.separator = parser.value()?.string()?,
                Arg::Long("input-format") => opts.input_format = parser.value()?.parse()?,
                Arg::Long("display-format") => opts.display_format = parser.value()?.string()?,
                Arg::Long("fullscreen") => opts.fullscreen = parser.value()?.parse()?,
                Arg::Long("no-presets") => opts.presets = false,
                Arg::Long("no-swipe") => opts.swipe = false,
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.initial.is_none() => {
                    opts.initial = Some(value.string()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        // Bound dates are always ISO, but the initial value follows
        // --input-format, so it can only be parsed once every option is known.
        opts.initial_value(&TimeAdapter::new(Clock::Local))?;
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_logging(opts.log_file.as_deref())?;
                let adapter = TimeAdapter::new(Clock::Local);
                let initial = opts.initial_value(&adapter)?;
                let mut picker = DateRangePicker::new(adapter, opts.picker_options())
                    .context("invalid picker options")?;
                picker.set_value(initial);
                tracing::info!(range = opts.range, months = opts.months, "starting picker");
                let text = with_terminal(|terminal| {
                    App::new(picker)
                        .run(terminal)
                        .context("terminal I/O failed")
                })?;
                if !text.is_empty() {
                    println!("{text}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: rangepick [<options>] [VALUE]");
                println!();
                println!("Pick a date or a date range from a multi-month terminal calendar");
                println!();
                println!("Options:");
                println!("  -r, --range                 Select a range instead of a single date");
                println!("  -m, --months <N>            Number of months to show [default: 2]");
                println!("      --no-auto-apply         Require 'a' to confirm a selection");
                println!("      --min <YYYY-MM-DD>      Earliest selectable date");
                println!("      --max <YYYY-MM-DD>      Latest selectable date");
                println!("      --separator <S>         Text between range edges [default: \" - \"]");
                println!("      --input-format <F>      yyyy-mm-dd, dd/mm/yyyy, mm/dd/yyyy, or auto");
                println!("      --display-format <F>    fullDate, monthAndYear, or a date pattern");
                println!("      --fullscreen <MODE>     true, false, or auto");
                println!("      --no-presets            Hide the preset ranges");
                println!("      --no-swipe              Ignore mouse drags");
                println!("      --log-file <PATH>       Write debug logs to PATH");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Returns a parser for the `--min`/`--max` option named `field`
fn bound(field: &'static str) -> impl FnOnce(&str) -> Result<Date, ConfigError> {
    move |s| {
        InputFormat::YearMonthDay
            .parse(&TimeAdapter::new(Clock::Local), s)
            .ok_or_else(|| ConfigError::InvalidDate {
                field,
                value: s.to_owned(),
            })
    }
}

/// The terminal belongs to the UI, so logs only go to a file, and only when
/// one is requested
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = crossterm::execute!(io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    // Restore the terminal even if disabling mouse capture fails
    if let Err(e) = crossterm::execute!(io::stdout(), DisableMouseCapture) {
        tracing::warn!(error = %e, "failed to disable mouse capture");
    }
    ratatui::restore();
    r
}
