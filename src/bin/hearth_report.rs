use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
    process,
};

use hearth_budget::{
    currency::NumberStyle,
    errors::{EngineError, Result},
    hearth_config::ConfigManager,
    hearth_domain::{CurrencyCode, Period},
    init, load_snapshot,
    report::{render_text, RenderOptions},
    BudgetEngine,
};

const CONFIG_ENV: &str = "HEARTH_CONFIG";

#[derive(Debug, Default)]
struct ReportArgs {
    snapshot: Option<PathBuf>,
    month: Option<Period>,
    currency: Option<CurrencyCode>,
    config: Option<PathBuf>,
    json: bool,
    no_color: bool,
}

enum Command {
    Report(ReportArgs),
    Help,
    Version,
}

fn main() {
    init();

    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {err}");
            print_usage();
            process::exit(1);
        }
    };

    let outcome = match command {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Version => {
            println!(
                "hearth_report {} ({} {}, {})",
                env!("CARGO_PKG_VERSION"),
                env!("HEARTH_BUILD_HASH"),
                env!("HEARTH_BUILD_PROFILE"),
                env!("HEARTH_BUILD_DATE"),
            );
            Ok(())
        }
        Command::Report(args) => run(args),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut parsed = ReportArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--json" => parsed.json = true,
            "--no-color" => parsed.no_color = true,
            "--month" => {
                let value = required_value(&mut args, "--month")?;
                parsed.month = Some(value.parse::<Period>()?);
            }
            "--currency" => {
                let value = required_value(&mut args, "--currency")?;
                let code = CurrencyCode::new(value);
                if code.is_empty() {
                    return Err(EngineError::Usage("--currency cannot be empty".into()));
                }
                parsed.currency = Some(code);
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(required_value(&mut args, "--config")?));
            }
            flag if flag.starts_with('-') => {
                return Err(EngineError::Usage(format!("unknown option `{flag}`")));
            }
            path => {
                if parsed.snapshot.is_some() {
                    return Err(EngineError::Usage(format!(
                        "unexpected extra argument `{path}`"
                    )));
                }
                parsed.snapshot = Some(PathBuf::from(path));
            }
        }
    }
    Ok(Command::Report(parsed))
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| EngineError::Usage(format!("{flag} needs a value")))
}

fn run(args: ReportArgs) -> Result<()> {
    let manager = match args.config.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from)) {
        Some(path) => ConfigManager::new(path),
        None => ConfigManager::from_user_dirs(),
    };
    let config = manager.load()?;

    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| config.resolve_default_snapshot());
    let snapshot = load_snapshot(&snapshot_path)?;

    let mut engine = BudgetEngine::new(&config)?;
    if let Some(currency) = args.currency {
        engine = engine.with_currency(currency);
    }
    let report = match args.month {
        Some(period) => engine.month_report(&snapshot, period),
        None => engine.current_month_report(&snapshot),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let options = RenderOptions {
            color: !args.no_color && io::stdout().is_terminal(),
            number_style: NumberStyle::for_locale(&config.locale),
        };
        print!("{}", render_text(&report, &options));
    }
    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: hearth_report [snapshot.json] [options]\n\
         Options:\n  \
         --month YYYY-MM    month to report (default: current month)\n  \
         --currency CODE    home currency (default: from config)\n  \
         --config PATH      config file (default: $HEARTH_CONFIG or user config dir)\n  \
         --json             print the report as JSON\n  \
         --no-color         disable colored output\n  \
         -V, --version      print version information\n  \
         -h, --help         print this help"
    );
}
