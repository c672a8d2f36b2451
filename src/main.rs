use clap::{Arg, ArgAction, Command};
use file_renamer::report::write_failure_details;
use file_renamer::{
    dump_config, load_config, Prompter, RealFs, RenamerError, RunContext, Session,
    SessionOutcome,
};
use std::io::{self, Write};
use std::process;

fn main() {
    let result = run();
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(error) => {
            eprintln!("Error: {error}");

            // Show suggestions if available
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                eprintln!("\nSuggestions:");
                for suggestion in suggestions {
                    eprintln!("  - {suggestion}");
                }
            }

            process::exit(error.exit_code());
        }
    }
}

fn build_cli() -> Command {
    let command = Command::new("file-renamer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive bulk renamer that backs up every file before renaming it")
        .long_about(
            "file-renamer asks for a directory, a prefix, a joining character and a suffix\n\
             length, copies every entry into a FileRenamerBackup folder and computes its new\n\
             name. Example: photo.jpg → img_001_jpg\n\n\
             By default new names are only shown. Pass --apply to rename the files.",
        )
        .arg(
            Arg::new("apply")
                .long("apply")
                .help("Rename each file after its backup succeeds")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug logging and per-file failure reasons")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-config")
                .long("dump-config")
                .help("Display current configuration settings and exit")
                .action(ArgAction::SetTrue),
        );

    if cfg!(feature = "progress") {
        command.arg(
            Arg::new("progress")
                .long("progress")
                .help("Force the progress bar even for small directories")
                .action(ArgAction::SetTrue),
        )
    } else {
        command
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn run() -> Result<i32, RenamerError> {
    let matches = build_cli().get_matches();

    let apply = matches.get_flag("apply");
    let verbose = matches.get_flag("verbose");
    let dump_config_flag = matches.get_flag("dump-config");
    let force_progress = cfg!(feature = "progress") && matches.get_flag("progress");

    init_logging(verbose);

    let config = load_config()?;

    if dump_config_flag {
        dump_config(&config)?;
        return Ok(0);
    }

    let context = RunContext::new();
    if let Err(e) = context.install_handler() {
        log::warn!("could not install Ctrl-C handler: {e}");
    }

    let session = Session::new(&config, RealFs)
        .apply(apply)
        .context(context)
        .force_progress(force_progress);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    match session.run(&mut prompter)? {
        SessionOutcome::Completed(result) => {
            if verbose {
                writeln!(prompter.output(), "{}", result.statistics())?;
                write_failure_details(&result, prompter.output())?;
            }
            Ok(0)
        }
        SessionOutcome::Declined => {
            eprintln!("Program aborted successfully.");
            Ok(1)
        }
        SessionOutcome::Empty => Ok(0),
    }
}
