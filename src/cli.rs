use crate::{Error, Result};

/// Options for the `run` command; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub standby_secs: Option<u32>,
    pub tick_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub stub_display: bool,
}

/// Parsed command-line intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    ShowHelp,
    ShowVersion,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Ok(Command::Run(RunOptions::default()));
        }

        let mut iter = args.iter();
        match iter.next().map(|s| s.as_str()) {
            Some("run") => Ok(Command::Run(parse_run_options(&mut iter)?)),
            Some("--help") | Some("-h") => Ok(Command::ShowHelp),
            Some("--version") | Some("-V") => Ok(Command::ShowVersion),
            Some(flag) if flag.starts_with('-') => {
                // Allow omitting the explicit `run` subcommand: pass the consumed flag plus the
                // remaining args into the run parser.
                let mut flags: Vec<String> = Vec::with_capacity(args.len());
                flags.push(flag.to_string());
                flags.extend(iter.map(|s| s.to_string()));
                let mut iter = flags.iter();
                Ok(Command::Run(parse_run_options(&mut iter)?))
            }
            Some(cmd) => Err(Error::InvalidArgs(format!(
                "unknown command '{cmd}', try --help"
            ))),
            None => Ok(Command::Run(RunOptions::default())),
        }
    }

    pub fn help() -> &'static str {
        concat!(
            "naspanel - NAS status panel daemon\n",
            "\n",
            "USAGE:\n",
            "  naspanel run [--standby-secs <number>] [--tick-ms <number>] [--log-level <level>] [--log-file <path>] [--stub-display]\n",
            "  naspanel --help\n",
            "  naspanel --version\n",
            "\n",
            "OPTIONS:\n",
            "  --standby-secs <number>  Idle seconds before the panel blanks (default: 300)\n",
            "  --tick-ms <number>       Main loop tick length in milliseconds (default: 1000)\n",
            "  --log-level <level>      error|warn|info|debug|trace (default: info)\n",
            "  --log-file <path>        Append log lines to this file as well as stderr\n",
            "  --stub-display           Run without panel/GPIO hardware (development aid)\n",
            "  -h, --help               Show this help\n",
            "  -V, --version            Show version\n",
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn parse_run_options(iter: &mut std::slice::Iter<String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--standby-secs" => {
                let raw = take_value(flag, iter)?;
                opts.standby_secs = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("standby-secs must be a positive integer".to_string())
                })?);
            }
            "--tick-ms" => {
                let raw = take_value(flag, iter)?;
                opts.tick_ms = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("tick-ms must be a positive integer".to_string())
                })?);
            }
            "--log-level" => {
                opts.log_level = Some(take_value(flag, iter)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
            }
            "--stub-display" => {
                opts.stub_display = true;
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown flag '{other}', try --help"
                )));
            }
        }
    }

    Ok(opts)
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}
