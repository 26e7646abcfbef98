use crate::{Error, Result};

/// Options for the `run` command; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub device: Option<String>,
    pub baud: Option<u32>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub poll_interval_ms: Option<u64>,
    pub scroll_interval_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
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
            "trackline - shell.fm now-playing display for DSP-420 serial screens\n",
            "\n",
            "USAGE:\n",
            "  trackline run [--device <path>] [--baud <number>] [--host <name>] [--port <number>]\n",
            "                [--poll-interval-ms <number>] [--scroll-interval-ms <number>]\n",
            "                [--log-level <level>] [--log-file <path>]\n",
            "  trackline --help\n",
            "  trackline --version\n",
            "\n",
            "OPTIONS:\n",
            "  --device <path>              Serial device path (default: /dev/ttyUSB0)\n",
            "  --baud <number>              Baud rate (default: 9600)\n",
            "  --host <name>                shell.fm host (default: localhost)\n",
            "  --port <number>              shell.fm port (default: 54311)\n",
            "  --poll-interval-ms <number>  Delay between now-playing refreshes (default: 4000)\n",
            "  --scroll-interval-ms <number>  Scroll speed for overlong fields (default: 800)\n",
            "  --log-level <level>          error|warn|info|debug|trace (default: info)\n",
            "  --log-file <path>            Append log lines to a file\n",
            "  -h, --help                   Show this help\n",
            "  -V, --version                Show version\n",
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
            "--device" => {
                opts.device = Some(take_value(flag, iter)?);
            }
            "--baud" => {
                opts.baud = Some(parse_number(flag, &take_value(flag, iter)?)?);
            }
            "--host" => {
                opts.host = Some(take_value(flag, iter)?);
            }
            "--port" => {
                opts.port = Some(parse_number(flag, &take_value(flag, iter)?)?);
            }
            "--poll-interval-ms" => {
                opts.poll_interval_ms = Some(parse_number(flag, &take_value(flag, iter)?)?);
            }
            "--scroll-interval-ms" => {
                opts.scroll_interval_ms = Some(parse_number(flag, &take_value(flag, iter)?)?);
            }
            "--log-level" => {
                opts.log_level = Some(take_value(flag, iter)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
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

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::InvalidArgs(format!("{flag} must be a positive integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_with_no_args() {
        let args: Vec<String> = vec![];
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::Run(RunOptions::default()));
    }

    #[test]
    fn parse_run_with_overrides() {
        let args = vec![
            "run".into(),
            "--device".into(),
            "/dev/ttyUSB1".into(),
            "--baud".into(),
            "19200".into(),
            "--host".into(),
            "music.lan".into(),
            "--port".into(),
            "54312".into(),
            "--poll-interval-ms".into(),
            "2000".into(),
            "--scroll-interval-ms".into(),
            "500".into(),
        ];
        let expected = RunOptions {
            device: Some("/dev/ttyUSB1".into()),
            baud: Some(19_200),
            host: Some("music.lan".into()),
            port: Some(54_312),
            poll_interval_ms: Some(2_000),
            scroll_interval_ms: Some(500),
            log_level: None,
            log_file: None,
        };
        let cmd = Command::parse(&args).unwrap();
        assert_eq!(cmd, Command::Run(expected));
    }

    #[test]
    fn parse_run_allows_implicit_subcommand() {
        let args = vec!["--host".into(), "music.lan".into()];
        let cmd = Command::parse(&args).unwrap();
        let expected = RunOptions {
            host: Some("music.lan".into()),
            ..RunOptions::default()
        };
        assert_eq!(cmd, Command::Run(expected));
    }

    #[test]
    fn parse_help_and_version() {
        let cmd = Command::parse(&["--help".to_string()]).unwrap();
        assert_eq!(cmd, Command::ShowHelp);
        let cmd = Command::parse(&["-V".to_string()]).unwrap();
        assert_eq!(cmd, Command::ShowVersion);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let err = Command::parse(&["--nope".to_string()]).unwrap_err();
        assert!(format!("{err}").contains("unknown flag"));
    }

    #[test]
    fn parse_rejects_non_numeric_value() {
        let args = vec!["--baud".into(), "fast".into()];
        let err = Command::parse(&args).unwrap_err();
        assert!(format!("{err}").contains("positive integer"));
    }
}
