use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub consumption: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub production_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub budget: Option<f64>,
    pub max_shares: Option<u32>,
    pub report_out: Option<PathBuf>,
    pub serve: bool,
    #[cfg_attr(not(feature = "api"), allow(dead_code))]
    pub port: u16,
}

pub const DEFAULT_PORT: u16 = 3000;

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        port: DEFAULT_PORT,
        ..CliOptions::default()
    };

    while i < args.len() {
        match args[i].as_str() {
            "--consumption" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --consumption (expected a CSV path)")?;
                set_once(&mut opts.consumption, PathBuf::from(path), "--consumption")?;
            }
            "--catalog" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --catalog (expected a JSON path)")?;
                set_once(&mut opts.catalog, PathBuf::from(path), "--catalog")?;
            }
            "--production-dir" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --production-dir (expected a directory)",
                )?;
                set_once(&mut opts.production_dir, PathBuf::from(path), "--production-dir")?;
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                set_once(&mut opts.config, PathBuf::from(path), "--config")?;
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--budget" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --budget (expected a number)")?;
                let budget = raw
                    .parse::<f64>()
                    .map_err(|_| format!("--budget value \"{raw}\" is not a valid number"))?;
                set_once(&mut opts.budget, budget, "--budget")?;
            }
            "--max-shares" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --max-shares (expected a u32)")?;
                let n = raw
                    .parse::<u32>()
                    .map_err(|_| format!("--max-shares value \"{raw}\" is not a valid u32"))?;
                set_once(&mut opts.max_shares, n, "--max-shares")?;
            }
            "--report-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --report-out (expected a file path)")?;
                set_once(&mut opts.report_out, PathBuf::from(path), "--report-out")?;
            }
            "--serve" => {
                opts.serve = true;
            }
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    let file_inputs = [
        opts.consumption.is_some(),
        opts.catalog.is_some(),
        opts.production_dir.is_some(),
    ];
    if file_inputs.iter().any(|&set| set) && !file_inputs.iter().all(|&set| set) {
        return Err(
            "`--consumption`, `--catalog` and `--production-dir` must be given together"
                .to_string(),
        );
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("energy-invest — share investment advisor for solar, wind and battery projects");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  energy-invest [--consumption <csv> --catalog <json> --production-dir <dir>] \
         [--config <toml> | --preset <name>] [--budget <f64>] [--max-shares <u32>] \
         [--report-out <csv>] [--serve] [--port <u16>]"
    );
    eprintln!();
    eprintln!("Without input files a seeded demo portfolio is optimised.");
    eprintln!("--serve requires the `api` feature.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_demo_mode() {
        let opts = parse_args_from(vec![]).expect("parse should succeed");
        assert!(opts.consumption.is_none());
        assert!(opts.preset.is_none());
        assert_eq!(opts.port, super::DEFAULT_PORT);
        assert!(!opts.serve);
    }

    #[test]
    fn supports_file_inputs() {
        let opts = parse_args_from(args(&[
            "--consumption",
            "load.csv",
            "--catalog",
            "list.json",
            "--production-dir",
            "production",
            "--budget",
            "5000",
            "--max-shares",
            "20",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.consumption.as_deref().and_then(|p| p.to_str()),
            Some("load.csv")
        );
        assert_eq!(opts.budget, Some(5000.0));
        assert_eq!(opts.max_shares, Some(20));
    }

    #[test]
    fn partial_file_inputs_are_rejected() {
        let err = parse_args_from(args(&["--consumption", "load.csv"])).unwrap_err();
        assert!(err.contains("must be given together"));
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let err = parse_args_from(args(&["--config", "a.toml", "--preset", "daily"])).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn repeated_flag_is_rejected() {
        let err = parse_args_from(args(&["--budget", "1", "--budget", "2"])).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn bad_number_is_rejected() {
        assert!(parse_args_from(args(&["--max-shares", "-3"])).is_err());
        assert!(parse_args_from(args(&["--budget", "lots"])).is_err());
    }

    #[test]
    fn serve_and_port() {
        let opts = parse_args_from(args(&["--serve", "--port", "8080"])).expect("parse");
        assert!(opts.serve);
        assert_eq!(opts.port, 8080);
    }

    #[test]
    fn unknown_argument() {
        assert!(parse_args_from(args(&["--frobnicate"])).is_err());
    }
}
