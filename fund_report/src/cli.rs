// fund_report/src/cli.rs

use std::path::PathBuf;

/// What to report on.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// One or more fund files.
    Funds(Vec<PathBuf>),
    /// A fund matrix from a batch of backtests.
    Robust(PathBuf),
}

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub benchmark: Option<String>,
    pub data: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub separate: bool,
    pub verbose: bool,
    pub mode: Mode,
}

/// Command-line arguments parser using Clap.
///
/// Flags override the matching values of the settings file.
impl Args {
    /// Parses command-line arguments using `clap`, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list.
    /// # Errors
    /// * If required arguments are missing or conflicting.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);

        let mode = match path("robust") {
            Some(matrix) => Mode::Robust(matrix),
            None => Mode::Funds(
                matches
                    .get_many::<String>("funds")
                    .map(|values| values.map(PathBuf::from).collect())
                    .unwrap_or_default(),
            ),
        };

        Args {
            config: path("config"),
            benchmark: matches.get_one::<String>("benchmark").cloned(),
            data: path("data"),
            output: path("output"),
            separate: matches.get_flag("separate"),
            verbose: matches.get_flag("verbose"),
            mode,
        }
    }

    /// Applies flag overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut fund_report_core::settings::ReportSettings) {
        if let Some(benchmark) = &self.benchmark {
            settings.benchmark = benchmark.clone();
        }
        if let Some(data) = &self.data {
            settings.data_path = data.display().to_string();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.display().to_string();
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("fund_report")
        .version("0.1.0")
        .about("Fund performance reports against a benchmark")
        .arg(
            clap::Arg::new("config")
            .short('c')
            .long("config")
            .help("Path to the settings.json configuration file")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("benchmark")
            .short('b')
            .long("benchmark")
            .help("Benchmark symbol, e.g. $SPX")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("data")
            .short('d')
            .long("data")
            .help("Directory with one <symbol>.csv file per symbol")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
            .short('o')
            .long("output")
            .help("Directory the reports and charts are written to")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("separate")
            .short('s')
            .long("separate")
            .help("Write one report-<name>.html per fund instead of a combined report")
            .action(clap::ArgAction::SetTrue)
            .conflicts_with("robust"),
        )
        .arg(
            clap::Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Enable debug logging")
            .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("robust")
            .short('r')
            .long("robust")
            .value_name("MATRIX_FILE")
            .help("Robust mode: report on a fund matrix (.json or .bin)")
            .num_args(1)
            .conflicts_with("funds"),
        )
        .arg(
            clap::Arg::new("funds")
            .value_name("FILES")
            .help("Fund files (.json, .csv or .bin)")
            .num_args(1..)
            .required_unless_present("robust"),
        )
}
