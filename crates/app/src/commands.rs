use anyhow::{Context, Result};
use ledgermatch_matching::{AssignmentStrategy, MatchConfig, MatchReport, MatchRequest, ReconciliationEngine};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub struct MatchArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strategy: Option<AssignmentStrategy>,
    pub pretty: bool,
}

pub fn run_match(args: &MatchArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    tracing::debug!(?config, "Using match configuration");

    let request = read_request(&args.input)?;
    let report = ReconciliationEngine::new(config).run(request)?;

    write_report(&report, args.output.as_deref(), args.pretty)
}

pub fn print_default_config() -> Result<()> {
    let rendered = MatchConfig::default().to_toml()?;
    print!("{rendered}");
    Ok(())
}

fn read_request(input: &Path) -> Result<MatchRequest> {
    let reader: Box<dyn Read> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        Box::new(BufReader::new(file))
    };
    MatchRequest::from_reader(reader)
        .with_context(|| format!("Failed to read match request from {}", input.display()))
}

fn write_report(report: &MatchReport, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
