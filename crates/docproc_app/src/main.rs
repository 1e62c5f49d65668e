mod effects;
mod render;
mod shell;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use client_logging::LogDestination;
use docproc_client::{ApiSettings, EngineConfig};

use crate::effects::LoadedFile;

/// Upload legal documents to the processing backend and collect the
/// plain-English and summary artifacts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Documents to process (.pdf, .docx, .txt)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "DOCPROC_BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Directory downloaded artifacts are written into
    #[arg(long, default_value = "processed")]
    output_dir: PathBuf,

    /// Document title, one per file in order (optional)
    #[arg(long = "title")]
    titles: Vec<String>,

    /// Document section hint, one per file in order (optional)
    #[arg(long = "section")]
    sections: Vec<String>,

    /// Seconds between status polls
    #[arg(long, default_value_t = 2)]
    poll_interval_secs: u64,

    /// Leave artifacts on the server instead of downloading them
    #[arg(long)]
    no_download: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    log: LogArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    client_logging::initialize(args.log.into());

    let staged = load_files(&args)?;

    let config = EngineConfig {
        base_url: args.backend_url.clone(),
        output_dir: args.output_dir.clone(),
        settings: ApiSettings {
            poll_interval: Duration::from_secs(args.poll_interval_secs.max(1)),
            ..ApiSettings::default()
        },
    };

    shell::run(&args.backend_url, config, staged, args.no_download)
}

/// Read every document up front so a bad path fails before any upload.
fn load_files(args: &Args) -> anyhow::Result<Vec<LoadedFile>> {
    if !args.titles.is_empty() && args.titles.len() != args.files.len() {
        bail!(
            "got {} --title values for {} files; pass one per file or none",
            args.titles.len(),
            args.files.len()
        );
    }
    if !args.sections.is_empty() && args.sections.len() != args.files.len() {
        bail!(
            "got {} --section values for {} files; pass one per file or none",
            args.sections.len(),
            args.files.len()
        );
    }

    let mut staged = Vec::with_capacity(args.files.len());
    for (index, path) in args.files.iter().enumerate() {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("{} has no usable filename", path.display()))?
            .to_string();
        staged.push(LoadedFile {
            filename,
            bytes,
            title: args.titles.get(index).cloned(),
            section: args.sections.get(index).cloned(),
        });
    }
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(files: Vec<PathBuf>) -> Args {
        Args {
            files,
            backend_url: "http://localhost:8000".to_string(),
            output_dir: PathBuf::from("processed"),
            titles: Vec::new(),
            sections: Vec::new(),
            poll_interval_secs: 2,
            no_download: false,
            log: LogArg::Terminal,
        }
    }

    #[test]
    fn load_files_stages_bytes_and_pairs_metadata_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"%PDF").unwrap();
        std::fs::write(&b, b"plain text").unwrap();

        let mut args = args_for(vec![a, b]);
        args.titles = vec!["Lease".to_string(), "Notes".to_string()];

        let staged = load_files(&args).unwrap();
        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].filename, "a.pdf");
        assert_eq!(staged[0].bytes, b"%PDF");
        assert_eq!(staged[0].title.as_deref(), Some("Lease"));
        assert_eq!(staged[1].title.as_deref(), Some("Notes"));
        assert_eq!(staged[1].section, None);
    }

    #[test]
    fn title_count_must_match_file_count_when_given() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        std::fs::write(&a, b"%PDF").unwrap();

        let mut args = args_for(vec![a]);
        args.titles = vec!["One".to_string(), "Two".to_string()];

        let err = load_files(&args).unwrap_err();
        assert!(err.to_string().contains("--title"));
    }

    #[test]
    fn missing_file_fails_before_any_upload() {
        let args = args_for(vec![PathBuf::from("/definitely/not/here.pdf")]);
        let err = load_files(&args).unwrap_err();
        assert!(err.to_string().contains("here.pdf"));
    }
}
