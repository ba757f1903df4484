use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cvrender::{FailurePolicy, Page, RenderConfig, ResumeData, DEFAULT_TEMPLATE};

#[derive(Parser)]
#[command(name = "cvrender", version, about = "Render a résumé record into an HTML page")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the page and write the HTML
    Render {
        #[command(flatten)]
        input: Input,
        /// JSON render configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep rendering the remaining sections when one fails
        #[arg(long)]
        isolate: bool,
        /// Print the SHA-256 of the rendered page to stderr
        #[arg(long)]
        digest: bool,
    },
    /// Render the page and print its text snapshot
    Snapshot {
        #[command(flatten)]
        input: Input,
    },
    /// Load and validate a résumé record
    Validate {
        /// Résumé JSON (bundled sample when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Input {
    /// Résumé JSON (bundled sample when omitted)
    #[arg(short, long)]
    data: Option<PathBuf>,
    /// Host HTML page (bundled template when omitted)
    #[arg(short, long)]
    template: Option<PathBuf>,
}

fn load_data(path: Option<&PathBuf>) -> Result<ResumeData> {
    match path {
        Some(p) => ResumeData::from_path(p)
            .with_context(|| format!("loading resume data from {}", p.display())),
        None => ResumeData::bundled().context("loading bundled resume"),
    }
}

fn build_page(input: &Input, config: RenderConfig) -> Result<Page> {
    let data = load_data(input.data.as_ref())?;
    let template = match &input.template {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("reading template {}", p.display()))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    Ok(Page::new(&template, data, config)?)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            input,
            config,
            output,
            isolate,
            digest,
        } => {
            let mut config = match config {
                Some(p) => RenderConfig::from_path(&p)?,
                None => RenderConfig::default(),
            };
            if isolate {
                config.failure_policy = FailurePolicy::Isolate;
            }

            let mut page = build_page(&input, config)?;
            let report = page.dom_content_loaded().context("rendering page")?;
            for (section, err) in &report.failed {
                eprintln!("warning: section {} not rendered: {}", section, err);
            }

            let html = page.to_html();
            match output {
                Some(p) => fs::write(&p, &html)
                    .with_context(|| format!("writing {}", p.display()))?,
                None => print!("{}", html),
            }
            if digest {
                eprintln!("sha256: {}", page.document().digest());
            }
        }
        Command::Snapshot { input } => {
            let mut page = build_page(&input, RenderConfig::default())?;
            page.dom_content_loaded().context("rendering page")?;
            let snapshot = page.text_snapshot();
            println!("Title: {}", snapshot.title);
            println!("{}", "-".repeat(60));
            println!("{}", snapshot.text);
        }
        Command::Validate { data } => {
            let data = load_data(data.as_ref())?;
            if let Err(e) = data.validate() {
                bail!("{}", e);
            }
            println!(
                "ok: {} experience, {} education, {} skill groups, {} projects, {} certifications, {} languages",
                data.experience.len(),
                data.education.len(),
                data.skills.len(),
                data.projects.len(),
                data.certifications.len(),
                data.languages.len()
            );
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
