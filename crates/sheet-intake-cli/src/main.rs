//! Sheet Intake CLI - header detection and column mapping tool

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheet_intake::prelude::*;
use sheet_intake::{
    column_to_letters, letters_to_column, DetectionSource, OFFER_PRIORITY, WAREHOUSE_PRIORITY,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "intake")]
#[command(
    author,
    version,
    about = "Find the header row of a spreadsheet and map its columns to upload fields"
)]
struct Cli {
    /// Workflow profile: offer, warehouse, or a path to a JSON profile
    #[arg(short, long, global = true, default_value = "offer")]
    profile: String,

    /// Log detection and classification decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the header row and show the automatic mapping
    Detect {
        /// Input spreadsheet file (csv, tsv)
        input: PathBuf,
    },

    /// Show the header and the first body rows
    Preview {
        /// Input spreadsheet file
        input: PathBuf,

        /// Header row (1-based, default: detected)
        #[arg(long)]
        header_row: Option<usize>,

        /// Number of body rows to show (default: the profile's)
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },

    /// Apply mapping edits, validate and print the submission payload
    ///
    /// Edits run in this order: header row, insertions, assignments,
    /// clears. Column letters in later edits refer to the grid after
    /// earlier insertions.
    Map {
        /// Input spreadsheet file
        input: PathBuf,

        /// Header row (1-based, default: detected)
        #[arg(long)]
        header_row: Option<usize>,

        /// Map a column to a field, e.g. `C=brand`
        #[arg(short, long = "assign", value_name = "COL=FIELD", value_parser = parse_assignment)]
        assign: Vec<(usize, String)>,

        /// Unmap a column, e.g. `D`
        #[arg(short, long = "clear", value_name = "COL", value_parser = parse_column)]
        clear: Vec<usize>,

        /// Insert a constant column, e.g. `B=brand=Acme`
        #[arg(short, long = "insert", value_name = "COL=FIELD=VALUE", value_parser = parse_insertion)]
        insert: Vec<(usize, String, String)>,

        /// Print the payload as JSON instead of form fields
        #[arg(long)]
        json: bool,
    },

    /// List the built-in profiles
    Profiles,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Detect { input } => detect(&input, &cli.profile),
        Commands::Preview {
            input,
            header_row,
            rows,
        } => preview(&input, &cli.profile, header_row, rows),
        Commands::Map {
            input,
            header_row,
            assign,
            clear,
            insert,
            json,
        } => map(&input, &cli.profile, header_row, &assign, &clear, &insert, json),
        Commands::Profiles => list_profiles(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _tracing = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();
}

fn load_profile(name: &str) -> Result<IntakeProfile> {
    if let Some(profile) = IntakeProfile::builtin(name) {
        return Ok(profile);
    }

    let path = Path::new(name);
    if !path.exists() {
        bail!("Unknown profile '{}' (expected offer, warehouse or a JSON file)", name);
    }
    IntakeProfile::from_json_file(path)
        .with_context(|| format!("Failed to load profile '{}'", path.display()))
}

fn open_editor(input: &Path, profile: &str, header_row: Option<usize>) -> Result<MappingEditor> {
    let profile = load_profile(profile)?;
    let grid = Grid::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let mut editor = MappingEditor::new(grid, profile)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;

    if let Some(row) = header_row {
        if row == 0 {
            bail!("Header row numbers start at 1");
        }
        editor
            .change_header_row(row - 1)
            .with_context(|| format!("Header row {} not found", row))?;
    }

    Ok(editor)
}

fn detect(input: &Path, profile: &str) -> Result<()> {
    let editor = open_editor(input, profile, None)?;

    println!("File: {}", input.display());
    println!("Profile: {}", editor.profile().name());

    match editor.detection() {
        Some(detection) => {
            let how = match detection.source {
                DetectionSource::PatternMatch => "matched".to_string(),
                DetectionSource::Fallback(policy) => format!("fallback: {:?}", policy),
                DetectionSource::Manual => "manual".to_string(),
            };
            println!("Header row: {} ({})", detection.row + 1, how);
        }
        None => {
            println!("Header row: not found, pass --header-row to `map` or `preview`");
            return Ok(());
        }
    }

    print_mapping(&editor);
    Ok(())
}

fn preview(
    input: &Path,
    profile: &str,
    header_row: Option<usize>,
    rows: Option<usize>,
) -> Result<()> {
    let editor = open_editor(input, profile, header_row)?;
    let rows = rows.unwrap_or_else(|| editor.profile().preview_rows());
    let preview = editor
        .preview_with(rows)
        .context("No header row detected, pass --header-row")?;

    println!("Header row: {}", preview.header_row);
    let header_line: Vec<String> = preview
        .columns
        .iter()
        .map(|c| match &c.field {
            Some(field) => format!("{}:{} [{}]", c.letters, c.header, field),
            None => format!("{}:{}", c.letters, c.header),
        })
        .collect();
    println!("{}", header_line.join("\t"));

    for row in &preview.rows {
        println!("{}", row.join("\t"));
    }
    if preview.total_rows > preview.rows.len() {
        eprintln!(
            "... {} more rows",
            preview.total_rows - preview.rows.len()
        );
    }

    Ok(())
}

fn map(
    input: &Path,
    profile: &str,
    header_row: Option<usize>,
    assign: &[(usize, String)],
    clear: &[usize],
    insert: &[(usize, String, String)],
    json: bool,
) -> Result<()> {
    let mut editor = open_editor(input, profile, header_row)?;

    for (at, field, value) in insert {
        editor
            .insert_synthetic_column(*at, field, value.as_str())
            .with_context(|| format!("Failed to insert column {}", column_to_letters(*at)))?;
    }
    for (column, field) in assign {
        editor
            .reassign(*column, Some(field.as_str()))
            .with_context(|| format!("Failed to map column {}", column_to_letters(*column)))?;
    }
    for column in clear {
        editor
            .clear(*column)
            .with_context(|| format!("Failed to clear column {}", column_to_letters(*column)))?;
    }

    let payload = match editor.submit() {
        Ok(payload) => payload,
        Err(err) => {
            print_mapping(&editor);
            return Err(err).context("Mapping is not ready to submit");
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to serialize payload")?
        );
    } else {
        for (key, value) in payload.form_fields() {
            println!("{}={}", key, value);
        }
    }
    eprintln!(
        "Mapped {} fields over {} rows",
        payload.columns.len(),
        payload.body_rows
    );

    Ok(())
}

fn print_mapping(editor: &MappingEditor) {
    let headers = editor.headers();
    let required = editor.profile().required_fields();

    for (field, column) in editor.mapping().iter() {
        let marker = if required.contains(field) { "*" } else { " " };
        match column {
            Some(col) => println!(
                "{} {:<12} {:<3} {}",
                marker,
                field.as_str(),
                column_to_letters(col),
                headers.get(col).map(String::as_str).unwrap_or("")
            ),
            None => println!("{} {:<12} -", marker, field.as_str()),
        }
    }

    if let MappingValidation::Missing { missing } = editor.validate() {
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        eprintln!("Missing required fields: {}", names.join(", "));
    }
}

fn list_profiles() -> Result<()> {
    for (profile, priority) in [
        (IntakeProfile::offer(), &OFFER_PRIORITY[..]),
        (IntakeProfile::warehouse(), &WAREHOUSE_PRIORITY[..]),
    ] {
        println!("{} (fallback: {:?})", profile.name(), profile.header_fallback());
        for name in priority {
            if let Some(field) = profile.field(name) {
                let marker = if field.is_required() { "*" } else { " " };
                println!("  {} {:<12} {}", marker, name, field.form_key());
            }
        }
    }
    Ok(())
}

fn parse_column(s: &str) -> Result<usize, String> {
    letters_to_column(s).map_err(|e| e.to_string())
}

fn parse_assignment(s: &str) -> Result<(usize, String), String> {
    let (column, field) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COL=FIELD, got '{}'", s))?;
    Ok((parse_column(column)?, field.trim().to_string()))
}

fn parse_insertion(s: &str) -> Result<(usize, String, String), String> {
    let mut parts = s.splitn(3, '=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(field), Some(value)) => Ok((
            parse_column(column)?,
            field.trim().to_string(),
            value.to_string(),
        )),
        _ => Err(format!("expected COL=FIELD=VALUE, got '{}'", s)),
    }
}
