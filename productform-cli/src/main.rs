//! Build a product form from a layout, apply edits headlessly and save the snapshot.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::rc::Rc;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, bail, eyre};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use productform::{
    DefaultIdentityGenerator, DocumentFormat, FormHooks, FormSnapshot, FormState,
    OutputDestination, OutputOptions, ProductForm, Transition, emit_snapshot, parse_document_any,
    snapshot_from_value,
};

#[derive(Debug, Parser)]
#[command(
    name = "productform",
    version,
    about = "Validate and edit product form records from the command line"
)]
struct Cli {
    /// Layout: file path, inline document, or "-" for stdin
    #[arg(short = 'l', long = "layout", value_name = "SPEC")]
    layout: String,

    /// Record to load first: file path, inline document, or "-" for stdin
    #[arg(short = 's', long = "snapshot", value_name = "SPEC")]
    snapshot: Option<String>,

    /// Field edits applied in order, as NAME=VALUE (multi-selects take a comma list)
    #[arg(long = "set", value_name = "NAME=VALUE", action = ArgAction::Append)]
    edits: Vec<String>,

    /// Clear the form after applying edits
    #[arg(long = "clear")]
    clear: bool,

    /// Discard unsaved edits without asking when clearing
    #[arg(short = 'y', long = "yes")]
    yes: bool,

    /// Where the saved record goes ("-" for stdout); a file's extension picks the format
    #[arg(short = 'o', long = "output", value_name = "DEST", default_value = "-")]
    output: String,

    /// Write compact JSON/TOML
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite an existing output file
    #[arg(short = 'f', long = "force")]
    force: bool,
}

/// Save hook writing each saved record to the output; `main` reads the outcome back.
struct SnapshotWriter {
    output: OutputOptions,
    discard: bool,
    outcome: Rc<RefCell<Option<Result<(), String>>>>,
}

impl FormHooks for SnapshotWriter {
    fn confirm_discard(&mut self) -> bool {
        if !self.discard {
            warn!("form has unsaved edits; pass --yes to discard them");
        }
        self.discard
    }

    fn on_save(&mut self, snapshot: &FormSnapshot) {
        let outcome = emit_snapshot(snapshot, &self.output).map_err(|err| format!("{err:#}"));
        self.outcome.replace(Some(outcome));
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "productform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    let cli = Cli::parse();

    if cli.layout == "-" && cli.snapshot.as_deref() == Some("-") {
        bail!("layout and snapshot cannot both be read from stdin");
    }
    let edits = cli
        .edits
        .iter()
        .map(|item| split_edit(item).ok_or_else(|| eyre!("expected NAME=VALUE, got '{item}'")))
        .collect::<Result<Vec<_>>>()?;
    let output = output_options(&cli)?;

    let layout = read_document(&cli.layout, "layout")?;
    let snapshot = match cli.snapshot.as_deref() {
        Some(spec) => {
            let value = read_document(spec, "snapshot")?;
            Some(snapshot_from_value(value).map_err(|err| eyre!("{err:#}"))?)
        }
        None => None,
    };

    let outcome = Rc::new(RefCell::new(None));
    let writer = SnapshotWriter {
        output,
        discard: cli.yes,
        outcome: Rc::clone(&outcome),
    };
    let mut builder = ProductForm::new(layout).with_hooks(writer);
    if let Some(snapshot) = snapshot {
        builder = builder.with_snapshot(snapshot);
    }
    let mut form = builder.build().map_err(|err| eyre!("{err:#}"))?;

    apply_edits(&mut form, &edits)?;
    if cli.clear && form.clear() == Transition::Declined {
        info!("keeping edited values");
    }

    if !form.validate_all() {
        for (field, messages) in form.messages() {
            warn!(field = %field, "{}", messages.join("; "));
        }
    }

    let snapshot = form.save();
    info!(
        identity = %snapshot.identity,
        valid = snapshot.validation,
        "record saved"
    );

    match outcome.take() {
        Some(Ok(())) => Ok(()),
        Some(Err(message)) => Err(eyre!(message)),
        None => Err(eyre!("record was not written")),
    }
}

/// Apply edits in order, then settle identity requests they raised.
fn apply_edits(form: &mut FormState, edits: &[(String, String)]) -> Result<()> {
    let mut identity_requests = Vec::new();
    for (name, raw) in edits {
        let edit = form
            .set_field_input(name, raw)
            .wrap_err_with(|| format!("failed to set field '{name}'"))?;
        identity_requests.extend(edit.identity_request);
    }
    if identity_requests.is_empty() {
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .wrap_err("failed to start identity runtime")?;
    runtime.block_on(async {
        for request in identity_requests {
            let resolution = request
                .run(&DefaultIdentityGenerator)
                .await
                .map_err(|err| eyre!("{err:#}"))?;
            form.resolve_identity(resolution);
        }
        Ok::<_, Report>(())
    })
}

fn split_edit(item: &str) -> Option<(String, String)> {
    let (name, value) = item.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

fn read_document(spec: &str, label: &str) -> Result<Value> {
    let path = Path::new(spec);
    let (contents, preferred) = if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err_with(|| format!("failed to read {label} from stdin"))?;
        (buffer, None)
    } else if path.is_file() {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {label} from {}", path.display()))?;
        (contents, DocumentFormat::from_extension(path))
    } else {
        // not a file: the argument is the document itself
        (spec.to_string(), None)
    };
    parse_document_any(&contents, preferred)
        .map_err(|err| eyre!("failed to parse {label}: {err:#}"))
}

fn output_options(cli: &Cli) -> Result<OutputOptions> {
    let destination = OutputDestination::parse(&cli.output);
    if let OutputDestination::File(path) = &destination
        && path.exists()
        && !cli.force
    {
        bail!("{} already exists (pass --force to overwrite)", path.display());
    }
    let options = OutputOptions::for_destination(destination).map_err(|err| eyre!("{err:#}"))?;
    Ok(options.with_pretty(!cli.no_pretty))
}
