use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;

use palette_editor::cli::Args;
use palette_editor::tui::{self, TuiApp};
use palette_editor::{report, Document};

/// stderr logging would draw over the editor's alternate screen, so the
/// editor only logs when given a file.
fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if args.tui => return Ok(()),
        None => {}
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = args.document_config();

    let mut doc = Document::open(&args.image, config)?;
    if let Some(region) = args.region {
        doc.set_selection(region);
        if !config.rebuild_on_select {
            doc.rebuild();
        }
    }

    for &(index, color) in &args.edits {
        doc.edit_entry(index, color)
            .with_context(|| format!("--set {index}={color}"))?;
    }
    for _ in 0..args.undo {
        if doc.undo()?.is_none() {
            break;
        }
    }

    if args.tui {
        return tui::run(TuiApp::new(doc, args.columns));
    }

    if let Some(output) = &args.output {
        doc.save_image(output, args.region_only)?;
    }

    if args.preview {
        print!("{}", report::preview(doc.palette(), args.columns));
    } else {
        print!("{}", report::listing(doc.palette()));
    }
    Ok(())
}
