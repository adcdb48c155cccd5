use std::path::PathBuf;

use clap::Parser;

use crate::color::Color;
use crate::document::DocumentConfig;
use crate::layout::MAX_PALETTE_COLUMNS;
use crate::pipeline::HistoryPolicy;
use crate::region::Region;

/// Extract the exact colors of an image region and repaint them.
#[derive(Parser, Debug)]
#[command(name = "palette-editor", version, about)]
pub struct Args {
    /// Path to the input image
    pub image: PathBuf,

    /// Selection to extract the palette from, as X,Y,WIDTH,HEIGHT
    /// (defaults to the whole image)
    #[arg(long)]
    pub region: Option<Region>,

    /// Set palette entry INDEX to COLOR (#rrggbb or #aarrggbb); repeatable
    #[arg(long = "set", value_name = "INDEX=COLOR", value_parser = parse_edit)]
    pub edits: Vec<(usize, Color)>,

    /// Undo this many of the edits given with --set
    #[arg(long, default_value_t = 0)]
    pub undo: usize,

    /// Write the edited image to this file (PNG)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// With --output, save only the selected region
    #[arg(long, requires = "output")]
    pub region_only: bool,

    /// Print the palette as colored swatches instead of a list
    #[arg(long)]
    pub preview: bool,

    /// Maximum swatches per row
    #[arg(long, default_value_t = MAX_PALETTE_COLUMNS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub columns: usize,

    /// What happens to undo history when the palette is rebuilt
    #[arg(long, value_enum, default_value_t = HistoryPolicy::Keep)]
    pub history: HistoryPolicy,

    /// Only rebuild the palette on request, not on every selection change
    #[arg(long)]
    pub manual_rebuild: bool,

    /// Launch the interactive editor
    #[arg(long, conflicts_with_all = ["output", "preview"])]
    pub tui: bool,

    /// Write log output (filtered by RUST_LOG) to this file instead of
    /// stderr. Without it, the interactive editor does not log.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn document_config(&self) -> DocumentConfig {
        DocumentConfig {
            history_policy: self.history,
            rebuild_on_select: !self.manual_rebuild,
        }
    }
}

/// Parse `INDEX=COLOR`.
fn parse_edit(s: &str) -> Result<(usize, Color), String> {
    let (index, color) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=COLOR, got '{s}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid palette index '{index}'"))?;
    let color = Color::from_hex(color.trim()).map_err(|e| e.to_string())?;
    Ok((index, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edits() {
        assert_eq!(parse_edit("3=#ff0000").unwrap(), (3, Color::rgb(255, 0, 0)));
        assert_eq!(parse_edit("0 = 80ff0000").unwrap(), (0, Color::from_argb(0x80, 255, 0, 0)));
        assert!(parse_edit("3").is_err());
        assert!(parse_edit("x=#ff0000").is_err());
        assert!(parse_edit("1=red").is_err());
    }

    #[test]
    fn full_command_line() {
        let args = Args::try_parse_from([
            "palette-editor",
            "in.png",
            "--region",
            "1,2,3,4",
            "--set",
            "0=#000000",
            "--set",
            "1=#ffffff",
            "--undo",
            "1",
            "-o",
            "out.png",
            "--region-only",
            "--history",
            "clear",
            "--manual-rebuild",
        ])
        .unwrap();

        assert_eq!(args.region, Some(Region::new(1, 2, 3, 4)));
        assert_eq!(args.edits.len(), 2);
        assert_eq!(args.undo, 1);
        assert!(args.region_only);
        let config = args.document_config();
        assert_eq!(config.history_policy, HistoryPolicy::Clear);
        assert!(!config.rebuild_on_select);
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["palette-editor", "in.png"]).unwrap();
        assert_eq!(args.columns, MAX_PALETTE_COLUMNS);
        assert_eq!(args.document_config(), DocumentConfig::default());
    }

    #[test]
    fn region_only_needs_output() {
        assert!(Args::try_parse_from(["palette-editor", "in.png", "--region-only"]).is_err());
    }

    #[test]
    fn log_file_is_optional() {
        let args = Args::try_parse_from(["palette-editor", "in.png", "--tui", "--log-file", "run.log"]).unwrap();
        assert_eq!(args.log_file, Some(PathBuf::from("run.log")));
        assert!(Args::try_parse_from(["palette-editor", "in.png"]).unwrap().log_file.is_none());
    }

    #[test]
    fn tui_conflicts_with_output() {
        assert!(Args::try_parse_from(["palette-editor", "in.png", "--tui", "-o", "x.png"]).is_err());
    }
}
