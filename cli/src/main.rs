use std::{fs::File, io::BufReader};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use stack_view_core::{EntryCollection, ImageStack, StackConfig};
use tracing::info;

use crate::{args::Cli, summary::PrintSink};

mod args;
mod data;
mod summary;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    let config = load_config(&args)?;

    let arrays = match &args.raw {
        Some(path) => data::read_raw_file(path, &args.shapes)?,
        None => data::synthesize(&args.shapes)?,
    };
    let collection: EntryCollection<f32> = arrays.into_iter().collect();

    let mut stack = ImageStack::new(collection, config, PrintSink::new(args.values, args.json))?;
    info!(
        baseline = %stack.baseline(),
        grid = ?stack.grid_shape(),
        "Showing {} arrays",
        stack.len()
    );
    for axis in stack.tracked() {
        info!(axis = %axis.label, max = axis.max_index, "Tracking axis");
    }

    for event in &args.events {
        let affected = stack
            .set_index(event.label, event.value)
            .wrap_err_with(|| format!("Setting {}={}", event.label, event.value))?;
        info!(
            axis = %event.label,
            value = event.value,
            affected = affected.len(),
            "Moved cursor"
        );
    }

    info!(frames = stack.sink().received, "Done");
    Ok(())
}

fn load_config(args: &Cli) -> eyre::Result<StackConfig> {
    let config = match &args.config {
        Some(path) => {
            let file =
                File::open(path).wrap_err_with(|| format!("Opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .wrap_err_with(|| format!("Parsing {}", path.display()))?
        }
        None => StackConfig::default(),
    };
    Ok(merge_flags(config, args))
}

/// Flags given on the command line replace the values from the config file.
fn merge_flags(mut config: StackConfig, args: &Cli) -> StackConfig {
    if let Some(order) = &args.axes_order {
        config = config.with_axes_order(order.as_str());
    }
    if !args.sliders.is_empty() {
        config = config.with_slider_axes(args.sliders.iter().copied());
    }
    if let Some(grid) = args.grid {
        config = config.with_grid_shape(grid);
    }
    config
}

#[cfg(test)]
mod tests {
    use stack_view_core::{AxesOrderSpec, DimensionRef, GridShape};

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(["stack-view", "--shape", "2,3,4"].iter().chain(args)).unwrap()
    }

    #[test]
    fn flags_override_config() {
        let config: StackConfig = serde_json::from_str(
            r#"{
                "axes_order": "xyt",
                "slider_axes": ["t"],
                "grid_shape": { "rows": 2, "cols": 2 }
            }"#,
        )
        .unwrap();

        let args = cli(&["--axes-order", "txy", "--slider", "0"]);
        let merged = merge_flags(config.clone(), &args);
        assert_eq!(merged.axes_order, Some(AxesOrderSpec::from("txy")));
        assert_eq!(merged.slider_axes, Some(vec![DimensionRef::Index(0)]));
        assert_eq!(merged.grid_shape, Some(GridShape::new(2, 2)));

        assert_eq!(merge_flags(config.clone(), &cli(&[])), config);
    }

    #[test]
    fn runs_cursor_events() {
        let args = cli(&["--set", "t=1"]);
        let arrays = data::synthesize(&args.shapes).unwrap();
        let mut stack = ImageStack::new(
            arrays.into_iter().collect(),
            merge_flags(StackConfig::default(), &args),
            PrintSink::default(),
        )
        .unwrap();

        for event in &args.events {
            stack.set_index(event.label, event.value).unwrap();
        }
        assert_eq!(stack.sink().received, 2);
        assert!(stack.set_index('t', 2).is_err());
    }
}
