use std::{fmt, path::PathBuf, str::FromStr};

use clap::Parser;
use stack_view_core::{AxisLabel, DimensionRef, GridShape};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shape of one array, e.g. `10,4,8,8`. Repeat once per array.
    #[arg(short, long = "shape", value_name = "DIMS", required = true)]
    pub shapes: Vec<Shape>,

    /// Axis order shared by all arrays, e.g. `tzxy`
    #[arg(short, long, value_name = "ORDER")]
    pub axes_order: Option<String>,

    /// Axis that gets a cursor, as a label or a dimension index
    #[arg(long = "slider", value_name = "AXIS", value_parser = parse_dimension_ref)]
    pub sliders: Vec<DimensionRef>,

    /// Cursor change applied after construction, e.g. `t=5`
    #[arg(long = "set", value_name = "AXIS=INDEX")]
    pub events: Vec<SetIndex>,

    /// Grid layout, e.g. `2x1`
    #[arg(short, long, value_name = "ROWSxCOLS", value_parser = parse_grid_shape)]
    pub grid: Option<GridShape>,

    /// JSON stack config, command line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Little-endian f32 data of all arrays, one after the other
    #[arg(short, long, value_name = "FILE")]
    pub raw: Option<PathBuf>,

    /// Print the values of every frame, not only its statistics
    #[arg(long)]
    pub values: bool,

    /// Print one JSON object per frame
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    /// `None` if the count does not fit in a `usize`.
    pub fn element_count(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, x| acc.checked_mul(*x))
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dims = s
            .split(',')
            .map(|x| {
                x.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("Invalid dimension '{x}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let shape = Shape(dims);
        match shape.element_count() {
            Some(_) => Ok(shape),
            None => Err(format!("Shape '{s}' has too many elements")),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<_> = self.0.iter().map(|x| x.to_string()).collect();
        f.write_str(&dims.join(","))
    }
}

/// A cursor event as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetIndex {
    pub label: AxisLabel,
    pub value: usize,
}

impl FromStr for SetIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, value) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected AXIS=INDEX, got '{s}'"))?;
        let label = single_char(label)?;
        let value = value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid index '{value}': {e}"))?;
        Ok(SetIndex {
            label: AxisLabel::new(label),
            value,
        })
    }
}

fn single_char(s: &str) -> Result<char, String> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("Axis labels are single characters, got '{s}'")),
    }
}

fn parse_dimension_ref(s: &str) -> Result<DimensionRef, String> {
    match s.trim().parse::<usize>() {
        Ok(dim) => Ok(DimensionRef::Index(dim)),
        Err(_) => single_char(s).map(|c| DimensionRef::Label(AxisLabel::new(c))),
    }
}

fn parse_grid_shape(s: &str) -> Result<GridShape, String> {
    let (rows, cols) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("Expected ROWSxCOLS, got '{s}'"))?;
    let parse = |x: &str| {
        x.trim()
            .parse::<usize>()
            .map_err(|e| format!("Invalid grid size '{x}': {e}"))
    };
    Ok(GridShape::new(parse(rows)?, parse(cols)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shape() {
        assert_eq!("10,4, 8,8".parse::<Shape>().unwrap(), Shape(vec![10, 4, 8, 8]));
        assert_eq!(Shape(vec![10, 4, 8, 8]).element_count(), Some(2560));
        assert!("10,,8".parse::<Shape>().is_err());
    }

    #[test]
    fn rejects_overflowing_shape() {
        let huge = format!("{},{},2", usize::MAX, usize::MAX);
        assert_eq!(Shape(vec![usize::MAX, 2]).element_count(), None);
        assert!(huge.parse::<Shape>().is_err());
        assert!(Cli::try_parse_from(["stack-view", "--shape", huge.as_str()]).is_err());
    }

    #[test]
    fn parses_set_index() {
        assert_eq!(
            "t=5".parse::<SetIndex>().unwrap(),
            SetIndex {
                label: AxisLabel::TIME,
                value: 5
            }
        );
        assert!("t5".parse::<SetIndex>().is_err());
        assert!("tz=5".parse::<SetIndex>().is_err());
        assert!("t=-1".parse::<SetIndex>().is_err());
    }

    #[test]
    fn parses_dimension_refs() {
        assert_eq!(parse_dimension_ref("z").unwrap(), DimensionRef::Label(AxisLabel::Z));
        assert_eq!(parse_dimension_ref("2").unwrap(), DimensionRef::Index(2));
        assert!(parse_dimension_ref("zz").is_err());
    }

    #[test]
    fn parses_grid_shape() {
        assert_eq!(parse_grid_shape("2x1").unwrap(), GridShape::new(2, 1));
        assert!(parse_grid_shape("2").is_err());
    }

    #[test]
    fn parses_command_line() {
        let cli = Cli::try_parse_from([
            "stack-view",
            "--shape",
            "10,4,8,8",
            "--shape",
            "10,4,8,8",
            "--axes-order",
            "tzxy",
            "--slider",
            "t",
            "--set",
            "t=5",
        ])
        .unwrap();

        assert_eq!(cli.shapes.len(), 2);
        assert_eq!(cli.axes_order.as_deref(), Some("tzxy"));
        assert_eq!(cli.sliders, [DimensionRef::Label(AxisLabel::TIME)]);
        assert_eq!(cli.events[0].value, 5);
    }
}
