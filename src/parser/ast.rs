// Abstract syntax for the mapping DSL

use crate::grid::SplitBy;
use crate::mapping::AggregationMode;

/// One `|`-separated command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Labels(usize),
    Values(Vec<usize>),
    Series(Vec<usize>),
    Categories(Vec<usize>),
    Aggregate(AggregationMode),
    Grid(GridSpec),
}

/// `grid(by: value, ncol: 2)`
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub by: SplitBy,
    pub ncol: Option<usize>,
}

/// Settings collected from a full pipeline. `None` means "not mentioned",
/// which leaves the corresponding configuration untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingSpec {
    pub labels: Option<usize>,
    pub values: Option<Vec<usize>>,
    pub series: Option<Vec<usize>>,
    pub categories: Option<Vec<usize>>,
    pub aggregation: Option<AggregationMode>,
    pub grid: Option<GridSpec>,
}
