pub mod responsive;
pub mod sankey;
