//! Library for `csvsankey`
//! Turns multi-column flow CSV files into `source,target,value` edge lists and
//! renders them as Sankey diagrams.

pub mod core;

pub use self::core::*;
