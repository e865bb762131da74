//! The chart object graph.
//!
//! Nodes hold only the properties that were explicitly assigned, so the
//! graph distinguishes an unset property from one set to null. Chart
//! nodes additionally own an out-of-band data source that the exporters
//! splice in and the importers pull out.

mod node;

pub use node::{ChartNode, DataSource, Node, ObjectNode, PropValue};
