/*!
Descriptive statistics for constituency-level election results.

The crate holds an in-memory [`Dataset`] of election result records, the
cleaning steps applied to it, and the ten insights of the election report:
party and status tallies, the distribution of winning margins, the seat table
by state, the gender tally, the constituencies with the highest voter turnout
and the average margin by state.

```
use election_stats::*;

let headers = vec!["State/UT".to_string(), "Margin".to_string()];
let rows = vec![
    vec!["Goa".to_string(), "10".to_string()],
    vec!["Goa".to_string(), "n/a".to_string()],
];
let mut pipeline = Pipeline::new(Dataset::from_rows(headers, rows)?, InsightSettings::DEFAULT_SETTINGS);
pipeline.clean();
let outcome = pipeline.run_insight(Insight::MarginByState);
assert!(outcome.data().is_some());
# Ok::<(), DatasetError>(())
```
*/

mod dataset;
mod describe;
mod insights;
mod pipeline;
mod schema;
mod tally;

pub use crate::dataset::*;
pub use crate::describe::*;
pub use crate::insights::*;
pub use crate::pipeline::*;
pub use crate::schema::*;
pub use crate::tally::*;
