#![forbid(unsafe_code)]
//! lazyseq-operators: deferred-execution sequence operators.
//!
//! Design intent:
//! - Every operator takes any `IntoIterator` and either returns a lazy adapter
//!   (`Where`, `Select`, `OfType`, `GroupBy`, `OrderBy`, `Distinct`), a single
//!   element (`first*`), or a bool (`any*`, `all_matching`).
//! - Adapters carry an explicit `Traversal` state and are fused.
//! - `GroupBy`/`OrderBy` consume the whole source on their first pull; that is
//!   required for correct buckets, not an optimization target.
//! - Pure and synchronous. Callback panics propagate untouched.
//!
//! Each operator is available as a free function and as a `SequenceExt` method.

pub mod plan;
pub mod traits;

pub mod filter;
pub mod map;
pub mod of_type;

pub mod first;
pub mod quantify;

mod bucket;
pub mod distinct;
pub mod group;
pub mod sort;

pub use distinct::{distinct, distinct_by_scan, Distinct, DistinctByScan};
pub use filter::{where_matching, Where};
pub use first::{first, first_element, first_or, first_or_default};
pub use group::{group_by, group_by_key, group_by_scan, GroupBy, GroupByKey, GroupByScan};
pub use map::{select, Select};
pub use of_type::{of_type, OfType};
pub use plan::{Evaluation, OpKind, OpPlan};
pub use quantify::{all_matching, any_element, any_matching};
pub use sort::{order_by, order_by_descending, Direction, OrderBy};
pub use traits::{Cursor, Operator, SequenceExt, Traversal};
