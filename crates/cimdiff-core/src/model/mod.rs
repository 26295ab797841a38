pub mod record;
pub mod record_set;
pub mod units;
pub mod value;

pub use record::Record;
pub use record_set::RecordSet;
pub use units::{UnitMultiplier, UnitSymbol};
pub use value::{PropertyValue, Quantity, Scalar, TypedReference};
