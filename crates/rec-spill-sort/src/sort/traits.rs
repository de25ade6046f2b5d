use crate::Result;
use std::cmp::Ordering;

/// Forward-only producer of records to sort.
///
/// Sources are read exactly once per sort; an `Ok(None)` is final and the
/// engine never calls `next_record` again after seeing it.
pub trait RecordSource {
    type Record;

    fn next_record(&mut self) -> Result<Option<Self::Record>>;
}

/// Encodes records into spill runs and back.
///
/// `encode` appends to a payload buffer the engine has already cleared;
/// `decode` receives exactly the bytes one `encode` call produced.
pub trait RecordCodec {
    type Record;

    fn encode(&self, record: &Self::Record, payload: &mut Vec<u8>) -> Result<()>;
    fn decode(&self, payload: &[u8]) -> Result<Self::Record>;
}

/// Comparator for record types with an intrinsic order.
pub fn natural_order<T: Ord>() -> impl Fn(&T, &T) -> Ordering {
    |a: &T, b: &T| a.cmp(b)
}
