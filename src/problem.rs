use crate::data::Problem;
use crate::store::EntityStore;

/// Snapshots the store into the payload posted to the solver.
///
/// Collections are copied verbatim and in store order. No validation happens here;
/// dangling professor or slot references are the solver's business.
pub fn serialize(store: &EntityStore) -> Problem {
    Problem {
        professors: store.professors().to_vec(),
        rooms: store.rooms().to_vec(),
        time_slots: store.time_slots().to_vec(),
        courses: store.courses().to_vec(),
    }
}
