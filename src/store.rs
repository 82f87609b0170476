//! In-memory authoring model.
//!
//! [`EntityStore`] owns the four ordered collections and the slot id counter.
//! Nothing here checks references between entities; a course may name a professor
//! that does not exist and a professor may list slot ids nobody created. The solver
//! decides what to do with those.

use crate::allocator::SlotIdAllocator;
use crate::data::{Course, EntityKind, Professor, Room, SlotId, TimeSlot};
use crate::error::{PlannerError, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Raw professor form. Slot lists are comma separated text.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfessorDraft {
    pub name: String,
    pub unavailable_slots: String,
    pub preferred_slots: String,
    pub hates_slots: String,
}

/// Raw room form. `capacity` is text, but a JSON number is accepted too.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RoomDraft {
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub capacity: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeSlotDraft {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CourseDraft {
    pub name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub enrollment: String,
    pub professor: String,
    pub department: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormField {
    Text(String),
    Number(Number),
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FormField::deserialize(deserializer)? {
        FormField::Text(text) => text,
        FormField::Number(n) => n.to_string(),
    })
}

/// User input for a manual add, one variant per collection.
#[derive(Debug, Clone)]
pub enum Draft {
    Professor(ProfessorDraft),
    Room(RoomDraft),
    TimeSlot(TimeSlotDraft),
    Course(CourseDraft),
}

impl Draft {
    pub fn kind(&self) -> EntityKind {
        match self {
            Draft::Professor(_) => EntityKind::Professors,
            Draft::Room(_) => EntityKind::Rooms,
            Draft::TimeSlot(_) => EntityKind::TimeSlots,
            Draft::Course(_) => EntityKind::Courses,
        }
    }

    /// Decodes a form submitted as JSON for the given collection.
    pub fn from_value(kind: EntityKind, value: Value) -> Result<Self> {
        let draft = match kind {
            EntityKind::Professors => Draft::Professor(decode_form(value)?),
            EntityKind::Rooms => Draft::Room(decode_form(value)?),
            EntityKind::TimeSlots => Draft::TimeSlot(decode_form(value)?),
            EntityKind::Courses => Draft::Course(decode_form(value)?),
        };
        Ok(draft)
    }
}

fn decode_form<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| PlannerError::format(format!("Invalid form: {e}")))
}

/// Parses comma separated slot ids, dropping blank and non-numeric tokens.
pub fn parse_slot_list(text: &str) -> Vec<SlotId> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect()
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PlannerError::Validation { field });
    }
    Ok(value.to_string())
}

fn positive(value: &str, field: &'static str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PlannerError::Validation { field }),
    }
}

/// Authoritative holder of the four entity collections.
///
/// Collections keep insertion order. Indices are positional and shift after a
/// delete, so callers should take them from a fresh listing.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    professors: Vec<Professor>,
    rooms: Vec<Room>,
    time_slots: Vec<TimeSlot>,
    courses: Vec<Course>,
    slot_ids: SlotIdAllocator,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn professors(&self) -> &[Professor] {
        &self.professors
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Names for the course form's professor selection, in store order.
    pub fn professor_names(&self) -> Vec<&str> {
        self.professors.iter().map(|p| p.name.as_str()).collect()
    }

    /// The id the next manually added time slot will receive, if any are left.
    pub fn next_slot_id(&self) -> Option<SlotId> {
        self.slot_ids.peek()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Professors => self.professors.len(),
            EntityKind::Rooms => self.rooms.len(),
            EntityKind::TimeSlots => self.time_slots.len(),
            EntityKind::Courses => self.courses.len(),
        }
    }

    /// Validates a draft and appends the resulting entity. Returns its index.
    pub fn add(&mut self, draft: Draft) -> Result<usize> {
        let kind = draft.kind();
        match draft {
            Draft::Professor(d) => {
                let name = required(&d.name, "name")?;
                self.professors.push(Professor {
                    name,
                    unavailable_slots: parse_slot_list(&d.unavailable_slots),
                    preferred_slots: parse_slot_list(&d.preferred_slots),
                    hates_slots: parse_slot_list(&d.hates_slots),
                });
            }
            Draft::Room(d) => {
                let name = required(&d.name, "name")?;
                let capacity = positive(&d.capacity, "capacity")?;
                self.rooms.push(Room {
                    name,
                    capacity,
                    unavailable_slots: Vec::new(),
                });
            }
            Draft::TimeSlot(d) => {
                let day = required(&d.day, "day")?;
                let start_time = required(&d.start_time, "start_time")?;
                let end_time = required(&d.end_time, "end_time")?;
                let slot_id = self.slot_ids.next().ok_or(PlannerError::SlotIdsExhausted)?;
                self.time_slots.push(TimeSlot {
                    slot_id,
                    day,
                    start_time,
                    end_time,
                });
            }
            Draft::Course(d) => {
                let name = required(&d.name, "name")?;
                let enrollment = positive(&d.enrollment, "enrollment")?;
                let professor = required(&d.professor, "professor")?;
                let department = required(&d.department, "department")?;
                self.courses.push(Course {
                    name,
                    enrollment,
                    professor,
                    department,
                    is_elective_for: Vec::new(),
                });
            }
        }
        let index = self.len(kind) - 1;
        debug!("added {kind}[{index}]");
        Ok(index)
    }

    /// Removes the entity at `index`; later entities shift down by one.
    pub fn delete(&mut self, kind: EntityKind, index: usize) -> Result<()> {
        let len = self.len(kind);
        if index >= len {
            return Err(PlannerError::Index { kind, index, len });
        }
        match kind {
            EntityKind::Professors => {
                self.professors.remove(index);
            }
            EntityKind::Rooms => {
                self.rooms.remove(index);
            }
            EntityKind::TimeSlots => {
                self.time_slots.remove(index);
            }
            EntityKind::Courses => {
                self.courses.remove(index);
            }
        }
        debug!("deleted {kind}[{index}]");
        Ok(())
    }

    /// Appends imported entities without deduplication. All or nothing: if the
    /// value is not an array, or any element has the wrong shape, nothing changes.
    ///
    /// Returns the number of entities appended.
    pub fn merge_import(&mut self, kind: EntityKind, items: Value) -> Result<usize> {
        if !items.is_array() {
            return Err(PlannerError::format("JSON must be an array."));
        }
        let added = match kind {
            EntityKind::Professors => append(&mut self.professors, items, kind)?,
            EntityKind::Rooms => append(&mut self.rooms, items, kind)?,
            EntityKind::TimeSlots => {
                let added = append(&mut self.time_slots, items, kind)?;
                if added > 0 {
                    self.slot_ids.reconcile(&self.time_slots);
                }
                added
            }
            EntityKind::Courses => append(&mut self.courses, items, kind)?,
        };
        info!("merged {added} {kind} (now {})", self.len(kind));
        Ok(added)
    }

    /// [`merge_import`](Self::merge_import) from raw file text.
    pub fn merge_import_json(&mut self, kind: EntityKind, text: &str) -> Result<usize> {
        let items = parse_file(text)?;
        self.merge_import(kind, items)
    }

    /// Replaces all four collections from one problem object.
    ///
    /// A field that is missing, not an array, or holds a malformed element becomes
    /// empty instead of failing the import. Only a non-object snapshot is rejected.
    pub fn replace_all(&mut self, snapshot: Value) -> Result<()> {
        let Value::Object(mut fields) = snapshot else {
            return Err(PlannerError::format("Invalid JSON."));
        };
        let mut take = |kind: EntityKind| fields.remove(kind.key());

        self.professors = collection_or_empty(take(EntityKind::Professors), EntityKind::Professors);
        self.rooms = collection_or_empty(take(EntityKind::Rooms), EntityKind::Rooms);
        self.time_slots = collection_or_empty(take(EntityKind::TimeSlots), EntityKind::TimeSlots);
        self.courses = collection_or_empty(take(EntityKind::Courses), EntityKind::Courses);

        if !self.time_slots.is_empty() {
            self.slot_ids.reconcile(&self.time_slots);
        }
        info!(
            "replaced problem: {} professors, {} rooms, {} time slots, {} courses",
            self.professors.len(),
            self.rooms.len(),
            self.time_slots.len(),
            self.courses.len()
        );
        Ok(())
    }

    /// [`replace_all`](Self::replace_all) from raw file text.
    pub fn replace_all_json(&mut self, text: &str) -> Result<()> {
        let snapshot = parse_file(text)?;
        self.replace_all(snapshot)
    }

    /// One collection as a JSON array, in store order.
    pub fn export(&self, kind: EntityKind) -> Result<Value> {
        let exported = match kind {
            EntityKind::Professors => serde_json::to_value(&self.professors)?,
            EntityKind::Rooms => serde_json::to_value(&self.rooms)?,
            EntityKind::TimeSlots => serde_json::to_value(&self.time_slots)?,
            EntityKind::Courses => serde_json::to_value(&self.courses)?,
        };
        Ok(exported)
    }
}

fn parse_file(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|_| PlannerError::format("Invalid JSON file."))
}

fn append<T: DeserializeOwned>(target: &mut Vec<T>, items: Value, kind: EntityKind) -> Result<usize> {
    let parsed: Vec<T> = serde_json::from_value(items)
        .map_err(|e| PlannerError::format(format!("Invalid {kind} entry: {e}")))?;
    let added = parsed.len();
    target.extend(parsed);
    Ok(added)
}

fn collection_or_empty<T: DeserializeOwned>(field: Option<Value>, kind: EntityKind) -> Vec<T> {
    match field {
        Some(value @ Value::Array(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("dropping malformed {kind} field: {e}");
            Vec::new()
        }),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn professor(name: &str) -> Draft {
        Draft::Professor(ProfessorDraft {
            name: name.into(),
            ..Default::default()
        })
    }

    fn slot(day: &str, start: &str) -> Draft {
        Draft::TimeSlot(TimeSlotDraft {
            day: day.into(),
            start_time: start.into(),
            end_time: "23:59".into(),
        })
    }

    #[test]
    fn professor_slot_text_drops_non_numeric_tokens() {
        let mut store = EntityStore::new();
        store
            .add(Draft::Professor(ProfessorDraft {
                name: "  Hopper ".into(),
                unavailable_slots: "1, 2, a, 3".into(),
                preferred_slots: "".into(),
                hates_slots: " ,4,,".into(),
            }))
            .unwrap();

        let p = &store.professors()[0];
        assert_eq!(p.name, "Hopper");
        assert_eq!(p.unavailable_slots, vec![1, 2, 3]);
        assert!(p.preferred_slots.is_empty());
        assert_eq!(p.hates_slots, vec![4]);
    }

    #[test]
    fn blank_professor_name_is_rejected() {
        let mut store = EntityStore::new();
        let err = store.add(professor("   ")).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { field: "name" }));
        assert!(store.professors().is_empty());
    }

    #[test]
    fn course_requires_every_field() {
        let mut store = EntityStore::new();
        let draft = CourseDraft {
            name: "CS101".into(),
            enrollment: "0".into(),
            professor: "Hopper".into(),
            department: "CS".into(),
        };
        let err = store.add(Draft::Course(draft.clone())).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { field: "enrollment" }));

        let err = store
            .add(Draft::Course(CourseDraft {
                enrollment: "30".into(),
                department: " ".into(),
                ..draft.clone()
            }))
            .unwrap_err();
        assert!(matches!(err, PlannerError::Validation { field: "department" }));

        store
            .add(Draft::Course(CourseDraft {
                enrollment: "30".into(),
                ..draft
            }))
            .unwrap();
        assert_eq!(store.courses()[0].enrollment, 30);
        assert!(store.courses()[0].is_elective_for.is_empty());
    }

    #[test]
    fn room_capacity_must_be_positive() {
        let mut store = EntityStore::new();
        let bad = Draft::Room(RoomDraft {
            name: "Room A".into(),
            capacity: "lots".into(),
        });
        assert!(matches!(
            store.add(bad),
            Err(PlannerError::Validation { field: "capacity" })
        ));

        store
            .add(Draft::Room(RoomDraft {
                name: "Room A".into(),
                capacity: "40".into(),
            }))
            .unwrap();
        assert_eq!(store.rooms()[0].capacity, 40);
        assert!(store.rooms()[0].unavailable_slots.is_empty());
    }

    #[test]
    fn added_slots_get_increasing_ids() {
        let mut store = EntityStore::new();
        store.add(slot("Mon", "09:00")).unwrap();
        store.add(slot("Tue", "09:00")).unwrap();
        let ids: Vec<SlotId> = store.time_slots().iter().map(|s| s.slot_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn delete_removes_only_that_position() {
        let mut store = EntityStore::new();
        for name in ["A", "B", "C", "D"] {
            store.add(professor(name)).unwrap();
        }
        store.delete(EntityKind::Professors, 1).unwrap();
        assert_eq!(store.professor_names(), vec!["A", "C", "D"]);

        let err = store.delete(EntityKind::Professors, 3).unwrap_err();
        assert!(matches!(err, PlannerError::Index { index: 3, len: 3, .. }));
    }

    #[test]
    fn imported_slot_ids_push_the_counter_forward() {
        let mut store = EntityStore::new();
        store
            .merge_import(
                EntityKind::TimeSlots,
                json!([
                    {"slot_id": 5, "day": "Mon", "start_time": "09:00", "end_time": "10:00"},
                    {"slot_id": 7, "day": "Mon", "start_time": "10:00", "end_time": "11:00"}
                ]),
            )
            .unwrap();
        store.add(slot("Tue", "09:00")).unwrap();
        assert_eq!(store.time_slots()[2].slot_id, 8);
    }

    #[test]
    fn exhausted_slot_ids_fail_the_add() {
        let mut store = EntityStore::new();
        store
            .merge_import(
                EntityKind::TimeSlots,
                json!([{"slot_id": SlotId::MAX, "day": "Mon", "start_time": "09:00", "end_time": "10:00"}]),
            )
            .unwrap();

        let err = store.add(slot("Tue", "09:00")).unwrap_err();
        assert!(matches!(err, PlannerError::SlotIdsExhausted));
        assert!(store.add(slot("Wed", "09:00")).is_err());

        let ids: Vec<SlotId> = store.time_slots().iter().map(|s| s.slot_id).collect();
        assert_eq!(ids, vec![SlotId::MAX]);
    }

    #[test]
    fn empty_slot_merge_keeps_the_counter() {
        let mut store = EntityStore::new();
        store.add(slot("Mon", "09:00")).unwrap();
        store.add(slot("Mon", "10:00")).unwrap();

        let added = store.merge_import(EntityKind::TimeSlots, json!([])).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.next_slot_id(), Some(3));
    }

    #[test]
    fn numeric_form_fields_accept_json_numbers() {
        let mut store = EntityStore::new();
        let room = Draft::from_value(EntityKind::Rooms, json!({"name": "Room A", "capacity": 40})).unwrap();
        store.add(room).unwrap();
        assert_eq!(store.rooms()[0].capacity, 40);

        let course = Draft::from_value(
            EntityKind::Courses,
            json!({"name": "CS101", "enrollment": 30, "professor": "Hopper", "department": "CS"}),
        )
        .unwrap();
        store.add(course).unwrap();
        assert_eq!(store.courses()[0].enrollment, 30);

        let fractional = Draft::from_value(
            EntityKind::Courses,
            json!({"name": "CS102", "enrollment": 2.5, "professor": "Hopper", "department": "CS"}),
        )
        .unwrap();
        assert!(matches!(
            store.add(fractional),
            Err(PlannerError::Validation { field: "enrollment" })
        ));
    }

    #[test]
    fn merge_appends_without_dedup() {
        let mut store = EntityStore::new();
        store.add(professor("Hopper")).unwrap();
        let added = store
            .merge_import(EntityKind::Professors, json!([{"name": "Hopper"}, {"name": "Knuth"}]))
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.professor_names(), vec!["Hopper", "Hopper", "Knuth"]);
    }

    #[test]
    fn merge_rejects_non_arrays_and_bad_elements_atomically() {
        let mut store = EntityStore::new();
        let err = store
            .merge_import(EntityKind::Rooms, json!({"name": "Room A", "capacity": 10}))
            .unwrap_err();
        assert_eq!(err.to_string(), "JSON must be an array.");

        let err = store
            .merge_import(
                EntityKind::Rooms,
                json!([{"name": "Room A", "capacity": 10}, {"name": "Room B"}]),
            )
            .unwrap_err();
        assert!(matches!(err, PlannerError::Format { .. }));
        assert!(store.rooms().is_empty());
    }

    #[test]
    fn merge_from_text_rejects_invalid_json() {
        let mut store = EntityStore::new();
        let err = store.merge_import_json(EntityKind::Courses, "[{").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON file.");
    }

    #[test]
    fn replace_all_degrades_bad_fields_to_empty() {
        let mut store = EntityStore::new();
        store.add(professor("Hopper")).unwrap();
        store.add(slot("Mon", "09:00")).unwrap();

        store
            .replace_all(json!({
                "rooms": [{"name": "Room A", "capacity": 30}],
                "courses": "not-an-array"
            }))
            .unwrap();

        assert_eq!(store.rooms().len(), 1);
        assert!(store.courses().is_empty());
        assert!(store.professors().is_empty());
        assert!(store.time_slots().is_empty());
    }

    #[test]
    fn replace_all_drops_field_with_malformed_element() {
        let mut store = EntityStore::new();
        store
            .replace_all(json!({
                "professors": [{"name": "Hopper"}, {"unavailable_slots": [1]}],
                "time_slots": [{"slot_id": 9, "day": "Fri", "start_time": "08:00", "end_time": "09:00"}]
            }))
            .unwrap();
        assert!(store.professors().is_empty());
        assert_eq!(store.next_slot_id(), Some(10));
    }

    #[test]
    fn replace_all_from_invalid_text_leaves_store_alone() {
        let mut store = EntityStore::new();
        store.add(professor("Hopper")).unwrap();
        store.add(slot("Mon", "09:00")).unwrap();

        let err = store.replace_all_json("{\"rooms\": [").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON file.");
        assert_eq!(store.professor_names(), vec!["Hopper"]);
        assert_eq!(store.time_slots().len(), 1);
        assert_eq!(store.next_slot_id(), Some(2));
    }

    #[test]
    fn replace_all_rejects_non_objects() {
        let mut store = EntityStore::new();
        store.add(professor("Hopper")).unwrap();
        assert!(store.replace_all(json!([1, 2])).is_err());
        assert_eq!(store.professors().len(), 1);
    }

    #[test]
    fn export_lists_collection_in_order() {
        let mut store = EntityStore::new();
        store.add(professor("B")).unwrap();
        store.add(professor("A")).unwrap();
        let exported = store.export(EntityKind::Professors).unwrap();
        assert_eq!(exported[0]["name"], "B");
        assert_eq!(exported[1]["name"], "A");
    }
}
