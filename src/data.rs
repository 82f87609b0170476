use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// Type aliases for clarity
pub type SlotId = u32;
pub type ProfessorName = String;
pub type RoomName = String;
pub type CourseName = String;

/// A professor and the slots they cannot, would like to, or would rather not teach in.
///
/// Slot ids are not checked against the time-slot collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Professor {
    pub name: ProfessorName,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotId>,
    #[serde(default)]
    pub preferred_slots: Vec<SlotId>,
    #[serde(default)]
    pub hates_slots: Vec<SlotId>,
}

/// Represents a physical room with a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub name: RoomName,
    pub capacity: u32,
    #[serde(default)]
    pub unavailable_slots: Vec<SlotId>,
}

/// A schedulable interval. `start_time`/`end_time` sort lexicographically (`HH:MM`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeSlot {
    #[serde(default)]
    pub slot_id: SlotId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// Represents a course to be scheduled.
///
/// `professor` is a weak reference to a [`Professor::name`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Course {
    pub name: CourseName,
    pub enrollment: u32,
    pub professor: ProfessorName,
    pub department: String,
    #[serde(default)]
    pub is_elective_for: Vec<String>,
}

/// The four entity collections, used to address store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Professors,
    Rooms,
    TimeSlots,
    Courses,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Professors,
        EntityKind::Rooms,
        EntityKind::TimeSlots,
        EntityKind::Courses,
    ];

    /// Key of this collection in the problem payload.
    pub fn key(self) -> &'static str {
        match self {
            EntityKind::Professors => "professors",
            EntityKind::Rooms => "rooms",
            EntityKind::TimeSlots => "time_slots",
            EntityKind::Courses => "courses",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The complete problem payload sent to the solver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Problem {
    pub professors: Vec<Professor>,
    pub rooms: Vec<Room>,
    pub time_slots: Vec<TimeSlot>,
    pub courses: Vec<Course>,
}

/// A single solver placement: `course` went to `room` at `slot_id`.
///
/// Either side may be absent when the solver could not place the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub course: CourseName,
    pub room: Option<RoomName>,
    pub slot_id: Option<SlotId>,
}

impl Assignment {
    pub fn new(course: impl Into<CourseName>, room: impl Into<RoomName>, slot_id: SlotId) -> Self {
        Self {
            course: course.into(),
            room: Some(room.into()),
            slot_id: Some(slot_id),
        }
    }

    pub fn is_at(&self, room: &str, slot_id: SlotId) -> bool {
        self.room.as_deref() == Some(room) && self.slot_id == Some(slot_id)
    }
}

/// Schedule returned by the solver.
///
/// On the wire `assignments` is an object keyed by course name. It is kept here as
/// a list in document order, which is the order the grid folds over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Schedule {
    #[serde(
        default,
        deserialize_with = "deserialize_assignments",
        serialize_with = "serialize_assignments"
    )]
    pub assignments: Vec<Assignment>,
}

fn deserialize_assignments<'de, D>(deserializer: D) -> Result<Vec<Assignment>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AssignmentsVisitor;

    impl<'de> Visitor<'de> for AssignmentsVisitor {
        type Value = Vec<Assignment>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping course names to [room, slot_id]")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut assignments = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((course, (room, slot_id))) =
                map.next_entry::<CourseName, (Option<RoomName>, Option<SlotId>)>()?
            {
                assignments.push(Assignment {
                    course,
                    room,
                    slot_id,
                });
            }
            Ok(assignments)
        }
    }

    deserializer.deserialize_map(AssignmentsVisitor)
}

fn serialize_assignments<S>(assignments: &[Assignment], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(assignments.len()))?;
    for a in assignments {
        map.serialize_entry(&a.course, &(&a.room, &a.slot_id))?;
    }
    map.end()
}

/// The solver's successful response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SolveResponse {
    pub cost: f64,
    pub happiness: f64,
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub explanation: Vec<String>,
    pub schedule: Schedule,
}
