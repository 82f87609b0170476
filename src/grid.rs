//! Room × slot timetable built from a solver's assignment list.
//!
//! Columns are the time slots sorted by `(day, start_time)`, rows are rooms in store
//! order. Each cell folds over the whole assignment list and keeps the last entry
//! placed at that room and slot; earlier entries for the same cell are overwritten
//! without being reported.

use crate::data::{Assignment, CourseName, Room, RoomName, SlotId, TimeSlot};
use itertools::Itertools;
use log::trace;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub room: RoomName,
    /// One entry per column; `None` renders as an empty cell.
    pub cells: Vec<Option<CourseName>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub columns: Vec<TimeSlot>,
    pub rows: Vec<GridRow>,
}

/// Builds the display grid. Inputs are not modified.
pub fn build_grid(time_slots: &[TimeSlot], rooms: &[Room], assignments: &[Assignment]) -> Grid {
    let columns: Vec<TimeSlot> = time_slots
        .iter()
        .sorted_by(|a, b| {
            a.day
                .cmp(&b.day)
                .then_with(|| a.start_time.cmp(&b.start_time))
        })
        .cloned()
        .collect();

    let rows = rooms
        .iter()
        .map(|room| GridRow {
            room: room.name.clone(),
            cells: columns
                .iter()
                .map(|slot| cell_course(&room.name, slot, assignments))
                .collect(),
        })
        .collect();

    trace!(
        "built {}x{} grid from {} assignments",
        rooms.len(),
        columns.len(),
        assignments.len()
    );
    Grid { columns, rows }
}

// last match wins; no early exit
fn cell_course(room: &str, slot: &TimeSlot, assignments: &[Assignment]) -> Option<CourseName> {
    assignments
        .iter()
        .fold(None::<&CourseName>, |cell, a| {
            if a.is_at(room, slot.slot_id) {
                Some(&a.course)
            } else {
                cell
            }
        })
        .cloned()
}

impl Grid {
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.cells.get(column)?.as_deref()
    }

    /// Looks a cell up by room name and slot id.
    pub fn course_at(&self, room: &str, slot_id: SlotId) -> Option<&str> {
        let column = self.columns.iter().position(|s| s.slot_id == slot_id)?;
        let row = self.rows.iter().position(|r| r.room == room)?;
        self.cell(row, column)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = std::iter::once("Room".to_string())
            .chain(
                self.columns
                    .iter()
                    .map(|s| format!("{} {}–{}", s.day, s.start_time, s.end_time)),
            )
            .join(" | ");
        writeln!(f, "{header}")?;
        for row in &self.rows {
            let line = std::iter::once(row.room.as_str())
                .chain(row.cells.iter().map(|c| c.as_deref().unwrap_or("")))
                .join(" | ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
