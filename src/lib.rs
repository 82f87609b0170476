//! Authoring model for university course-timetabling problems.
//!
//! Professors, rooms, time slots and courses are edited in an [`EntityStore`],
//! snapshotted into a [`Problem`] for a remote solver, and the solver's
//! assignments are laid out as a room × slot [`Grid`].

pub mod allocator;
pub mod config;
pub mod data;
pub mod error;
pub mod grid;
pub mod problem;
pub mod report;
pub mod server;
pub mod solver;
pub mod store;

pub use allocator::SlotIdAllocator;
pub use config::Config;
pub use data::{
    Assignment, Course, EntityKind, Problem, Professor, Room, Schedule, SlotId, SolveResponse,
    TimeSlot,
};
pub use error::{PlannerError, Result};
pub use grid::{Grid, GridRow, build_grid};
pub use report::SolveReport;
pub use solver::SolverClient;
pub use store::{CourseDraft, Draft, EntityStore, ProfessorDraft, RoomDraft, TimeSlotDraft};
