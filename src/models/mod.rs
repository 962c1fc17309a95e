pub mod exam;
pub mod roster;
pub mod student;

pub use exam::ExamLabel;
pub use roster::{EntryUpdate, RosterConfiguration, RosterShapeError, RosterState, FIRST_ENTRY_ID};
pub use student::StudentEntry;
