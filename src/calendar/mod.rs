pub mod event;
pub mod grid;
pub mod store;

pub use event::{CalendarEvent, EventKind};
pub use grid::{build_month_grid, index_events_by_date, DayCell, EventIndex};
pub use store::{EventSource, Store};
