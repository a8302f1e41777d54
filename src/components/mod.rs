pub mod day_view;
pub mod month_view;
pub mod status_bar;
pub mod week_view;

pub use day_view::DayView;
pub use month_view::MonthView;
pub use status_bar::StatusBar;
pub use week_view::WeekView;
