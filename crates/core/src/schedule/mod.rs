mod format;
mod types;

pub use format::{
    format_date, format_day_schedule, format_exams, format_multi_day, semester_label,
    vietnamese_weekday, weekday_number, FAR_TIME_MESSAGE, NO_EXAMS_MESSAGE,
};
pub use types::{ClassSession, DaySchedule, ExamRecord, WeekWindow, WeeklySchedule};
