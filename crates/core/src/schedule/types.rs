//! Schedule and exam domain types.
//!
//! These mirror the records served by the university information system:
//! class sessions arrive grouped into week windows, exams arrive as one
//! flat list per semester. All types are immutable once fetched.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One scheduled class meeting on a concrete date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    pub subject_name: String,
    /// English subject name, when the curriculum provides one.
    pub subject_name_en: Option<String>,
    pub subject_code: String,
    /// First teaching period of the slot (1-based).
    pub start_period: u32,
    /// Number of consecutive periods.
    pub period_count: u32,
    pub room: String,
    pub instructor: String,
    pub instructor_id: Option<String>,
    pub credits: Option<u32>,
    pub date: NaiveDate,
}

impl ClassSession {
    /// Creates a session with a one-period slot and empty location data.
    pub fn new(
        subject_name: impl Into<String>,
        subject_code: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            subject_name_en: None,
            subject_code: subject_code.into(),
            start_period: 1,
            period_count: 1,
            room: String::new(),
            instructor: String::new(),
            instructor_id: None,
            credits: None,
            date,
        }
    }

    pub fn with_english_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name_en = Some(name.into());
        self
    }

    pub fn with_periods(mut self, start_period: u32, period_count: u32) -> Self {
        self.start_period = start_period;
        self.period_count = period_count;
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    pub fn with_instructor_id(mut self, id: impl Into<String>) -> Self {
        self.instructor_id = Some(id.into());
        self
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = Some(credits);
        self
    }

    /// Last teaching period of the slot, inclusive.
    pub fn end_period(&self) -> u32 {
        self.start_period + self.period_count.saturating_sub(1)
    }
}

/// One week window of the semester timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sessions: Vec<ClassSession>,
}

impl WeekWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, sessions: Vec<ClassSession>) -> Self {
        Self {
            start,
            end,
            sessions,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The bulk timetable blob for a semester: one or more week windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub semester: String,
    pub weeks: Vec<WeekWindow>,
}

impl WeeklySchedule {
    pub fn new(semester: impl Into<String>, weeks: Vec<WeekWindow>) -> Self {
        Self {
            semester: semester.into(),
            weeks,
        }
    }

    /// Finds the week window containing the given date.
    pub fn find_window(&self, date: NaiveDate) -> Option<&WeekWindow> {
        self.weeks.iter().find(|week| week.contains(date))
    }

    /// Class sessions held on the given date.
    ///
    /// Looks inside the matching week window first; when no window covers
    /// the date (windows occasionally have gaps around holidays), falls
    /// back to scanning every window for sessions dated exactly on it.
    pub fn classes_on(&self, date: NaiveDate) -> Vec<ClassSession> {
        let sessions: Vec<&ClassSession> = match self.find_window(date) {
            Some(window) => window.sessions.iter().collect(),
            None => self
                .weeks
                .iter()
                .flat_map(|week| week.sessions.iter())
                .collect(),
        };
        sessions
            .into_iter()
            .filter(|session| session.date == date)
            .cloned()
            .collect()
    }
}

/// Class list for one calendar day, the unit the schedule cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub semester: String,
    pub classes: Vec<ClassSession>,
}

impl DaySchedule {
    pub fn new(date: NaiveDate, semester: impl Into<String>, classes: Vec<ClassSession>) -> Self {
        Self {
            date,
            semester: semester.into(),
            classes,
        }
    }

    pub fn has_classes(&self) -> bool {
        !self.classes.is_empty()
    }
}

/// One exam sitting from the semester exam list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub subject_name: String,
    pub subject_name_en: Option<String>,
    pub subject_code: String,
    /// Exam period label, e.g. "Thi cuối kỳ".
    pub period_label: String,
    /// Exam format, e.g. "Tự luận".
    pub format: String,
    pub duration_minutes: u32,
    pub start_time: NaiveTime,
    pub date: NaiveDate,
    pub room: String,
    pub location: String,
}

impl ExamRecord {
    pub fn new(
        subject_name: impl Into<String>,
        subject_code: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            subject_name_en: None,
            subject_code: subject_code.into(),
            period_label: String::new(),
            format: String::new(),
            duration_minutes: 0,
            start_time,
            date,
            room: String::new(),
            location: String::new(),
        }
    }

    pub fn with_english_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name_en = Some(name.into());
        self
    }

    pub fn with_period_label(mut self, label: impl Into<String>) -> Self {
        self.period_label = label.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}
