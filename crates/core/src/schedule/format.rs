//! Presentation formatting for schedule and exam results.
//!
//! Output strings match what the chat layer shows to students, so the
//! wording (Vietnamese labels, field order, indentation) is part of the
//! contract and covered by tests.

use chrono::{Datelike, NaiveDate, Weekday};

use super::types::{DaySchedule, ExamRecord};

/// Refusal sent for month/year/semester-scale queries.
pub const FAR_TIME_MESSAGE: &str =
    "Xin lỗi, tôi chỉ hỗ trợ truy vấn lịch học trong tuần hoặc ngày cụ thể.";

/// Shown when no exam matches the requested dates.
pub const NO_EXAMS_MESSAGE: &str = "Không tìm thấy lịch thi nào phù hợp với yêu cầu.";

const NO_CLASSES_IN_RANGE: &str = "Không có lớp học nào trong khoảng thời gian này.\n\
Vui lòng kiểm tra lại lịch học trên hệ thống quản lý học tập của trường.";

const INSTRUCTOR_PLACEHOLDER: &str = "Chưa cập nhật";

/// Vietnamese weekday name.
pub fn vietnamese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Thứ Hai",
        Weekday::Tue => "Thứ Ba",
        Weekday::Wed => "Thứ Tư",
        Weekday::Thu => "Thứ Năm",
        Weekday::Fri => "Thứ Sáu",
        Weekday::Sat => "Thứ Bảy",
        Weekday::Sun => "Chủ Nhật",
    }
}

/// Vietnamese weekday number: Monday is 2, Sunday is 8.
pub fn weekday_number(weekday: Weekday) -> u32 {
    weekday.num_days_from_monday() + 2
}

/// Renders a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// User-facing semester label for a raw semester id.
pub fn semester_label(semester: &str) -> String {
    format!("Học kỳ {semester}")
}

/// Renders one day's class list.
///
/// With `include_header` the output is self-contained (weekday, date and
/// semester up front); without it, only the class block is produced and
/// an empty day renders as nothing, leaving the caller to label it.
pub fn format_day_schedule(day: &DaySchedule, include_header: bool) -> String {
    let day_name = vietnamese_weekday(day.date.weekday());
    let thu = weekday_number(day.date.weekday());
    let date = format_date(day.date);
    let semester = semester_label(&day.semester);

    if day.classes.is_empty() {
        if include_header {
            return format!(
                "Không có lớp học nào vào {day_name} (Thứ {thu}), ngày {date} ({semester})."
            );
        }
        return String::new();
    }

    let mut result = String::new();
    if include_header {
        result.push_str(&format!(
            "Lịch học ngày {date} ({day_name} - Thứ {thu}) - {semester}:\n\n"
        ));
    }

    for (i, class) in day.classes.iter().enumerate() {
        result.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            class.subject_name,
            class.subject_code
        ));
        if let Some(english) = &class.subject_name_en {
            result.push_str(&format!("    {english}\n"));
        }
        result.push_str(&format!(
            "    Tiết {} - Tiết {}\n",
            class.start_period,
            class.end_period()
        ));
        result.push_str(&format!("    Phòng {}\n", class.room));

        let instructor = if class.instructor.is_empty() {
            INSTRUCTOR_PLACEHOLDER
        } else {
            &class.instructor
        };
        result.push_str(&format!("    {instructor}"));
        if let Some(id) = &class.instructor_id {
            result.push_str(&format!(" (Mã GV: {id})"));
        }
        result.push('\n');

        if let Some(credits) = class.credits {
            result.push_str(&format!("    Số tín chỉ: {credits}\n"));
        }
        result.push_str(&format!("    Ngày học: {}\n", format_date(class.date)));
        result.push('\n');
    }

    result
}

/// Renders a multi-date result as per-day sections.
///
/// `window_kind` is the descriptor kind label echoed in the opening
/// line. When every day is empty the per-day sections are skipped in
/// favor of a single explanatory closing line.
pub fn format_multi_day(days: &[DaySchedule], window_kind: &str) -> String {
    let mut result = format!("Đây là lịch học cho truy vấn của bạn ({window_kind}):\n\n");

    if !days.iter().any(DaySchedule::has_classes) {
        result.push_str(NO_CLASSES_IN_RANGE);
        return result;
    }

    for day in days {
        let day_name = vietnamese_weekday(day.date.weekday());
        result.push_str(&format!("--- {day_name}, {} ---\n", format_date(day.date)));
        if day.has_classes() {
            result.push_str(&format_day_schedule(day, false));
        } else {
            result.push_str("Không có lớp học vào ngày này.\n\n");
        }
    }

    result
}

/// Renders a numbered exam list; an empty list renders the "no matching
/// exams" sentence.
pub fn format_exams(exams: &[ExamRecord]) -> String {
    if exams.is_empty() {
        return NO_EXAMS_MESSAGE.to_string();
    }

    let mut result = String::new();
    for (i, exam) in exams.iter().enumerate() {
        result.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            exam.subject_name,
            exam.subject_code
        ));
        if let Some(english) = &exam.subject_name_en {
            result.push_str(&format!("   {english}\n"));
        }
        result.push_str(&format!("   {}\n", exam.period_label));
        result.push_str(&format!("   Hình thức: {}\n", exam.format));
        result.push_str(&format!(
            "   Thời gian: {}, {} phút, ngày {}\n",
            exam.start_time.format("%H:%M"),
            exam.duration_minutes,
            format_date(exam.date)
        ));
        result.push_str(&format!("   Phòng thi: {}, {}\n\n", exam.room, exam.location));
    }

    result
}
