//! Time-window resolution.
//!
//! Turns a [`TimeDescriptor`] plus "today" into an ordered, deduplicated
//! set of calendar dates. Resolution is a pure function; the caller
//! supplies today from an injected clock.
//!
//! Weeks are Monday-first: the current week starts at
//! `today - days_from_monday(today)` and always spans exactly 7 days.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::descriptor::{RelativeDay, TimeDescriptor, Token, TokenSet, WeekRef};

/// The week a resolution anchors on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekAnchor {
    /// The week containing today.
    Current,
    /// The week after the one containing today.
    Next,
    /// The week containing an explicit date.
    Containing(NaiveDate),
}

impl From<WeekRef> for WeekAnchor {
    fn from(week_ref: WeekRef) -> Self {
        match week_ref {
            WeekRef::Current => WeekAnchor::Current,
            WeekRef::Next => WeekAnchor::Next,
        }
    }
}

/// Returns the 7 consecutive dates of the anchored week, Monday first.
pub fn week_dates(anchor: WeekAnchor, today: NaiveDate) -> Vec<NaiveDate> {
    let reference = match anchor {
        WeekAnchor::Current | WeekAnchor::Next => today,
        WeekAnchor::Containing(date) => date,
    };
    let mut monday = reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
    if anchor == WeekAnchor::Next {
        monday += Duration::days(7);
    }
    (0..7).map(|offset| monday + Duration::days(offset)).collect()
}

/// Resolves a descriptor into concrete dates, ascending and deduplicated.
///
/// `FarTime`, unparseable values and empty token lists all yield the
/// empty set; the aggregators decide what an empty set means.
pub fn resolve(descriptor: &TimeDescriptor, today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = match descriptor {
        TimeDescriptor::FarTime => Vec::new(),
        TimeDescriptor::Day(TokenSet::Single(token)) => resolve_single_day(token, today),
        TimeDescriptor::Day(TokenSet::List(tokens)) => resolve_day_list(tokens, today),
        TimeDescriptor::Week(TokenSet::Single(token)) => resolve_single_week(token, today),
        TimeDescriptor::Week(TokenSet::List(tokens)) => resolve_week_list(tokens, today),
    };
    dates.sort();
    dates.dedup();
    dates
}

/// Tokens of a list value, split by role. At most one week reference is
/// honored (the last one wins); relative keywords are only meaningful as
/// single values and are ignored inside lists.
#[derive(Debug, Default)]
struct Partition {
    week_ref: Option<WeekRef>,
    weekdays: Vec<Weekday>,
    partial_dates: Vec<(u32, Option<u32>)>,
}

fn partition(tokens: &[Token]) -> Partition {
    let mut partition = Partition::default();
    for token in tokens {
        match token {
            Token::WeekRef(week_ref) => partition.week_ref = Some(*week_ref),
            Token::Weekday(weekday) => partition.weekdays.push(*weekday),
            Token::PartialDate { day, month } => partition.partial_dates.push((*day, *month)),
            Token::Relative(_) => {}
        }
    }
    partition
}

/// Completes a partial date in the current year, defaulting a missing
/// month to the current month. Impossible dates resolve to nothing.
fn complete_date(day: u32, month: Option<u32>, today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(today.year(), month.unwrap_or(today.month()), day)
}

/// Picks the date of `weekday` out of a Monday-first week.
fn weekday_in_week(weekday: Weekday, week: &[NaiveDate]) -> NaiveDate {
    week[weekday.num_days_from_monday() as usize]
}

fn resolve_single_day(token: &Token, today: NaiveDate) -> Vec<NaiveDate> {
    match token {
        Token::Relative(relative) => vec![today + Duration::days(relative.offset_days())],
        Token::PartialDate { day, month } => {
            complete_date(*day, *month, today).into_iter().collect()
        }
        Token::Weekday(weekday) => {
            let week = week_dates(WeekAnchor::Current, today);
            vec![weekday_in_week(*weekday, &week)]
        }
        // A lone week reference is not a day; it resolves to nothing and
        // the schedule path's empty-set fallback takes over.
        Token::WeekRef(_) => Vec::new(),
    }
}

fn resolve_day_list(tokens: &[Token], today: NaiveDate) -> Vec<NaiveDate> {
    let Partition {
        week_ref,
        weekdays,
        partial_dates,
    } = partition(tokens);

    let explicit_dates = |dates: &[(u32, Option<u32>)]| -> Vec<NaiveDate> {
        dates
            .iter()
            .filter_map(|(day, month)| complete_date(*day, *month, today))
            .collect()
    };

    match week_ref {
        Some(week_ref) => {
            let week = week_dates(week_ref.into(), today);
            if !weekdays.is_empty() {
                weekdays
                    .iter()
                    .map(|weekday| weekday_in_week(*weekday, &week))
                    .collect()
            } else if !partial_dates.is_empty() {
                explicit_dates(&partial_dates)
            } else {
                week
            }
        }
        None => {
            let week = week_dates(WeekAnchor::Current, today);
            let mut dates: Vec<NaiveDate> = weekdays
                .iter()
                .map(|weekday| weekday_in_week(*weekday, &week))
                .collect();
            dates.extend(explicit_dates(&partial_dates));
            dates
        }
    }
}

fn resolve_single_week(token: &Token, today: NaiveDate) -> Vec<NaiveDate> {
    match token {
        Token::WeekRef(week_ref) => week_dates((*week_ref).into(), today),
        Token::PartialDate { day, month } => match complete_date(*day, *month, today) {
            Some(date) => week_dates(WeekAnchor::Containing(date), today),
            None => Vec::new(),
        },
        // Bare weekday or relative keyword does not identify a week.
        Token::Weekday(_) | Token::Relative(_) => Vec::new(),
    }
}

fn resolve_week_list(tokens: &[Token], today: NaiveDate) -> Vec<NaiveDate> {
    let Partition {
        week_ref,
        weekdays,
        partial_dates,
    } = partition(tokens);

    // An explicit date anchors week selection; a week reference is next;
    // otherwise default to the current week.
    let anchor = partial_dates
        .first()
        .and_then(|(day, month)| complete_date(*day, *month, today))
        .map(WeekAnchor::Containing)
        .or_else(|| week_ref.map(WeekAnchor::from))
        .unwrap_or(WeekAnchor::Current);
    let week = week_dates(anchor, today);

    if weekdays.is_empty() {
        week
    } else {
        weekdays
            .iter()
            .map(|weekday| weekday_in_week(*weekday, &week))
            .collect()
    }
}
