use std::collections::HashMap;

use crate::error::{Result, ScoringError};
use crate::models::CalendarEvent;

/// Season calendar indexed by event number, iterable in date order.
pub struct CalendarRepository<'a> {
    ordered: Vec<&'a CalendarEvent>,
    by_number: HashMap<u32, &'a CalendarEvent>,
}

impl<'a> CalendarRepository<'a> {
    /// Fails when the same event number appears more than once.
    pub fn new(events: &'a [CalendarEvent]) -> Result<Self> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for event in events {
            *counts.entry(event.event_number).or_default() += 1;
        }

        let mut duplicates: Vec<(u32, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect();
        if !duplicates.is_empty() {
            duplicates.sort_unstable();
            return Err(ScoringError::DuplicateCalendarEvents(duplicates));
        }

        let mut ordered: Vec<&CalendarEvent> = events.iter().collect();
        ordered.sort_by_key(|e| (e.event_date, e.event_number));

        let by_number = ordered.iter().map(|e| (e.event_number, *e)).collect();

        Ok(Self { ordered, by_number })
    }

    pub fn get(&self, event_number: u32) -> Option<&'a CalendarEvent> {
        self.by_number.get(&event_number).copied()
    }

    /// All events, ascending by date then event number.
    pub fn in_date_order(&self) -> impl Iterator<Item = &'a CalendarEvent> + '_ {
        self.ordered.iter().copied()
    }

    /// Championship events that were not cancelled, in date order.
    pub fn championship_events(&self) -> Vec<&'a CalendarEvent> {
        self.in_date_order()
            .filter(|e| e.is_club_championship && !e.is_cancelled)
            .collect()
    }

    /// Round robin events that were not cancelled, in date order.
    pub fn round_robin_events(&self) -> Vec<&'a CalendarEvent> {
        self.in_date_order()
            .filter(|e| e.is_round_robin_event && !e.is_cancelled)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn event(event_number: u32, day: u32) -> CalendarEvent {
        CalendarEvent {
            event_number,
            event_name: format!("Event {}", event_number),
            event_date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            miles: Decimal::from(10),
            is_evening10: true,
            is_club_championship: true,
            is_round_robin_event: false,
            is_cancelled: false,
            is_hard_ride_series: false,
            is_non_standard_10: false,
            round_robin_club: None,
        }
    }

    #[test]
    fn test_orders_by_date() {
        let events = vec![event(2, 20), event(1, 10), event(3, 15)];
        let calendar = CalendarRepository::new(&events).unwrap();
        let numbers: Vec<u32> = calendar.in_date_order().map(|e| e.event_number).collect();
        assert_eq!(numbers, vec![1, 3, 2]);
        assert_eq!(calendar.get(3).unwrap().event_name, "Event 3");
    }

    #[test]
    fn test_duplicate_event_numbers_are_rejected() {
        let events = vec![event(1, 10), event(1, 11), event(2, 12), event(2, 13), event(2, 14)];
        let err = CalendarRepository::new(&events).err().unwrap();
        match err {
            ScoringError::DuplicateCalendarEvents(dups) => {
                assert_eq!(dups, vec![(1, 2), (2, 3)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_championship_events_skip_cancelled() {
        let mut cancelled = event(2, 12);
        cancelled.is_cancelled = true;
        let events = vec![event(1, 10), cancelled];
        let calendar = CalendarRepository::new(&events).unwrap();
        assert_eq!(calendar.championship_events().len(), 1);
    }
}
