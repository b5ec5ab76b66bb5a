use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::CompetitorSnapshot;

/// Read-only index of every competitor snapshot, grouped by club number and
/// ordered by `created_utc`. Built once per scoring run.
pub struct CompetitorRepository<'a> {
    by_club: HashMap<u32, Vec<&'a CompetitorSnapshot>>,
}

impl<'a> CompetitorRepository<'a> {
    pub fn new(snapshots: &'a [CompetitorSnapshot]) -> Self {
        Self::build(snapshots.iter())
    }

    /// Builds the index from snapshots already grouped by club number.
    /// Groups are visited in ascending club number order so insertion order is stable.
    pub fn from_grouped(grouped: &'a HashMap<u32, Vec<CompetitorSnapshot>>) -> Self {
        let mut clubs: Vec<&u32> = grouped.keys().collect();
        clubs.sort_unstable();
        Self::build(
            clubs
                .into_iter()
                .filter_map(|club| grouped.get(club))
                .flatten(),
        )
    }

    fn build(snapshots: impl Iterator<Item = &'a CompetitorSnapshot>) -> Self {
        let mut by_club: HashMap<u32, Vec<&'a CompetitorSnapshot>> = HashMap::new();
        for snapshot in snapshots {
            by_club.entry(snapshot.club_number).or_default().push(snapshot);
        }

        // Stable sort: snapshots sharing a timestamp keep their insertion order.
        for history in by_club.values_mut() {
            history.sort_by_key(|s| s.created_utc);
        }

        Self { by_club }
    }

    /// Returns the snapshot with the greatest `created_utc` not after `as_of`.
    /// Among equal timestamps the last inserted snapshot wins.
    pub fn resolve(&self, club_number: u32, as_of: DateTime<Utc>) -> Option<&'a CompetitorSnapshot> {
        let history = self.by_club.get(&club_number)?;
        let idx = history.partition_point(|s| s.created_utc <= as_of);
        idx.checked_sub(1).map(|i| history[i])
    }

    pub fn history(&self, club_number: u32) -> &[&'a CompetitorSnapshot] {
        self.by_club
            .get(&club_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The most recent snapshot regardless of date, used for display names.
    pub fn latest(&self, club_number: u32) -> Option<&'a CompetitorSnapshot> {
        self.history(club_number).last().copied()
    }

    pub fn contains(&self, club_number: u32) -> bool {
        self.by_club.contains_key(&club_number)
    }

    pub fn len(&self) -> usize {
        self.by_club.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_club.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, ClaimStatus, League};
    use chrono::TimeZone;

    fn snapshot(club_number: u32, claim_status: ClaimStatus, created: (i32, u32, u32)) -> CompetitorSnapshot {
        CompetitorSnapshot {
            club_number,
            surname: "Rider".to_string(),
            given_name: format!("Number{}", club_number),
            claim_status,
            is_female: false,
            age_group: AgeGroup::Senior,
            vets_bucket: None,
            league: League::Undefined,
            created_utc: Utc
                .with_ymd_and_hms(created.0, created.1, created.2, 0, 0, 0)
                .unwrap(),
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_resolves_latest_snapshot_not_after_date() {
        let snapshots = vec![
            snapshot(10, ClaimStatus::FirstClaim, (2025, 6, 1)),
            snapshot(10, ClaimStatus::SecondClaim, (2025, 1, 1)),
        ];
        let repo = CompetitorRepository::new(&snapshots);

        let early = repo.resolve(10, at(2025, 4, 10)).unwrap();
        assert_eq!(early.claim_status, ClaimStatus::SecondClaim);

        let late = repo.resolve(10, at(2025, 7, 1)).unwrap();
        assert_eq!(late.claim_status, ClaimStatus::FirstClaim);
    }

    #[test]
    fn test_snapshot_created_on_event_date_applies() {
        let snapshots = vec![snapshot(10, ClaimStatus::FirstClaim, (2025, 5, 1))];
        let repo = CompetitorRepository::new(&snapshots);
        assert!(repo.resolve(10, at(2025, 5, 1)).is_some());
    }

    #[test]
    fn test_no_snapshot_before_date_or_unknown_club() {
        let snapshots = vec![snapshot(10, ClaimStatus::FirstClaim, (2025, 5, 1))];
        let repo = CompetitorRepository::new(&snapshots);
        assert!(repo.resolve(10, at(2025, 4, 30)).is_none());
        assert!(repo.resolve(99, at(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_future_snapshot_does_not_change_past_resolution() {
        let mut snapshots = vec![snapshot(10, ClaimStatus::SecondClaim, (2025, 1, 1))];
        let before = CompetitorRepository::new(&snapshots)
            .resolve(10, at(2025, 5, 1))
            .cloned();

        snapshots.push(snapshot(10, ClaimStatus::FirstClaim, (2025, 8, 1)));
        let after = CompetitorRepository::new(&snapshots)
            .resolve(10, at(2025, 5, 1))
            .cloned();

        assert_eq!(before, after);
    }

    #[test]
    fn test_equal_timestamps_last_inserted_wins() {
        let snapshots = vec![
            snapshot(10, ClaimStatus::SecondClaim, (2025, 1, 1)),
            snapshot(10, ClaimStatus::Honorary, (2025, 1, 1)),
        ];
        let repo = CompetitorRepository::new(&snapshots);
        let resolved = repo.resolve(10, at(2025, 2, 1)).unwrap();
        assert_eq!(resolved.claim_status, ClaimStatus::Honorary);
    }

    #[test]
    fn test_from_grouped() {
        let mut grouped = HashMap::new();
        grouped.insert(
            7,
            vec![
                snapshot(7, ClaimStatus::FirstClaim, (2024, 1, 1)),
                snapshot(7, ClaimStatus::Honorary, (2025, 1, 1)),
            ],
        );
        let repo = CompetitorRepository::from_grouped(&grouped);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.history(7).len(), 2);
        assert_eq!(repo.latest(7).unwrap().claim_status, ClaimStatus::Honorary);
    }
}
