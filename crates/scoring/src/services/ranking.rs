use rust_decimal::Decimal;

use super::points_table::PointsTable;
use crate::models::Placing;

/// Orders `(index, time)` pairs ascending by time and yields each tie group
/// as `(first_position, members)`. Positions follow the "first position" rule:
/// everyone in a group gets the position of the group's first rider.
fn tie_groups(mut field: Vec<(usize, Decimal)>) -> Vec<(u32, Vec<usize>)> {
    field.sort_by(|a, b| a.1.cmp(&b.1));

    let mut groups = Vec::new();
    let mut start = 0;
    while start < field.len() {
        let time = field[start].1;
        let len = field[start..]
            .iter()
            .take_while(|(_, t)| *t == time)
            .count();
        let members = field[start..start + len].iter().map(|(idx, _)| *idx).collect();
        groups.push(((start + 1) as u32, members));
        start += len;
    }
    groups
}

/// Ranks a field by time and allocates points, sharing the mean of the
/// covered positions' points between tied riders.
///
/// Returns `(index, placing)` for every entry in the field.
pub fn allocate_placings(table: &PointsTable, field: Vec<(usize, Decimal)>) -> Vec<(usize, Placing)> {
    let mut placings = Vec::with_capacity(field.len());
    for (position, members) in tie_groups(field) {
        let points = table.shared_points(position, members.len() as u32);
        placings.extend(members.into_iter().map(|idx| (idx, Placing { position, points })));
    }
    placings
}

/// Ranks a field by time without awarding points.
pub fn assign_ranks(field: Vec<(usize, Decimal)>) -> Vec<(usize, u32)> {
    tie_groups(field)
        .into_iter()
        .flat_map(|(rank, members)| members.into_iter().map(move |idx| (idx, rank)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn placing_of(placings: &[(usize, Placing)], idx: usize) -> Placing {
        placings.iter().find(|(i, _)| *i == idx).unwrap().1
    }

    #[test]
    fn test_two_way_tie_for_first_shares_points() {
        let table = PointsTable::club_default();
        let placings = allocate_placings(&table, vec![(0, secs(905)), (1, secs(900)), (2, secs(900))]);

        assert_eq!(placing_of(&placings, 1), Placing { position: 1, points: Decimal::new(575, 1) });
        assert_eq!(placing_of(&placings, 2), Placing { position: 1, points: Decimal::new(575, 1) });
        assert_eq!(placing_of(&placings, 0), Placing { position: 3, points: Decimal::from(51) });
    }

    #[test]
    fn test_tie_group_pays_sum_of_covered_positions() {
        let table = PointsTable::club_default();
        let placings = allocate_placings(
            &table,
            vec![(0, secs(800)), (1, secs(810)), (2, secs(820)), (3, secs(820)), (4, secs(830))],
        );

        let tied_total: Decimal = [2, 3].iter().map(|i| placing_of(&placings, *i).points).sum();
        assert_eq!(tied_total, Decimal::from(51 + 48));
        assert_eq!(placing_of(&placings, 2).position, 3);
        assert_eq!(placing_of(&placings, 4).position, 5);
        assert_eq!(placing_of(&placings, 4).points, Decimal::from(46));
    }

    #[test]
    fn test_three_way_tie_positions() {
        let table = PointsTable::club_default();
        let placings = allocate_placings(&table, vec![(0, secs(700)), (1, secs(700)), (2, secs(700)), (3, secs(701))]);
        for idx in 0..3 {
            assert_eq!(placing_of(&placings, idx).position, 1);
        }
        assert_eq!(placing_of(&placings, 3).position, 4);
        assert_eq!(placing_of(&placings, 3).points, Decimal::from(48));
    }

    #[test]
    fn test_assign_ranks_uses_first_position() {
        let ranks = assign_ranks(vec![(0, secs(950)), (1, secs(930)), (2, secs(930)), (3, secs(990))]);
        let rank_of = |idx: usize| ranks.iter().find(|(i, _)| *i == idx).unwrap().1;
        assert_eq!(rank_of(1), 1);
        assert_eq!(rank_of(2), 1);
        assert_eq!(rank_of(0), 3);
        assert_eq!(rank_of(3), 4);
    }

    #[test]
    fn test_empty_field() {
        let table = PointsTable::club_default();
        assert!(allocate_placings(&table, Vec::new()).is_empty());
        assert!(assign_ranks(Vec::new()).is_empty());
    }
}
