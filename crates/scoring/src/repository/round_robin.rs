use std::collections::HashMap;

use crate::models::{DecoratedName, RoundRobinRider};

/// Round robin riders keyed by their decorated name.
pub struct RoundRobinRiderRepository<'a> {
    by_name: HashMap<DecoratedName, &'a RoundRobinRider>,
}

impl<'a> RoundRobinRiderRepository<'a> {
    pub fn new(riders: &'a [RoundRobinRider]) -> Self {
        let by_name = riders.iter().map(|r| (r.decorated_name(), r)).collect();
        Self { by_name }
    }

    pub fn find(&self, name: &str, club: &str) -> Option<&'a RoundRobinRider> {
        self.by_name.get(&DecoratedName::new(name, club)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ignores_case_and_whitespace() {
        let riders = vec![RoundRobinRider {
            name: "Alex Jones".to_string(),
            round_robin_club: "TEAMX".to_string(),
            is_female: true,
        }];
        let repo = RoundRobinRiderRepository::new(&riders);
        assert!(repo.find(" alex jones", "teamx ").is_some());
        assert!(repo.find("Alex Jones", "OTHER").is_none());
    }
}
