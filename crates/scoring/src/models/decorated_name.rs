/// A rider name decorated with their club code, e.g. `"Alex Jones (TEAMX)"`.
///
/// Comparison ignores case and surrounding whitespace so that names typed
/// slightly differently in result sheets and rider lists still match.
#[derive(Debug, Clone)]
pub struct DecoratedName {
    display: String,
    key: String,
}

impl DecoratedName {
    /// Builds the decorated form from a name and a club code. A name that
    /// already ends in `(club)` is not decorated twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use scoring::models::DecoratedName;
    ///
    /// let a = DecoratedName::new("Alex Jones", "TEAMX");
    /// let b = DecoratedName::parse("  alex jones (teamx) ");
    ///
    /// assert_eq!(a.as_str(), "Alex Jones (TEAMX)");
    /// assert_eq!(a, b);
    /// ```
    pub fn new(name: &str, club: &str) -> Self {
        Self::parse(&format!("{} ({})", Self::bare_name(name, club), club.trim()))
    }

    /// `name` without a trailing `(club)` suffix, matched case-insensitively.
    pub fn bare_name<'n>(name: &'n str, club: &str) -> &'n str {
        let name = name.trim();
        let suffix = format!("({})", club.trim());
        let Some(split) = name.len().checked_sub(suffix.len()) else {
            return name;
        };
        match (name.get(..split), name.get(split..)) {
            (Some(bare), Some(tail)) if tail.eq_ignore_ascii_case(&suffix) => bare.trim_end(),
            _ => name,
        }
    }

    /// Wraps an already decorated string.
    pub fn parse(decorated: &str) -> Self {
        let display = decorated.trim().to_string();
        let key = display.to_lowercase();
        Self { display, key }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The normalised form used for lookups.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for DecoratedName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DecoratedName {}

impl std::hash::Hash for DecoratedName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for DecoratedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoration_trims_parts() {
        let name = DecoratedName::new("  Sam Smith ", " RCC ");
        assert_eq!(name.as_str(), "Sam Smith (RCC)");
    }

    #[test]
    fn test_equality_case_insensitive() {
        let a = DecoratedName::new("SAM SMITH", "rcc");
        let b = DecoratedName::new("Sam Smith", "RCC");
        assert_eq!(a, b);
        assert_eq!(a.key(), "sam smith (rcc)");
    }

    #[test]
    fn test_already_decorated_name_is_not_decorated_twice() {
        let name = DecoratedName::new("Alice Smith (Ratae)", "RATAE");
        assert_eq!(name.as_str(), "Alice Smith (RATAE)");
        assert_eq!(name, DecoratedName::new("Alice Smith", "Ratae"));
        assert_eq!(DecoratedName::bare_name(" Alice Smith (ratae) ", "Ratae"), "Alice Smith");
        assert_eq!(DecoratedName::bare_name("Alice Smith (Other)", "Ratae"), "Alice Smith (Other)");
        assert_eq!(DecoratedName::bare_name("Al", "Ratae"), "Al");
    }

    #[test]
    fn test_different_clubs_do_not_match() {
        let a = DecoratedName::new("Sam Smith", "RCC");
        let b = DecoratedName::new("Sam Smith", "TEAMX");
        assert_ne!(a, b);
    }
}
