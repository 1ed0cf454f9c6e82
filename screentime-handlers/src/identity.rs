//! Resolves a sender to the normalized name used as their column header.

use dbot_core::User;

/// One way of naming a sender. Strategies are tried in order; the first that yields a
/// non-empty name wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStrategy {
    Username,
    FirstName,
    FullName,
    NumericId,
}

impl IdentityStrategy {
    fn resolve(self, user: &User) -> Option<String> {
        let name = match self {
            Self::Username => user.username.clone(),
            Self::FirstName => user.first_name.clone(),
            Self::FullName => user.full_name(),
            Self::NumericId => Some(user.id.to_string()),
        }?;
        let name = name.trim().trim_start_matches('@').trim();
        (!name.is_empty()).then(|| name.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    strategies: Vec<IdentityStrategy>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(vec![
            IdentityStrategy::Username,
            IdentityStrategy::FirstName,
            IdentityStrategy::FullName,
            IdentityStrategy::NumericId,
        ])
    }
}

impl IdentityResolver {
    pub fn new(strategies: Vec<IdentityStrategy>) -> Self {
        Self { strategies }
    }

    /// Lower-cased name for `user`, or `None` when no strategy applies.
    pub fn resolve(&self, user: &User) -> Option<String> {
        self.strategies.iter().find_map(|s| s.resolve(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: 4242,
            username: username.map(str::to_string),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_username_wins_and_is_lowercased() {
        let r = IdentityResolver::default();
        assert_eq!(r.resolve(&user(Some("AnnaP"), Some("Anna"), None)), Some("annap".into()));
    }

    #[test]
    fn test_falls_back_to_first_name() {
        let r = IdentityResolver::default();
        assert_eq!(r.resolve(&user(None, Some("Pau"), Some("Vidal"))), Some("pau".into()));
        assert_eq!(r.resolve(&user(Some("  "), Some("Pau"), None)), Some("pau".into()));
    }

    #[test]
    fn test_falls_back_to_id() {
        let r = IdentityResolver::default();
        assert_eq!(r.resolve(&user(None, None, Some("Vidal"))), Some("4242".into()));
    }

    #[test]
    fn test_custom_order() {
        let r = IdentityResolver::new(vec![IdentityStrategy::FullName]);
        assert_eq!(r.resolve(&user(Some("x"), Some("Pau"), Some("Vidal"))), Some("pau vidal".into()));
        assert_eq!(r.resolve(&user(Some("x"), None, None)), None);
    }
}
