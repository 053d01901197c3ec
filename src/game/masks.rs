//! Collider classification bits
//!
//! A collider's mask says what it *is*; a query mask says what it wants to
//! hit. A collider matches a query when it has every queried bit set.

pub struct Mask;

impl Mask {
    pub const SOLID: u32 = 1 << 0;
    pub const JUMPTHRU: u32 = 1 << 1;
    pub const PLAYER_ATTACK: u32 = 1 << 2;
    pub const ENEMY: u32 = 1 << 3;
    pub const PLAYER: u32 = 1 << 4;
}

/// Bitwise containment: every bit of `query` is present in `mask`.
/// The empty query matches nothing.
pub fn matches(mask: u32, query: u32) -> bool {
    query != 0 && mask & query == query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(!matches(0, 0));
        assert!(!matches(u32::MAX, 0));
    }

    #[test]
    fn test_containment() {
        let both = Mask::SOLID | Mask::ENEMY;
        assert!(matches(both, Mask::SOLID));
        assert!(matches(both, Mask::SOLID | Mask::ENEMY));
        assert!(!matches(Mask::SOLID, Mask::SOLID | Mask::ENEMY));
        assert!(!matches(Mask::JUMPTHRU, Mask::SOLID));
    }
}
