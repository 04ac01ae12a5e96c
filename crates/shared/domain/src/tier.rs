use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Source that answered a resolve call.
///
/// Ordering follows priority: `Preview > Local > Remote > Default`. Exactly one tier
/// supplies a resolved document; tiers are never merged.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CacheTier {
    Default,
    Remote,
    Local,
    Preview,
}

impl CacheTier {
    /// Tiers in the order the resolver consults them.
    pub const PRIORITY: [Self; 4] = [Self::Preview, Self::Local, Self::Remote, Self::Default];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_matches_ordering() {
        let mut sorted = CacheTier::PRIORITY;
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, CacheTier::PRIORITY);
        assert!(CacheTier::Preview > CacheTier::Local);
        assert!(CacheTier::Remote > CacheTier::Default);
    }
}
