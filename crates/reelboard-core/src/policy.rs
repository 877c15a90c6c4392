//! Award policy for Reelboard.
//!
//! Pure decision logic, no I/O. Isolated here so thresholds and amounts
//! can change without touching state-machine or ledger code.

use serde::{Deserialize, Serialize};

use crate::CreditPackage;

/// The rule set determining credit amounts and eligibility thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardPolicy {
    /// Credits granted per qualifying view.
    pub view_award_credits: i64,

    /// Minimum absolute watch time in seconds to qualify.
    pub min_watch_seconds: u32,

    /// Alternative threshold: fraction of total duration watched.
    /// Whichever of the two thresholds is reached first qualifies.
    pub min_watch_fraction: f64,

    /// Credits spent per visibility boost.
    pub boost_cost_credits: i64,
}

impl Default for AwardPolicy {
    fn default() -> Self {
        Self {
            view_award_credits: 1,
            min_watch_seconds: 30,
            min_watch_fraction: 0.8,
            boost_cost_credits: 5,
        }
    }
}

impl AwardPolicy {
    /// Credits to grant for one qualifying view.
    #[must_use]
    pub const fn view_award_amount(&self) -> i64 {
        self.view_award_credits
    }

    /// Whether a watch qualifies for an award.
    ///
    /// `elapsed >= min_seconds OR elapsed >= total_duration * fraction`.
    /// Short videos qualify through the fractional threshold before the
    /// absolute one.
    #[must_use]
    pub fn qualifies_for_award(&self, elapsed_seconds: u32, total_duration_seconds: u32) -> bool {
        if elapsed_seconds >= self.min_watch_seconds {
            return true;
        }
        f64::from(elapsed_seconds) >= f64::from(total_duration_seconds) * self.min_watch_fraction
    }

    /// Credits to grant for a validated purchase of `package`.
    #[must_use]
    pub const fn purchase_award_amount(&self, package: &CreditPackage) -> i64 {
        package.total_credits()
    }

    /// Credits required to boost a video.
    #[must_use]
    pub const fn boost_cost(&self) -> i64 {
        self.boost_cost_credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_award_is_one_credit() {
        assert_eq!(AwardPolicy::default().view_award_amount(), 1);
    }

    #[test]
    fn qualifies_at_absolute_threshold() {
        let policy = AwardPolicy::default();

        // 40s video, 30s/80% thresholds: 30s absolute wins.
        assert!(!policy.qualifies_for_award(29, 40));
        assert!(policy.qualifies_for_award(30, 40));
        assert!(policy.qualifies_for_award(31, 40));
    }

    #[test]
    fn short_video_qualifies_by_fraction() {
        let policy = AwardPolicy::default();

        // 20s video: 80% = 16s, reached before the 30s absolute floor.
        assert!(!policy.qualifies_for_award(15, 20));
        assert!(policy.qualifies_for_award(16, 20));
    }

    #[test]
    fn zero_elapsed_never_qualifies() {
        let policy = AwardPolicy::default();
        assert!(!policy.qualifies_for_award(0, 40));
    }

    #[test]
    fn purchase_amount_is_credits_plus_bonus() {
        let policy = AwardPolicy::default();
        let package = CreditPackage {
            id: "plus".into(),
            credits: 250,
            bonus: 25,
            price_cents: 1000,
        };
        assert_eq!(policy.purchase_award_amount(&package), 275);
    }
}
