//! Credit package catalog for Reelboard.
//!
//! The catalog is the server-side authoritative price/credit table.
//! Amounts declared by the client or by payment-provider metadata are
//! revalidated against it before any balance mutation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable credit package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPackage {
    /// Package identifier (e.g. "starter").
    pub id: String,

    /// Base credits granted.
    pub credits: i64,

    /// Bonus credits granted on top of the base.
    pub bonus: i64,

    /// Price in minor currency units (cents).
    pub price_cents: i64,
}

impl CreditPackage {
    /// Total credits a purchase of this package grants.
    #[must_use]
    pub const fn total_credits(&self) -> i64 {
        self.credits + self.bonus
    }
}

/// The authoritative package table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageCatalog {
    /// Packages by id.
    pub packages: HashMap<String, CreditPackage>,
}

impl Default for PackageCatalog {
    fn default() -> Self {
        let mut packages = HashMap::new();
        for package in [
            CreditPackage {
                id: "starter".into(),
                credits: 100,
                bonus: 0,
                price_cents: 500, // $5
            },
            CreditPackage {
                id: "plus".into(),
                credits: 250,
                bonus: 25,
                price_cents: 1000, // $10
            },
            CreditPackage {
                id: "pro".into(),
                credits: 600,
                bonus: 100,
                price_cents: 2000, // $20
            },
        ] {
            packages.insert(package.id.clone(), package);
        }

        Self { packages }
    }
}

impl PackageCatalog {
    /// Look up a package by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CreditPackage> {
        self.packages.get(id)
    }

    /// List all packages, sorted by price ascending.
    #[must_use]
    pub fn list(&self) -> Vec<&CreditPackage> {
        let mut packages: Vec<_> = self.packages.values().collect();
        packages.sort_by_key(|p| p.price_cents);
        packages
    }
}
