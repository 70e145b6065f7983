use std::collections::BTreeMap;

/// How a contribution folds into a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackCategory {
    /// Raw stat value (`A`), summed.
    Base,
    /// Percentage points (`B`), summed then applied as `1 + B/100`.
    Modifier,
    /// Multiplicative factor (`M`), multiplied together.
    Multiplier,
    /// Flat amount (`C`) added after everything else.
    Flat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackContribution<K> {
    pub key: K,
    pub category: StackCategory,
    pub value: f64,
}

impl<K> StackContribution<K> {
    pub fn base(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Base,
            value,
        }
    }

    pub fn modifier(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Modifier,
            value,
        }
    }

    pub fn multiplier(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Multiplier,
            value,
        }
    }

    pub fn flat(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Flat,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotals {
    pub base: f64,
    pub modifier: f64,
    pub multiplier: f64,
    pub flat: f64,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self {
            base: 0.0,
            modifier: 0.0,
            multiplier: 1.0,
            flat: 0.0,
        }
    }
}

impl CategoryTotals {
    pub fn apply(&mut self, category: StackCategory, value: f64) {
        match category {
            StackCategory::Base => self.base += value,
            StackCategory::Modifier => self.modifier += value,
            StackCategory::Multiplier => self.multiplier *= value,
            StackCategory::Flat => self.flat += value,
        }
    }

    /// `A × max(0, 1 + B/100) × M + C`, never negative.
    pub fn compose(self) -> f64 {
        let percent = (1.0 + self.modifier / 100.0).max(0.0);
        (self.base * percent * self.multiplier + self.flat).max(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatStacking<K: Ord> {
    totals: BTreeMap<K, CategoryTotals>,
}

impl<K: Ord> StatStacking<K> {
    pub fn new() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, contribution: StackContribution<K>) {
        self.totals
            .entry(contribution.key)
            .or_default()
            .apply(contribution.category, contribution.value);
    }

    pub fn add_many<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = StackContribution<K>>,
    {
        for contribution in contributions {
            self.add(contribution);
        }
    }

    pub fn totals_for(&self, key: &K) -> Option<CategoryTotals> {
        self.totals.get(key).copied()
    }

    /// Composed value for `key`, zero when nothing was contributed.
    pub fn composed_for(&self, key: &K) -> f64 {
        self.totals_for(key).map_or(0.0, CategoryTotals::compose)
    }
}
