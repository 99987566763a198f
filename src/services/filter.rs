use std::collections::HashMap;

use crate::models::Contest;

/// Per-resource substring rules matched against lower-cased contest titles.
///
/// The empty pattern matches every title, which is how a whole source is
/// allowed in one line.
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    allow: HashMap<String, Vec<String>>,
    disallow: HashMap<String, Vec<String>>,
}

impl FilterRules {
    /// A table with no rules. Rejects everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in source table.
    pub fn builtin() -> Self {
        Self::empty()
            .allow("codeforces.com", [""])
            .disallow("codeforces.com", ["unrated", "kotlin"])
            .allow("atcoder.jp", ["beginner", "regular", "grand"])
    }

    pub fn allow<I, S>(mut self, resource: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_patterns(&mut self.allow, resource, patterns);
        self
    }

    pub fn disallow<I, S>(mut self, resource: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_patterns(&mut self.disallow, resource, patterns);
        self
    }
}

fn extend_patterns<I, S>(table: &mut HashMap<String, Vec<String>>, resource: &str, patterns: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    table
        .entry(resource.to_string())
        .or_default()
        .extend(patterns.into_iter().map(|p| p.as_ref().to_lowercase()));
}

/// Decides which contests are worth announcing.
#[derive(Debug, Clone)]
pub struct ContestFilter {
    rules: FilterRules,
}

impl ContestFilter {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    pub fn is_desired(&self, contest: &Contest) -> bool {
        self.matches(&contest.resource, &contest.event)
    }

    /// Disallow wins over allow; unknown resources are rejected.
    pub fn matches(&self, resource: &str, event: &str) -> bool {
        let title = event.to_lowercase();
        let hits = |table: &HashMap<String, Vec<String>>| {
            table
                .get(resource)
                .is_some_and(|patterns| patterns.iter().any(|p| title.contains(p.as_str())))
        };

        if hits(&self.rules.disallow) {
            return false;
        }
        hits(&self.rules.allow)
    }
}

impl Default for ContestFilter {
    fn default() -> Self {
        Self::new(FilterRules::builtin())
    }
}
