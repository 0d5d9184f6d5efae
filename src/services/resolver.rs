use strsim::jaro_winkler;

/// Strategy for correlating a raw team name against a list of known
/// candidate names. All three data sources spell franchise names
/// differently ("Celtics" vs "Boston Celtics"), so the matching policy is
/// injected rather than baked into the merge logic.
pub trait NameResolver: Send + Sync {
    /// Index of the matching candidate, if any.
    fn resolve(&self, name: &str, candidates: &[&str]) -> Option<usize>;
}

/// Case-insensitive substring containment in either direction. Handles
/// abbreviated vs. full franchise names without a hardcoded alias table.
pub struct ContainsResolver;

impl NameResolver for ContainsResolver {
    fn resolve(&self, name: &str, candidates: &[&str]) -> Option<usize> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        candidates.iter().position(|candidate| {
            let candidate = candidate.to_lowercase();
            name.contains(&candidate) || candidate.contains(&name)
        })
    }
}

/// Jaro-Winkler similarity with a minimum threshold; picks the best-scoring
/// candidate. More tolerant of typos than plain containment.
pub struct JaroResolver {
    pub threshold: f64,
}

impl Default for JaroResolver {
    fn default() -> Self {
        Self { threshold: 0.85 }
    }
}

impl NameResolver for JaroResolver {
    fn resolve(&self, name: &str, candidates: &[&str]) -> Option<usize> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        candidates
            .iter()
            .enumerate()
            .map(|(idx, candidate)| (idx, jaro_winkler(&name, &candidate.to_lowercase())))
            .filter(|(_, score)| *score >= self.threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }
}

/// Pick a resolver from the `NAME_RESOLVER` config value.
pub fn resolver_for(kind: &str) -> Box<dyn NameResolver> {
    match kind {
        "jaro" => Box::new(JaroResolver::default()),
        _ => Box::new(ContainsResolver),
    }
}
