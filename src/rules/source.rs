use super::record::RuleRecord;

/// Anything that can produce rule records.
///
/// Loading is infallible by contract: sources recover from bad input locally
/// (logging what they skipped) and return whatever they could read.
pub trait RuleSource {
    fn load_rules(&self) -> Vec<RuleRecord>;
}

/// Records supplied directly by the host, e.g. rules contributed by an addon.
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
    records: Vec<RuleRecord>,
}

impl StaticRuleSource {
    pub fn new(records: Vec<RuleRecord>) -> Self {
        Self { records }
    }
}

impl RuleSource for StaticRuleSource {
    fn load_rules(&self) -> Vec<RuleRecord> {
        self.records.clone()
    }
}

/// Concatenation of several sources, loaded in the order they were added.
#[derive(Default)]
pub struct CompositeRuleSource {
    sources: Vec<Box<dyn RuleSource + Send + Sync>>,
}

impl CompositeRuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl RuleSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl std::fmt::Debug for CompositeRuleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRuleSource").field("sources", &self.sources.len()).finish()
    }
}

impl RuleSource for CompositeRuleSource {
    fn load_rules(&self) -> Vec<RuleRecord> {
        self.sources.iter().flat_map(|s| s.load_rules()).collect()
    }
}

impl RuleSource for Vec<RuleRecord> {
    fn load_rules(&self) -> Vec<RuleRecord> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_preserves_source_order() {
        let composite = CompositeRuleSource::new()
            .with(StaticRuleSource::new(vec![RuleRecord::new(["a"], "1")]))
            .with(vec![RuleRecord::new(["b"], "2"), RuleRecord::new(["c"], "3")]);

        let responses: Vec<String> = composite.load_rules().into_iter().map(|r| r.response_template).collect();
        assert_eq!(responses, ["1", "2", "3"]);
    }
}
