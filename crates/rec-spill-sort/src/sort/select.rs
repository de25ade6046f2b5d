/// Which sort path a job will take.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EngineKind {
    InMemory,
    External,
}

impl EngineKind {
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::InMemory => "in-memory",
            EngineKind::External => "external",
        }
    }
}

/// Routes a sort by comparing the caller's estimate of the encoded input
/// size against the configured threshold. The estimate approximates encoded
/// bytes, not the decoded in-memory footprint, so the threshold is a routing
/// heuristic rather than a memory bound.
pub fn select_engine(estimated_input_bytes: u64, in_memory_threshold_bytes: u64) -> EngineKind {
    if estimated_input_bytes <= in_memory_threshold_bytes {
        EngineKind::InMemory
    } else {
        EngineKind::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_at_or_below_threshold_stay_in_memory() {
        assert_eq!(select_engine(0, 1024), EngineKind::InMemory);
        assert_eq!(select_engine(1023, 1024), EngineKind::InMemory);
        assert_eq!(select_engine(1024, 1024), EngineKind::InMemory);
    }

    #[test]
    fn estimates_above_threshold_go_external() {
        assert_eq!(select_engine(1025, 1024), EngineKind::External);
        assert_eq!(select_engine(u64::MAX, 1024), EngineKind::External);
    }

    #[test]
    fn zero_threshold_only_keeps_empty_inputs_in_memory() {
        assert_eq!(select_engine(0, 0), EngineKind::InMemory);
        assert_eq!(select_engine(1, 0), EngineKind::External);
    }

    #[test]
    fn engine_kind_names_are_stable() {
        assert_eq!(EngineKind::InMemory.name(), "in-memory");
        assert_eq!(EngineKind::External.name(), "external");
    }
}
