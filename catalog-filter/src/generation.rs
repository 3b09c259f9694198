use serde::Serialize;
use std::fmt;

/// Sequence number of an issued query. Later queries get larger values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: Option<Generation>,
}

impl GenerationCounter {
    pub fn issue(&mut self) -> Generation {
        let next = Generation(self.latest.map_or(1, |latest| latest.0 + 1));
        self.latest = Some(next);
        next
    }

    pub fn latest(&self) -> Option<Generation> {
        self.latest
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest == Some(generation)
    }
}
