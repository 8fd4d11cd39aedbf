use crate::error::ItemError;

/// Counts over the results of an isolated run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Input indices of captured failures, ascending.
    pub failed_indices: Vec<usize>,
    /// How many of the failures were panics.
    pub panicked: usize,
}

impl BatchSummary {
    pub fn from_results<O, E>(results: &[Result<O, ItemError<E>>]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };
        for (index, res) in results.iter().enumerate() {
            match res {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    summary.failed_indices.push(index);
                    if e.is_panic() {
                        summary.panicked += 1;
                    }
                }
            }
        }
        summary
    }

    pub fn failed(&self) -> usize {
        self.failed_indices.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_indices.is_empty()
    }
}
