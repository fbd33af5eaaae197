#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeParams {
    /// Evaluate candidate attributes on the rayon pool.
    pub parallel: bool,
}

impl TreeParams {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
