/// The filtering rules used by a [`CumulativePropagator`](super::CumulativePropagator).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CumulativeOptions {
    /// Whether edge finding is applied after time-tabling. Edge finding detects overloads of a time
    /// window before any compulsory part exists, at a cubic cost in the number of tasks.
    pub edge_finding: bool,
    /// Specifies whether it is allowed to create holes in the domain; if this parameter is set to
    /// false then it will only adjust the bounds when appropriate rather than removing values from
    /// the domain.
    pub allow_holes_in_domain: bool,
}

impl Default for CumulativeOptions {
    fn default() -> Self {
        CumulativeOptions {
            edge_finding: true,
            allow_holes_in_domain: false,
        }
    }
}
