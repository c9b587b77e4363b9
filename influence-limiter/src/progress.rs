//! Progress reporting for limiter runs

use crate::host::VertexId;

/// Trait for receiving progress updates while vertices are processed
///
/// Runs cannot be cancelled; handlers only observe.
pub trait ProgressHandler {
    /// Called after each vertex
    ///
    /// # Parameters
    /// - `processed`: vertices handled so far, including `vertex`
    /// - `total`: vertices in the run
    /// - `vertex`: the vertex just handled
    fn update(&mut self, processed: usize, total: usize, vertex: &VertexId);
}

impl<F> ProgressHandler for F
where
    F: FnMut(usize, usize, &VertexId),
{
    fn update(&mut self, processed: usize, total: usize, vertex: &VertexId) {
        self(processed, total, vertex)
    }
}

/// A simple progress handler that prints to stdout
pub struct PrintProgressHandler {
    last_percentage: i32,
}

impl PrintProgressHandler {
    /// Create a new print progress handler
    pub fn new() -> Self {
        Self {
            last_percentage: -1,
        }
    }
}

impl Default for PrintProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for PrintProgressHandler {
    fn update(&mut self, processed: usize, total: usize, vertex: &VertexId) {
        let current_percentage = percentage(processed, total);

        // Only print when percentage changes
        if current_percentage != self.last_percentage {
            println!("Progress: {}% - {}", current_percentage, vertex);
            self.last_percentage = current_percentage;
        }
    }
}

/// A progress handler that stores progress information without printing
#[derive(Debug, Default)]
pub struct SilentProgressHandler {
    processed: usize,
    total: usize,
    last_vertex: Option<VertexId>,
}

impl SilentProgressHandler {
    /// Create a new silent progress handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices handled so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Vertices in the run
    pub fn total(&self) -> usize {
        self.total
    }

    /// The most recently handled vertex
    pub fn last_vertex(&self) -> Option<&VertexId> {
        self.last_vertex.as_ref()
    }

    /// Whether the run reported its last vertex
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.processed == self.total
    }
}

impl ProgressHandler for SilentProgressHandler {
    fn update(&mut self, processed: usize, total: usize, vertex: &VertexId) {
        self.processed = processed;
        self.total = total;
        self.last_vertex = Some(vertex.clone());
    }
}

fn percentage(processed: usize, total: usize) -> i32 {
    if total == 0 {
        return 100;
    }
    ((processed as f64 / total as f64) * 100.0) as i32
}
