//! The limiter pipeline
//!
//! A run reads the host selection, classifies it, locates the skin deformer of
//! every mesh involved, expands the selection into vertices, and prunes each
//! vertex in turn. Vertices are processed strictly one after another; the
//! first error ends the run and vertices already handled stay modified.
//!
//! Every deformer is located before the first mutation, so a mesh without a
//! skin deformer fails the run without touching any vertex.

use std::collections::{HashMap, HashSet};

use crate::{
    config::LimiterConfig,
    error::{Error, Result},
    host::{DeformerHandle, MeshId, SkinHost, VertexId},
    logging::Logger,
    progress::ProgressHandler,
    pruner::{MaxInfluences, PrunePlan, PruneRequest},
    range::VertexRange,
    selection::{Selection, SelectionMode},
    weights::WeightTable,
};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitReport {
    /// The cap that was applied
    pub max_influences: MaxInfluences,
    /// Whether meshes or vertices were selected
    pub mode: SelectionMode,
    /// Number of distinct meshes touched
    pub meshes: usize,
    /// Vertices inspected
    pub vertices_visited: usize,
    /// Vertices that had influences removed
    pub vertices_pruned: usize,
    /// Influences zeroed across all vertices
    pub influences_removed: usize,
}

impl LimitReport {
    /// The confirmation shown to the user
    pub fn summary(&self) -> String {
        format!(
            "Joint influence successfully limited to {}",
            self.max_influences
        )
    }
}

/// What happened to one vertex
#[derive(Debug, Clone, PartialEq)]
pub struct VertexOutcome {
    /// The vertex
    pub vertex: VertexId,
    /// The plan that was applied
    pub plan: PrunePlan,
}

impl VertexOutcome {
    /// Number of influences zeroed on the vertex
    pub fn removed(&self) -> usize {
        self.plan.pruned().len()
    }
}

/// Builder for configuring a [`Limiter`]
pub struct LimiterBuilder {
    config: LimiterConfig,
    logger: Logger,
    progress_handler: Option<Box<dyn ProgressHandler>>,
}

impl LimiterBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self {
            config: LimiterConfig::default(),
            logger: Logger::new(),
            progress_handler: None,
        }
    }

    /// Replace all settings
    pub fn with_config(mut self, config: LimiterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum number of influences per vertex
    pub fn with_max_influences(mut self, max_influences: MaxInfluences) -> Self {
        self.config = self.config.with_max_influences(max_influences);
        self
    }

    /// Set the weight-sum tolerance used when reading tables
    pub fn with_weight_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_weight_tolerance(tolerance);
        self
    }

    /// Set the logger receiving run messages
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Set a progress handler
    pub fn with_progress_handler(mut self, handler: Box<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    /// Finish configuration
    pub fn build(self) -> Limiter {
        Limiter {
            config: self.config,
            logger: self.logger,
            progress_handler: self.progress_handler,
        }
    }
}

impl Default for LimiterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Caps the influences of the selected vertices through a [`SkinHost`]
pub struct Limiter {
    config: LimiterConfig,
    logger: Logger,
    progress_handler: Option<Box<dyn ProgressHandler>>,
}

impl Limiter {
    /// A limiter with default settings and the given cap
    pub fn new(max_influences: MaxInfluences) -> Self {
        Self::builder().with_max_influences(max_influences).build()
    }

    /// Start configuring a limiter
    pub fn builder() -> LimiterBuilder {
        LimiterBuilder::new()
    }

    /// The active settings
    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// The logger receiving run messages
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Limit the influences of everything the host has selected
    pub fn run<H: SkinHost + ?Sized>(&mut self, host: &mut H) -> Result<LimitReport> {
        let result =
            Selection::from_host(&*host).and_then(|selection| self.apply(host, &selection));
        if let Err(error) = &result {
            self.logger.error(&error.to_string());
        }
        result
    }

    /// Limit the influences of an already classified selection
    pub fn apply<H: SkinHost + ?Sized>(
        &mut self,
        host: &mut H,
        selection: &Selection,
    ) -> Result<LimitReport> {
        let mode = selection.mode();
        self.logger.info(&format!("Removing influence from {mode}"));

        let meshes = selection.meshes();
        let mut deformers = HashMap::with_capacity(meshes.len());
        let mut vertex_counts = HashMap::with_capacity(meshes.len());
        for mesh in &meshes {
            let deformer = host
                .find_skin_deformer(mesh)?
                .ok_or_else(|| Error::missing_deformer(mesh.as_str()))?;
            vertex_counts.insert(mesh.clone(), host.vertex_count(mesh)?);
            deformers.insert(mesh.clone(), deformer);
        }

        let vertices = self.expand(selection, &vertex_counts)?;
        let total = vertices.len();
        let mut report = LimitReport {
            max_influences: self.config.max_influences(),
            mode,
            meshes: meshes.len(),
            vertices_visited: 0,
            vertices_pruned: 0,
            influences_removed: 0,
        };

        for (processed, vertex) in vertices.iter().enumerate() {
            let deformer = deformers
                .get(&vertex.mesh)
                .ok_or_else(|| Error::missing_deformer(vertex.mesh.as_str()))?;
            let outcome = self.limit_vertex(host, deformer, vertex)?;

            report.vertices_visited += 1;
            if !outcome.plan.is_noop() {
                report.vertices_pruned += 1;
                report.influences_removed += outcome.removed();
            }
            if let Some(handler) = self.progress_handler.as_mut() {
                handler.update(processed + 1, total, vertex);
            }
        }

        self.logger.info(&report.summary());
        tracing::info!(
            max_influences = %report.max_influences,
            vertices = report.vertices_visited,
            pruned = report.vertices_pruned,
            removed = report.influences_removed,
            "influence limit applied"
        );
        Ok(report)
    }

    /// Prune a single vertex bound to `deformer`
    pub fn limit_vertex<H: SkinHost + ?Sized>(
        &self,
        host: &mut H,
        deformer: &DeformerHandle,
        vertex: &VertexId,
    ) -> Result<VertexOutcome> {
        let table: WeightTable = host.query_weight_table(deformer, vertex)?.into_iter().collect();
        if !table.is_empty() && !table.is_normalized(self.config.weight_tolerance()) {
            let total = table.total_weight();
            tracing::warn!(
                vertex = %vertex,
                total,
                heaviest = table.max_weight(),
                "weight table does not sum to 1.0"
            );
            self.logger.warn(&format!("{vertex}: weights sum to {total:.3}, expected 1.0"));
        }

        let plan = PrunePlan::compute(&table, self.config.max_influences());
        apply_requests(host, deformer, vertex, &plan.requests())?;
        if !plan.is_noop() {
            tracing::debug!(
                vertex = %vertex,
                kept = plan.kept().len(),
                pruned = plan.pruned().len(),
                "pruned influences"
            );
            self.logger.debug(&format!(
                "{vertex}: removed {} of {} influences",
                plan.pruned().len(),
                table.len()
            ));
        }

        Ok(VertexOutcome {
            vertex: vertex.clone(),
            plan,
        })
    }

    fn expand(
        &self,
        selection: &Selection,
        vertex_counts: &HashMap<MeshId, u32>,
    ) -> Result<Vec<VertexId>> {
        let count_of = |mesh: &MeshId| vertex_counts.get(mesh).copied().unwrap_or(0);

        let ranges: Vec<VertexRange> = match selection {
            Selection::Meshes(meshes) => meshes
                .iter()
                .filter_map(|mesh| VertexRange::whole_mesh(mesh.clone(), count_of(mesh)))
                .collect(),
            Selection::Vertices(selectors) => {
                let mut ranges = Vec::with_capacity(selectors.len());
                for selector in selectors {
                    let count = count_of(selector.mesh());
                    if let Some(range) = selector.clone().resolve(count)? {
                        ranges.push(range);
                    }
                }
                ranges
            }
        };

        let mut seen = HashSet::new();
        let mut vertices = Vec::new();
        for vertex in ranges.iter().flat_map(|range| range.expand()) {
            if !self.config.deduplicate_vertices() || seen.insert(vertex.clone()) {
                vertices.push(vertex);
            }
        }
        Ok(vertices)
    }
}

/// Apply pruning requests to a vertex, in order
pub fn apply_requests<H: SkinHost + ?Sized>(
    host: &mut H,
    deformer: &DeformerHandle,
    vertex: &VertexId,
    requests: &[PruneRequest],
) -> Result<()> {
    for request in requests {
        match request {
            PruneRequest::SetWeight { influence, weight } => {
                host.set_influence_weight(deformer, vertex, influence, *weight)?
            }
            PruneRequest::Renormalize => host.renormalize(deformer, vertex)?,
        }
    }
    Ok(())
}

/// Validate `cap` and limit the influences of the host's selection
///
/// An invalid cap fails with [`Error::InvalidArgument`] before the host is
/// queried.
pub fn limit_selected_influences<H: SkinHost + ?Sized>(
    host: &mut H,
    cap: i64,
) -> Result<LimitReport> {
    let max_influences = MaxInfluences::new(cap)?;
    Limiter::new(max_influences).run(host)
}
