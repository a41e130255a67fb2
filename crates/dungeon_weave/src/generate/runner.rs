//! High-level runner sequencing the generation phases over one exclusive
//! [`GenState`].
use glam::Vec3;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::generate::events::{EventSink, GenEvent, GenEventKind};
use crate::generate::state::GenState;
use crate::generate::{
    append, bedrock_slab, pillars, props, roots, stairs, Phase, PlacedBlock, PlacedProp,
    TAG_BASE, TAG_INFRASTRUCTURE,
};
use crate::geom::GeometryOracle;
use crate::occupancy::OccupancyIndex;
use crate::rng::{RandomSequence, Seed};
use crate::terrain::TerrainSampler;

/// Configuration for one generation run.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Blocks requested for the first structural tier (`"base"`).
    pub tier1_count: usize,
    /// Blocks requested for the second structural tier (`"infrastructure"`).
    pub tier2_count: usize,
    /// Horizontal radius around the origin roots may spawn within.
    pub max_distance: f32,
    /// Scale factor on the per-sample root acceptance probability.
    pub root_factor: f32,
    /// Cap on stair insertions; defaults to half the tier-2 count.
    pub stair_limit: Option<usize>,
    /// Reproducibility seed; a fresh entropy seed is drawn when absent.
    pub seed: Option<Seed>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            tier1_count: 15,
            tier2_count: 15,
            max_distance: 200.0,
            root_factor: 1.0,
            stair_limit: None,
            seed: None,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier1_count(mut self, count: usize) -> Self {
        self.tier1_count = count;
        self
    }

    pub fn with_tier2_count(mut self, count: usize) -> Self {
        self.tier2_count = count;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_root_factor(mut self, root_factor: f32) -> Self {
        self.root_factor = root_factor;
        self
    }

    pub fn with_stair_limit(mut self, limit: usize) -> Self {
        self.stair_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Validates the configuration, returning an error if invalid.
    ///
    /// Tier counts of zero are legal; the corresponding phase places nothing.
    pub fn validate(&self) -> Result<()> {
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(Error::InvalidConfig("max_distance must be > 0".into()));
        }
        if !self.root_factor.is_finite() || self.root_factor <= 0.0 {
            return Err(Error::InvalidConfig("root_factor must be > 0".into()));
        }
        Ok(())
    }

    fn effective_stair_limit(&self) -> usize {
        self.stair_limit.unwrap_or(self.tier2_count / 2)
    }
}

/// Everything a finished run leaves behind: accepted instances in final
/// position plus per-phase acceptance counters. All auxiliary geometry
/// (occupancy unions, connector pools, anchor and socket markers, the bedrock
/// proxy) is discarded before this is returned.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    pub blocks: Vec<PlacedBlock>,
    pub props: Vec<PlacedProp>,
    pub roots_placed: usize,
    pub tier1_placed: usize,
    pub tier2_placed: usize,
    pub stairs_placed: usize,
    pub pillar_segments_placed: usize,
    pub props_placed: usize,
    /// Ambient offset the terrain sampler was keyed with.
    pub seed_offset: f32,
}

/// Sequences one generation run: roots, two attachment tiers, stairs,
/// pillars, props, then teardown.
pub struct DungeonGenerator<'a, O: GeometryOracle> {
    pub config: GenerationConfig,
    pub catalog: &'a Catalog,
    pub terrain: &'a dyn TerrainSampler,
    pub oracle: &'a O,
}

impl<'a, O: GeometryOracle> DungeonGenerator<'a, O> {
    /// Validates configuration and catalog before constructing the runner.
    pub fn try_new(
        config: GenerationConfig,
        catalog: &'a Catalog,
        terrain: &'a dyn TerrainSampler,
        oracle: &'a O,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self {
            config,
            catalog,
            terrain,
            oracle,
        })
    }

    /// Runs the generation silently.
    pub fn run(&mut self) -> Result<GenerationReport> {
        self.run_with_events(&mut ())
    }

    /// Runs the generation, streaming progress into `sink`.
    pub fn run_with_events(&mut self, sink: &mut dyn EventSink) -> Result<GenerationReport> {
        let rng = RandomSequence::seed(self.config.seed.as_ref());
        let seed_offset = rng.ambient_offset();
        let mut state = GenState::new(rng);
        let mut occupancy = OccupancyIndex::new(self.oracle, bedrock_slab())
            .map_err(|e| e.in_phase(Phase::Roots))?;

        let samples: Vec<Vec3> = self
            .terrain
            .height_field(seed_offset)
            .into_iter()
            .map(Vec3::from)
            .collect();

        if sink.wants(GenEventKind::RunStarted) {
            sink.send(GenEvent::RunStarted {
                seed_offset,
                sample_count: samples.len(),
            });
        }

        let mut report = GenerationReport {
            seed_offset,
            ..Default::default()
        };

        phase_started(sink, Phase::Roots);
        report.roots_placed = roots::generate_roots(
            &mut state,
            self.catalog,
            &mut occupancy,
            &samples,
            &self.config,
            sink,
        )
        .map_err(|e| e.in_phase(Phase::Roots))?;
        phase_finished(sink, Phase::Roots, report.roots_placed);

        phase_started(sink, Phase::Tier1);
        report.tier1_placed = append::append_blocks(
            &mut state,
            self.catalog,
            &mut occupancy,
            self.config.tier1_count,
            Some(TAG_BASE),
            Phase::Tier1,
            sink,
        )
        .map_err(|e| e.in_phase(Phase::Tier1))?;
        phase_finished(sink, Phase::Tier1, report.tier1_placed);

        phase_started(sink, Phase::Tier2);
        report.tier2_placed = append::append_blocks(
            &mut state,
            self.catalog,
            &mut occupancy,
            self.config.tier2_count,
            Some(TAG_INFRASTRUCTURE),
            Phase::Tier2,
            sink,
        )
        .map_err(|e| e.in_phase(Phase::Tier2))?;
        phase_finished(sink, Phase::Tier2, report.tier2_placed);

        phase_started(sink, Phase::Stairs);
        report.stairs_placed = stairs::insert_stairs(
            &mut state,
            self.catalog,
            &mut occupancy,
            self.config.effective_stair_limit(),
            sink,
        )
        .map_err(|e| e.in_phase(Phase::Stairs))?;
        phase_finished(sink, Phase::Stairs, report.stairs_placed);

        phase_started(sink, Phase::Pillars);
        report.pillar_segments_placed =
            pillars::extend_pillars(&mut state, self.catalog, &mut occupancy, sink)
                .map_err(|e| e.in_phase(Phase::Pillars))?;
        phase_finished(sink, Phase::Pillars, report.pillar_segments_placed);

        phase_started(sink, Phase::Props);
        report.props_placed = props::scatter_props(&mut state, self.catalog, &mut occupancy, sink)
            .map_err(|e| e.in_phase(Phase::Props))?;
        phase_finished(sink, Phase::Props, report.props_placed);

        // Teardown: drop every auxiliary structure, keep only accepted
        // instances.
        state.pool.clear();
        state.pillar_anchors.clear();
        state.prop_sockets.clear();
        drop(occupancy);

        report.blocks = state.blocks;
        report.props = state.props;

        info!(
            "Generation finished: {} blocks, {} props.",
            report.blocks.len(),
            report.props.len()
        );
        if sink.wants(GenEventKind::RunFinished) {
            sink.send(GenEvent::RunFinished {
                blocks: report.blocks.len(),
                props: report.props.len(),
            });
        }
        Ok(report)
    }
}

fn phase_started(sink: &mut dyn EventSink, phase: Phase) {
    info!("Phase started: {phase}.");
    if sink.wants(GenEventKind::PhaseStarted) {
        sink.send(GenEvent::PhaseStarted { phase });
    }
}

fn phase_finished(sink: &mut dyn EventSink, phase: Phase, accepted: usize) {
    if sink.wants(GenEventKind::PhaseFinished) {
        sink.send(GenEvent::PhaseFinished { phase, accepted });
    }
}
