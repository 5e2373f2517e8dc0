//! The circuit sizing environment.
//!
//! One [`CircuitEnv`] per task: an agent proposes normalised device
//! parameters, the simulator evaluates the sized circuit, and the reward
//! measures how far the design still is from its performance targets.
//!
//! Observation layout, for a circuit with `k` metrics and `n` action
//! dimensions:
//!
//! | range            | content                                        |
//! |------------------|------------------------------------------------|
//! | `0..k`           | performance, `value / metric.scale`            |
//! | `k..2k`          | targets, `target / metric.scale`               |
//! | `2k..3k`         | signed relative distance, clipped to ±10       |
//! | `3k..3k+n`       | the normalised action that produced them       |

use gace_core::{
    BoxSpace, Dimension, DimensionKind, EnvError, Environment, Overrides, StepInfo, TaskId,
    Transition,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::action::ActionSchema;
use crate::backend::{open_backend, Simulator};
use crate::circuit::{template, CircuitTemplate};
use crate::config::{ConfigError, EnvConfig};
use crate::technology::TechnologyData;

/// Clip for per-metric distances and shortfalls.
pub const DISTANCE_CLIP: f64 = 10.0;

/// Reward added when every target is met.
pub const SUCCESS_BONUS: f64 = 10.0;

/// A simulation-backed sizing task for one topology and variant.
pub struct CircuitEnv {
    id: TaskId,
    circuit: &'static CircuitTemplate,
    config: EnvConfig,
    targets: Vec<f64>,
    schema: ActionSchema,
    observation_space: BoxSpace,
    simulator: Box<dyn Simulator>,
    rng: ChaCha8Rng,
    episode: Option<Episode>,
}

struct Episode {
    steps: u32,
}

/// One simulated design point.
struct Evaluation {
    performance: Vec<f64>,
    observation: Vec<f32>,
    reward: f64,
    met: usize,
}

impl CircuitEnv {
    /// Build the environment for `id` from caller overrides.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]: unknown or mistyped options, out-of-range
    /// values, unknown target metrics, a variant the topology does not
    /// support, or an unavailable backend.
    pub fn new(id: TaskId, overrides: &Overrides) -> Result<Self, ConfigError> {
        let config = EnvConfig::from_overrides(overrides)?;
        config.validate(template(id.topology))?;
        let tech = TechnologyData::load(id.technology);
        let simulator = open_backend(&config.backend, &tech)?;
        Self::with_simulator(id, config, simulator)
    }

    /// Build the environment around an explicit simulator.
    ///
    /// `config.backend` is not consulted.
    pub fn with_simulator(
        id: TaskId,
        config: EnvConfig,
        simulator: Box<dyn Simulator>,
    ) -> Result<Self, ConfigError> {
        let circuit = template(id.topology);
        config.validate(circuit)?;
        let schema = ActionSchema::new(id, circuit, TechnologyData::load(id.technology))?;
        let observation_space = observation_space(circuit, schema.space())?;
        Ok(Self {
            id,
            circuit,
            targets: config.resolve_targets(circuit),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            schema,
            observation_space,
            simulator,
            episode: None,
        })
    }

    /// The circuit being sized.
    pub fn circuit(&self) -> &'static CircuitTemplate {
        self.circuit
    }

    /// Effective configuration.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Effective targets, in metric order (SI units).
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// The action schema.
    pub fn schema(&self) -> &ActionSchema {
        &self.schema
    }

    /// Name of the simulator backend in use.
    pub fn backend(&self) -> &str {
        self.simulator.name()
    }

    fn evaluate(&mut self, action: &[f32]) -> Result<Evaluation, EnvError> {
        let sizing = self.schema.sizing(action);
        let mut raw = self
            .simulator
            .simulate(self.circuit, &sizing)
            .map_err(|e| EnvError::Simulation {
                reason: e.to_string(),
            })?;

        let metrics = self.circuit.metrics;
        let k = metrics.len();
        let mut performance = Vec::with_capacity(k);
        for m in metrics {
            let value = raw
                .swap_remove(m.name)
                .ok_or_else(|| EnvError::Simulation {
                    reason: format!("backend '{}' did not report '{}'", self.backend(), m.name),
                })?;
            performance.push(value);
        }

        let mut observation = Vec::with_capacity(3 * k + action.len());
        observation.extend(metrics.iter().zip(&performance).map(|(m, v)| (v / m.scale) as f32));
        observation.extend(metrics.iter().zip(&self.targets).map(|(m, t)| (t / m.scale) as f32));
        observation.extend(
            metrics
                .iter()
                .zip(performance.iter().zip(&self.targets))
                .map(|(m, (&v, &t))| m.distance(v, t).clamp(-DISTANCE_CLIP, DISTANCE_CLIP) as f32),
        );
        observation.extend_from_slice(action);

        let mut met = 0;
        let mut penalty = 0.0;
        for (m, (&v, &t)) in metrics.iter().zip(performance.iter().zip(&self.targets)) {
            let shortfall = m.shortfall(v, t);
            if shortfall <= self.config.reltol {
                met += 1;
            } else {
                penalty += shortfall.min(DISTANCE_CLIP);
            }
        }
        let reward = if met == k { SUCCESS_BONUS } else { -penalty };

        Ok(Evaluation {
            performance,
            observation,
            reward,
            met,
        })
    }
}

impl Environment for CircuitEnv {
    fn task_id(&self) -> TaskId {
        self.id
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    fn action_space(&self) -> &BoxSpace {
        self.schema.space()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<Vec<f32>, EnvError> {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        let action = if self.config.random_start {
            self.schema.space().sample(&mut self.rng)
        } else {
            self.schema.nominal()
        };
        self.episode = None;
        let eval = self.evaluate(&action)?;
        tracing::debug!(
            id = %self.id,
            ?seed,
            random_start = self.config.random_start,
            targets_met = eval.met,
            "environment reset"
        );
        self.episode = Some(Episode { steps: 0 });
        Ok(eval.observation)
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError> {
        if self.episode.is_none() {
            return Err(EnvError::NotReset);
        }
        let space = self.schema.space();
        if action.len() != space.len() {
            return Err(EnvError::InvalidAction {
                reason: format!("expected {} values, got {}", space.len(), action.len()),
            });
        }
        if !space.contains(action) {
            return Err(EnvError::InvalidAction {
                reason: "values must be finite and within [-1, 1]".into(),
            });
        }

        let eval = self.evaluate(action)?;
        let steps = match self.episode.as_mut() {
            Some(episode) => {
                episode.steps += 1;
                episode.steps
            }
            None => return Err(EnvError::NotReset),
        };
        let terminal = eval.met == self.circuit.metrics.len();
        let truncated = !terminal && steps >= self.config.max_steps;

        let mut info = StepInfo::new();
        for (m, &v) in self.circuit.metrics.iter().zip(&eval.performance) {
            info.insert(m.name.to_string(), v);
        }
        info.insert("targets_met".into(), eval.met as f64);
        info.insert("steps".into(), f64::from(steps));

        tracing::trace!(
            id = %self.id,
            steps,
            reward = eval.reward,
            terminal,
            truncated,
            "environment step"
        );
        Ok(Transition {
            observation: eval.observation,
            reward: eval.reward,
            terminal,
            truncated,
            info,
        })
    }
}

fn observation_space(
    circuit: &CircuitTemplate,
    action_space: &BoxSpace,
) -> Result<BoxSpace, ConfigError> {
    let clip = DISTANCE_CLIP as f32;
    let metrics = circuit.metrics;
    let dims = metrics
        .iter()
        .map(|m| Dimension::new(m.name, DimensionKind::Performance, f32::NEG_INFINITY, f32::INFINITY))
        .chain(metrics.iter().map(|m| {
            Dimension::new(
                format!("{}_target", m.name),
                DimensionKind::Target,
                f32::NEG_INFINITY,
                f32::INFINITY,
            )
        }))
        .chain(metrics.iter().map(|m| {
            Dimension::new(format!("{}_distance", m.name), DimensionKind::Distance, -clip, clip)
        }))
        .chain(action_space.dims().iter().cloned())
        .collect();
    BoxSpace::new(dims).map_err(ConfigError::Space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Performance, SimulationError, SurrogateSimulator};
    use gace_core::{OverrideValue, Technology, Topology, Variant};

    fn op1(variant: Variant) -> TaskId {
        TaskId::new(Topology::Op1, Technology::Xh035, variant)
    }

    #[test]
    fn step_before_reset_fails() {
        let mut env = CircuitEnv::new(op1(Variant::Electrical), &Overrides::new()).unwrap();
        let action = env.schema().nominal();
        assert_eq!(env.step(&action).unwrap_err(), EnvError::NotReset);
    }

    #[test]
    fn observation_layout_matches_space() {
        let mut env = CircuitEnv::new(op1(Variant::Geometrical), &Overrides::new()).unwrap();
        let obs = env.reset(Some(1)).unwrap();
        let k = env.circuit().metrics.len();
        let n = env.action_space().len();
        assert_eq!(obs.len(), 3 * k + n);
        assert_eq!(obs.len(), env.observation_space().len());
        assert!(env.observation_space().contains(&obs));
        // Nominal start echoes the all-zero action.
        assert!(obs[3 * k..].iter().all(|&a| a == 0.0));
        assert_eq!(env.observation_space().dims()[k].name, "a0_target");
    }

    #[test]
    fn wrong_length_and_out_of_range_actions_are_invalid() {
        let mut env = CircuitEnv::new(op1(Variant::Electrical), &Overrides::new()).unwrap();
        env.reset(None).unwrap();
        let n = env.action_space().len();
        assert!(matches!(
            env.step(&vec![0.0; n - 1]),
            Err(EnvError::InvalidAction { .. })
        ));
        let mut action = vec![0.0; n];
        action[3] = 1.5;
        assert!(matches!(env.step(&action), Err(EnvError::InvalidAction { .. })));
    }

    #[test]
    fn info_reports_performance_and_targets_met() {
        let mut env = CircuitEnv::new(op1(Variant::Electrical), &Overrides::new()).unwrap();
        env.reset(None).unwrap();
        let nominal = env.schema().nominal();
        let t = env.step(&nominal).unwrap();
        for m in env.circuit().metrics {
            assert!(t.info.contains_key(m.name), "missing {}", m.name);
        }
        assert!(t.info["targets_met"] <= env.circuit().metrics.len() as f64);
        assert_eq!(t.info["steps"], 1.0);
    }

    #[test]
    fn easy_targets_terminate_with_bonus() {
        let easy = OverrideValue::from_iter([
            ("a0", -100.0),
            ("ugbw", 1.0),
            ("pm", -360.0),
            ("sr", 1.0),
            ("swing", -10.0),
            ("area", 1.0),
        ]);
        let overrides = Overrides::new().with("target", easy);
        let mut env = CircuitEnv::new(op1(Variant::Electrical), &overrides).unwrap();
        env.reset(None).unwrap();
        let nominal = env.schema().nominal();
        let t = env.step(&nominal).unwrap();
        assert!(t.terminal);
        assert!(!t.truncated);
        assert_eq!(t.reward, SUCCESS_BONUS);
        assert_eq!(t.info["targets_met"], 6.0);
    }

    #[test]
    fn impossible_targets_truncate_at_max_steps() {
        let overrides = Overrides::new()
            .with("max_steps", 3)
            .with("target", OverrideValue::from_iter([("a0", 1000.0)]));
        let mut env = CircuitEnv::new(op1(Variant::Geometrical), &overrides).unwrap();
        env.reset(None).unwrap();
        let action = env.schema().nominal();
        let results: Vec<_> = (0..3).map(|_| env.step(&action).unwrap()).collect();
        assert!(!results[0].done());
        assert!(!results[1].done());
        assert!(results[2].truncated && !results[2].terminal);
        assert!(results.iter().all(|t| t.reward < 0.0));
    }

    #[test]
    fn random_start_is_seeded() {
        let overrides = Overrides::new().with("random_start", true);
        let mut env = CircuitEnv::new(op1(Variant::Geometrical), &overrides).unwrap();
        let a = env.reset(Some(5)).unwrap();
        let b = env.reset(Some(5)).unwrap();
        let c = env.reset(Some(6)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unsupported_variant_fails_construction() {
        let id = TaskId::new(Topology::Nand4, Technology::Xh035, Variant::Electrical);
        assert!(matches!(
            CircuitEnv::new(id, &Overrides::new()),
            Err(ConfigError::UnsupportedVariant { .. })
        ));
    }

    /// Reports nothing, which the environment must treat as a failure.
    struct Silent;

    impl Simulator for Silent {
        fn name(&self) -> &str {
            "silent"
        }
        fn simulate(
            &mut self,
            _circuit: &CircuitTemplate,
            _sizing: &[crate::device::Sizing],
        ) -> Result<Performance, SimulationError> {
            Ok(Performance::new())
        }
    }

    #[test]
    fn missing_metrics_are_a_simulation_error() {
        let mut env = CircuitEnv::with_simulator(
            op1(Variant::Electrical),
            EnvConfig::default(),
            Box::new(Silent),
        )
        .unwrap();
        assert_eq!(env.backend(), "silent");
        match env.reset(None) {
            Err(EnvError::Simulation { reason }) => {
                assert_eq!(reason, "backend 'silent' did not report 'a0'")
            }
            other => panic!("expected Simulation, got {other:?}"),
        }
    }

    /// Delegates to the surrogate until its budget of calls runs out.
    struct Flaky {
        inner: SurrogateSimulator,
        remaining: u32,
    }

    impl Simulator for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }
        fn simulate(
            &mut self,
            circuit: &CircuitTemplate,
            sizing: &[crate::device::Sizing],
        ) -> Result<Performance, SimulationError> {
            if self.remaining == 0 {
                return Err(SimulationError::NonFinite { metric: "a0" });
            }
            self.remaining -= 1;
            self.inner.simulate(circuit, sizing)
        }
    }

    #[test]
    fn failed_reset_discards_the_previous_episode() {
        let config = EnvConfig {
            max_steps: 3,
            ..EnvConfig::default()
        };
        let simulator = Flaky {
            inner: SurrogateSimulator::new(TechnologyData::load(Technology::Xh035)),
            remaining: 3,
        };
        let mut env =
            CircuitEnv::with_simulator(op1(Variant::Electrical), config, Box::new(simulator))
                .unwrap();
        env.reset(Some(1)).unwrap();
        let action = env.schema().nominal();
        env.step(&action).unwrap();
        env.step(&action).unwrap();

        assert!(matches!(
            env.reset(Some(2)),
            Err(EnvError::Simulation { .. })
        ));
        assert_eq!(env.step(&action).unwrap_err(), EnvError::NotReset);
    }
}
