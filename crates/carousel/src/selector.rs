use crate::wrapped::WrappedList;
use rand::Rng;
use std::time::Duration;

const MAX_GROWTH_FACTOR: f64 = 10.0;

/// Timing of a spin: total duration range and the geometric tick backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinConfig {
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub initial_delay: Duration,
    pub growth_factor: f64,
    pub max_delay: Duration,
    pub reveal_delay: Duration,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_duration: Duration::from_secs(8),
            max_duration: Duration::from_secs(15),
            initial_delay: Duration::from_millis(50),
            growth_factor: 1.10,
            max_delay: Duration::from_millis(500),
            reveal_delay: Duration::from_millis(300),
        }
    }
}

impl SpinConfig {
    /// Fixed half-second steps, three to six of them.
    pub fn classic() -> Self {
        Self {
            min_duration: Duration::from_millis(1500),
            max_duration: Duration::from_millis(3000),
            initial_delay: Duration::from_millis(500),
            growth_factor: 1.0,
            max_delay: Duration::from_millis(500),
            reveal_delay: Duration::ZERO,
        }
    }

    /// Repairs values a spin cannot run with.
    pub fn normalized(mut self) -> Self {
        if self.min_duration > self.max_duration {
            std::mem::swap(&mut self.min_duration, &mut self.max_duration);
        }
        self.growth_factor = if self.growth_factor.is_finite() {
            self.growth_factor.clamp(1.0, MAX_GROWTH_FACTOR)
        } else {
            1.0
        };
        self.initial_delay = self.initial_delay.max(Duration::from_millis(1));
        self.max_delay = self.max_delay.max(self.initial_delay);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub duration: Duration,
    pub final_index: usize,
    pub delay: Duration,
    pub elapsed: Duration,
    pub ticks: u32,
    growth_factor: f64,
    max_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStep {
    Advanced { index: usize, next_delay: Duration },
    Settled { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Spinning(SpinPlan),
}

/// Index controller over a [`WrappedList`]. It never sleeps; the owner
/// schedules corrections and ticks on its own thread.
#[derive(Debug, Clone)]
pub struct CarouselSelector<T> {
    list: WrappedList<T>,
    current_index: usize,
    phase: Phase,
    pending_correction: Option<usize>,
    epoch: u64,
}

impl<T> CarouselSelector<T> {
    pub fn new(list: WrappedList<T>) -> Self {
        Self {
            current_index: Self::home_index(&list),
            list,
            phase: Phase::Idle,
            pending_correction: None,
            epoch: 0,
        }
    }

    fn home_index(list: &WrappedList<T>) -> usize {
        if list.is_empty() { 0 } else { 1 }
    }

    pub fn list(&self) -> &WrappedList<T> {
        &self.list
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&T> {
        self.list.get(self.current_index)
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Spinning(_))
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        match &self.phase {
            Phase::Spinning(plan) => Some(plan),
            Phase::Idle => None,
        }
    }

    /// Work scheduled under an older epoch is stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pending_correction(&self) -> Option<usize> {
        self.pending_correction
    }

    /// Landing on a phantom yields the real index to jump to, committed
    /// later by [`Self::commit_pending_correction`].
    pub fn on_index_changed(&mut self, new_index: usize) -> Option<usize> {
        if self.is_spinning() || new_index >= self.list.len() {
            return None;
        }

        self.current_index = new_index;
        self.pending_correction = match new_index {
            0 => Some(self.list.len() - 2),
            i if i == self.list.len() - 1 => Some(1),
            _ => None,
        };
        self.pending_correction
    }

    pub fn commit_pending_correction(&mut self) -> Option<usize> {
        let target = self.pending_correction.take()?;
        if self.is_spinning() || !self.list.is_phantom(self.current_index) {
            return None;
        }
        self.current_index = target;
        Some(target)
    }

    /// Returns the delay before the first tick, or `None` if nothing started.
    pub fn spin<R: Rng>(&mut self, rng: &mut R, config: &SpinConfig) -> Option<Duration> {
        if self.list.is_empty() || self.is_spinning() {
            return None;
        }

        let config = config.clone().normalized();
        let duration = Duration::try_from_secs_f64(
            rng.random_range(config.min_duration.as_secs_f64()..=config.max_duration.as_secs_f64()),
        )
        .unwrap_or(config.max_duration);
        let final_index = rng.random_range(1..=self.list.real_len());

        log::debug!(
            "Spin started: {:.2}s towards index {}",
            duration.as_secs_f64(),
            final_index
        );

        self.epoch += 1;
        self.pending_correction = None;
        self.phase = Phase::Spinning(SpinPlan {
            duration,
            final_index,
            delay: config.initial_delay,
            elapsed: Duration::ZERO,
            ticks: 0,
            growth_factor: config.growth_factor,
            max_delay: config.max_delay,
        });
        Some(config.initial_delay)
    }

    /// `elapsed` is the monotonic time since the spin started.
    pub fn tick(&mut self, elapsed: Duration) -> Option<SpinStep> {
        let Phase::Spinning(plan) = &mut self.phase else {
            return None;
        };

        plan.elapsed = elapsed;
        if plan.elapsed >= plan.duration {
            let index = plan.final_index;
            log::debug!("Spin settled on index {} after {} ticks", index, plan.ticks);
            self.current_index = index;
            self.phase = Phase::Idle;
            return Some(SpinStep::Settled { index });
        }

        let real_len = self.list.real_len();
        // Step through [1, real_len] circularly.
        self.current_index = self.current_index % real_len + 1;
        plan.ticks += 1;
        let grown = plan.delay.as_secs_f64() * plan.growth_factor;
        plan.delay = if grown < plan.max_delay.as_secs_f64() {
            Duration::from_secs_f64(grown)
        } else {
            plan.max_delay
        };

        Some(SpinStep::Advanced {
            index: self.current_index,
            next_delay: plan.delay,
        })
    }

    pub fn switch_data_source(&mut self, list: WrappedList<T>) {
        self.current_index = Self::home_index(&list);
        self.list = list;
        self.phase = Phase::Idle;
        self.pending_correction = None;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selector(n: usize) -> CarouselSelector<usize> {
        CarouselSelector::new(WrappedList::new((0..n).collect()))
    }

    // Fake clock: advances by exactly each requested delay.
    fn run_spin(selector: &mut CarouselSelector<usize>, first_delay: Duration) -> Vec<SpinStep> {
        let mut steps = Vec::new();
        let mut elapsed = Duration::ZERO;
        let mut delay = first_delay;
        loop {
            elapsed += delay;
            let step = selector.tick(elapsed).unwrap();
            steps.push(step);
            match step {
                SpinStep::Advanced { next_delay, .. } => delay = next_delay,
                SpinStep::Settled { .. } => return steps,
            }
        }
    }

    #[test]
    fn test_starts_on_first_real_item() {
        assert_eq!(selector(3).current_index(), 1);
        assert_eq!(selector(0).current_index(), 0);
    }

    #[test]
    fn test_boundary_correction_is_deferred() {
        let mut sel = selector(4);

        assert_eq!(sel.on_index_changed(0), Some(4));
        assert_eq!(sel.current_index(), 0);
        assert_eq!(sel.commit_pending_correction(), Some(4));
        assert_eq!(sel.current_index(), 4);

        assert_eq!(sel.on_index_changed(5), Some(1));
        assert_eq!(sel.commit_pending_correction(), Some(1));
        assert_eq!(sel.current_index(), 1);
    }

    #[test]
    fn test_inner_index_needs_no_correction() {
        let mut sel = selector(4);
        assert_eq!(sel.on_index_changed(3), None);
        assert_eq!(sel.current_index(), 3);
        assert_eq!(sel.commit_pending_correction(), None);
        assert_eq!(sel.current_index(), 3);
    }

    #[test]
    fn test_correction_dropped_when_user_moves_on() {
        let mut sel = selector(4);
        sel.on_index_changed(0);
        sel.on_index_changed(2);
        assert_eq!(sel.commit_pending_correction(), None);
        assert_eq!(sel.current_index(), 2);
    }

    #[test]
    fn test_index_change_ignored_while_spinning() {
        let mut sel = selector(4);
        let mut rng = StdRng::seed_from_u64(7);
        sel.spin(&mut rng, &SpinConfig::default()).unwrap();

        let before = sel.current_index();
        assert_eq!(sel.on_index_changed(0), None);
        assert_eq!(sel.on_index_changed(2), None);
        assert_eq!(sel.current_index(), before);
        assert_eq!(sel.pending_correction(), None);
    }

    #[test]
    fn test_spin_started_drops_pending_correction() {
        let mut sel = selector(4);
        let mut rng = StdRng::seed_from_u64(1);
        sel.on_index_changed(0);
        sel.spin(&mut rng, &SpinConfig::default()).unwrap();
        assert_eq!(sel.commit_pending_correction(), None);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut sel = selector(2);
        assert_eq!(sel.on_index_changed(9), None);
        assert_eq!(sel.current_index(), 1);
    }

    #[test]
    fn test_spin_settles_on_real_item() {
        for seed in 0..50 {
            let mut sel = selector(5);
            let mut rng = StdRng::seed_from_u64(seed);
            let first = sel.spin(&mut rng, &SpinConfig::default()).unwrap();
            let target = sel.plan().unwrap().final_index;

            let steps = run_spin(&mut sel, first);

            assert_eq!(steps.last(), Some(&SpinStep::Settled { index: target }));
            assert!((1..=5).contains(&sel.current_index()));
            assert_eq!(sel.current_index(), target);
            assert!(!sel.is_spinning());
        }
    }

    #[test]
    fn test_spin_advances_circularly_over_real_items() {
        let mut sel = selector(3);
        let mut rng = StdRng::seed_from_u64(3);
        let first = sel.spin(&mut rng, &SpinConfig::default()).unwrap();

        let advanced: Vec<usize> = run_spin(&mut sel, first)
            .into_iter()
            .filter_map(|step| match step {
                SpinStep::Advanced { index, .. } => Some(index),
                SpinStep::Settled { .. } => None,
            })
            .collect();

        assert!(advanced.len() > 3);
        assert_eq!(&advanced[..4], &[2, 3, 1, 2]);
    }

    #[test]
    fn test_delay_grows_geometrically_up_to_cap() {
        let config = SpinConfig::default();
        let mut sel = selector(6);
        let mut rng = StdRng::seed_from_u64(11);
        let first = sel.spin(&mut rng, &config).unwrap();
        assert_eq!(first, config.initial_delay);

        let delays: Vec<Duration> = run_spin(&mut sel, first)
            .into_iter()
            .filter_map(|step| match step {
                SpinStep::Advanced { next_delay, .. } => Some(next_delay),
                SpinStep::Settled { .. } => None,
            })
            .collect();

        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= config.max_delay));
        assert_eq!(delays.last(), Some(&config.max_delay));
        assert!(delays[0] > config.initial_delay);
    }

    #[test]
    fn test_classic_profile_uses_fixed_steps() {
        let mut sel = selector(8);
        let mut rng = StdRng::seed_from_u64(5);
        let first = sel.spin(&mut rng, &SpinConfig::classic()).unwrap();
        let steps = run_spin(&mut sel, first);

        assert!((3..=6).contains(&steps.len()));
        assert!(steps.iter().all(|step| match step {
            SpinStep::Advanced { next_delay, .. } => *next_delay == Duration::from_millis(500),
            SpinStep::Settled { .. } => true,
        }));
    }

    #[test]
    fn test_spin_while_spinning_is_noop() {
        let mut sel = selector(5);
        let mut rng = StdRng::seed_from_u64(42);
        sel.spin(&mut rng, &SpinConfig::default()).unwrap();
        sel.tick(Duration::from_millis(50));
        let plan = sel.plan().cloned();
        let epoch = sel.epoch();

        assert_eq!(sel.spin(&mut rng, &SpinConfig::classic()), None);
        assert_eq!(sel.plan().cloned(), plan);
        assert_eq!(sel.epoch(), epoch);
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut sel = selector(0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sel.spin(&mut rng, &SpinConfig::default()), None);
        assert_eq!(sel.on_index_changed(0), None);
        assert_eq!(sel.tick(Duration::from_secs(1)), None);
        assert_eq!(sel.current_item(), None);
    }

    #[test]
    fn test_single_item_spin() {
        let mut sel = selector(1);
        let mut rng = StdRng::seed_from_u64(9);
        let first = sel.spin(&mut rng, &SpinConfig::classic()).unwrap();
        run_spin(&mut sel, first);
        assert_eq!(sel.current_index(), 1);
    }

    #[test]
    fn test_switch_data_source_resets_state() {
        let mut sel = selector(5);
        let mut rng = StdRng::seed_from_u64(2);
        sel.spin(&mut rng, &SpinConfig::default()).unwrap();
        sel.tick(Duration::from_millis(50));
        sel.tick(Duration::from_millis(105));
        let epoch = sel.epoch();

        sel.switch_data_source(WrappedList::new(vec![10, 20]));

        assert_eq!(sel.current_index(), 1);
        assert!(!sel.is_spinning());
        assert_eq!(sel.current_item(), Some(&10));
        assert!(sel.epoch() > epoch);
        assert_eq!(sel.tick(Duration::from_secs(60)), None);
    }

    #[test]
    fn test_normalized_repairs_config() {
        let config = SpinConfig {
            min_duration: Duration::from_secs(5),
            max_duration: Duration::from_secs(2),
            initial_delay: Duration::ZERO,
            growth_factor: 0.5,
            max_delay: Duration::ZERO,
            reveal_delay: Duration::ZERO,
        }
        .normalized();

        assert_eq!(config.min_duration, Duration::from_secs(2));
        assert_eq!(config.max_duration, Duration::from_secs(5));
        assert_eq!(config.growth_factor, 1.0);
        assert_eq!(config.initial_delay, Duration::from_millis(1));
        assert_eq!(config.max_delay, Duration::from_millis(1));

        let steep = SpinConfig {
            growth_factor: 1e300,
            ..SpinConfig::default()
        }
        .normalized();
        assert_eq!(steep.growth_factor, MAX_GROWTH_FACTOR);

        let flat = SpinConfig {
            growth_factor: f64::NAN,
            ..SpinConfig::default()
        }
        .normalized();
        assert_eq!(flat.growth_factor, 1.0);
    }

    #[test]
    fn test_steep_growth_caps_at_max_delay() {
        let config = SpinConfig {
            growth_factor: 1e300,
            ..SpinConfig::default()
        };
        let mut sel = selector(4);
        let mut rng = StdRng::seed_from_u64(4);
        sel.spin(&mut rng, &config).unwrap();

        let step = sel.tick(Duration::from_millis(50)).unwrap();
        assert!(matches!(
            step,
            SpinStep::Advanced { next_delay, .. } if next_delay == config.max_delay
        ));
    }
}
