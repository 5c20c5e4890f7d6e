/// Best, average and worst fitness of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    pub best: f64,
    pub average: f64,
    pub worst: f64,
}

/// One progress report for a job, produced once per poll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub current_generation: u32,
    pub total_generations: u32,
    /// `None` when the server omitted any part of the fitness triple.
    pub fitness: Option<Fitness>,
    pub completed: bool,
}

impl ProgressSnapshot {
    pub fn new(current_generation: u32, total_generations: u32, fitness: Fitness) -> Self {
        Self {
            current_generation,
            total_generations,
            fitness: Some(fitness),
            completed: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    pub fn is_renderable(&self) -> bool {
        self.fitness.is_some()
    }

    /// Percentage of generations done, clamped to 0..=100.
    pub fn generation_percent(&self) -> f64 {
        if self.total_generations == 0 {
            return 0.0;
        }
        let percent =
            f64::from(self.current_generation) / f64::from(self.total_generations) * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

/// Snapshots delivered to the renderer together.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Renderable snapshots in arrival order.
    pub snapshots: Vec<ProgressSnapshot>,
    /// Malformed snapshots removed before emission.
    pub dropped: usize,
    /// Batcher tick count at the moment of emission.
    pub tick: u64,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&ProgressSnapshot> {
        self.snapshots.last()
    }

    pub fn is_final(&self) -> bool {
        self.latest().is_some_and(|snapshot| snapshot.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitness() -> Fitness {
        Fitness {
            best: 1.0,
            average: 2.0,
            worst: 3.0,
        }
    }

    #[test]
    fn generation_percent_handles_zero_and_overshoot() {
        assert_eq!(ProgressSnapshot::new(5, 0, fitness()).generation_percent(), 0.0);
        assert_eq!(ProgressSnapshot::new(25, 100, fitness()).generation_percent(), 25.0);
        assert_eq!(ProgressSnapshot::new(120, 100, fitness()).generation_percent(), 100.0);
    }

    #[test]
    fn batch_is_final_only_when_last_snapshot_completed() {
        let batch = Batch {
            snapshots: vec![
                ProgressSnapshot::new(1, 2, fitness()).completed(),
                ProgressSnapshot::new(2, 2, fitness()),
            ],
            dropped: 0,
            tick: 2,
        };
        assert!(!batch.is_final());
        assert_eq!(batch.latest().map(|s| s.current_generation), Some(2));
    }
}
