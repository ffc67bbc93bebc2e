use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape family the bars radiate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    Circular,
    Triangle,
    Square,
    Pentagon,
    Hexagon,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 5] = [
        VisualizationMode::Circular,
        VisualizationMode::Triangle,
        VisualizationMode::Square,
        VisualizationMode::Pentagon,
        VisualizationMode::Hexagon,
    ];

    /// Polygon side count, `None` for the circle
    pub fn sides(self) -> Option<u32> {
        match self {
            VisualizationMode::Circular => None,
            VisualizationMode::Triangle => Some(3),
            VisualizationMode::Square => Some(4),
            VisualizationMode::Pentagon => Some(5),
            VisualizationMode::Hexagon => Some(6),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VisualizationMode::Circular => "circular",
            VisualizationMode::Triangle => "triangle",
            VisualizationMode::Square => "square",
            VisualizationMode::Pentagon => "pentagon",
            VisualizationMode::Hexagon => "hexagon",
        }
    }

    /// Uniform pick over all modes
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Uniform pick over the other four modes; never returns `self`.
    pub fn pick_other<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let others: Vec<Self> = Self::ALL.into_iter().filter(|&m| m != self).collect();
        others[rng.random_range(0..others.len())]
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_sides() {
        assert_eq!(VisualizationMode::Circular.sides(), None);
        assert_eq!(VisualizationMode::Triangle.sides(), Some(3));
        assert_eq!(VisualizationMode::Hexagon.sides(), Some(6));
    }

    #[test]
    fn test_pick_other_reaches_all_remaining_modes() {
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<_> = (0..200)
            .map(|_| VisualizationMode::Square.pick_other(&mut rng))
            .collect();
        assert_eq!(seen.len(), 4);
        assert!(!seen.contains(&VisualizationMode::Square));
    }

    #[test]
    fn test_random_covers_every_mode() {
        let mut rng = StdRng::seed_from_u64(5);
        let seen: HashSet<_> = (0..200).map(|_| VisualizationMode::random(&mut rng)).collect();
        assert_eq!(seen.len(), VisualizationMode::ALL.len());
    }

    proptest! {
        #[test]
        fn prop_pick_other_never_repeats(seed in any::<u64>(), index in 0usize..5) {
            let mut rng = StdRng::seed_from_u64(seed);
            let current = VisualizationMode::ALL[index];
            prop_assert_ne!(current.pick_other(&mut rng), current);
        }
    }
}
