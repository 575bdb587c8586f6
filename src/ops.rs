use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
}

impl AndOp {
    pub fn call(self, u: f64, v: f64) -> f64 {
        match self {
            Self::Min => f64::min(u, v),
            Self::Prod => u * v,
        }
    }
}

/// Or operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
}

impl OrOp {
    pub fn call(self, u: f64, v: f64) -> f64 {
        match self {
            Self::Max => f64::max(u, v),
            Self::ProbOr => u + v - u * v,
        }
    }
}

/// Implication operator shaping a consequence term by a rule's firing strength.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani clipping
    #[default]
    Min,
    /// Larsen scaling
    Prod,
}

impl ImplicationOp {
    pub fn call(self, strength: f64, membership: f64) -> f64 {
        match self {
            Self::Min => f64::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionLink {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl ProductionLink {
    pub fn call(self, u: f64, v: f64) -> f64 {
        match self {
            Self::Max => f64::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => f64::min(1., u + v),
        }
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity over the universe samples
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Returns `None` when `membership` is zero everywhere.
    pub fn call(self, universe: &[f64], membership: &[f64]) -> Option<f64> {
        debug_assert_eq!(universe.len(), membership.len());

        match self {
            Self::Cog => {
                let den = membership.iter().sum::<f64>();

                if den == 0. {
                    return None;
                }

                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(u, m)| u * m)
                    .sum::<f64>();

                Some(num / den)
            },
            Self::Boa => {
                let areas: Vec<f64> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / 2.)
                    .collect();
                let total_area = areas.iter().sum::<f64>();

                if total_area == 0. {
                    return None;
                }

                let target = total_area / 2.;
                let mut cum_area = 0.;

                for (i, area) in areas.iter().enumerate() {
                    cum_area += area;

                    if cum_area >= target {
                        let xp = [cum_area - area, cum_area];
                        let fp = [universe[i], universe[i + 1]];

                        return Some(interp(target, &xp, &fp));
                    }
                }

                universe.last().copied()
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(0., f64::max);

                if maximum == 0. {
                    return None;
                }

                let mut at_max = universe
                    .iter()
                    .zip(membership)
                    .filter_map(|(u, m)| (*m == maximum).then_some(*u));

                match self {
                    Self::Mom => {
                        let (len, sum) = at_max.fold((0usize, 0.), |(len, sum), u| (len + 1, sum + u));

                        Some(sum / len as f64)
                    },
                    Self::Lom => at_max.last(),
                    _ => at_max.next(),
                }
            },
        }
    }
}
