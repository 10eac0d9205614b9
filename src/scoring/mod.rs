//! The scoring engine.
//!
//! Every metric named in the `scoring` configuration contributes to a
//! transcript's score: the candidate pool is restricted by the metric's
//! filter, the raw values are rescaled into [0, 1] (`max`, `min` or
//! `target` mode), multiplied by the metric's multiplier and summed.
//! Transcripts failing the `requirements` expression end up with a
//! score of 0, whatever their metric values.

pub mod expression;

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use itertools::MinMaxResult;

use crate::config::{parameter_metric_name, Configuration, Rescaling};
use crate::metrics::Metric;
use crate::models::Transcript;

/// Scores the given transcripts in place.
///
/// Returns the tids of the transcripts that failed the requirements
/// expression; their score has been forced to 0.
pub fn score_transcripts(
    config: &Configuration,
    transcripts: &mut BTreeMap<String, Transcript>,
) -> BTreeSet<String> {
    for transcript in transcripts.values_mut() {
        transcript.set_score(0.0);
    }

    for (name, parameter) in &config.scoring {
        let metric = match Metric::from_name(name) {
            Some(metric) => metric,
            None => continue,
        };

        // 1. candidate pool: every transcript passing the metric filter
        let pool: Vec<(String, f64)> = transcripts
            .iter()
            .map(|(tid, t)| (tid.clone(), metric.value(t).as_f64()))
            .filter(|(_, value)| match &parameter.filter {
                Some(filter) => filter.matches(*value),
                None => true,
            })
            .collect();
        if pool.is_empty() {
            continue;
        }

        let (min, max) = match pool.iter().map(|(_, v)| *v).minmax() {
            MinMaxResult::NoElements => continue,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(a, b) => (a, b),
        };

        for (tid, value) in &pool {
            let rescaled = if pool.len() == 1 || min == max {
                1.0
            } else {
                match parameter.rescaling {
                    Rescaling::Max => (value - min) / (max - min),
                    Rescaling::Min => (max - value) / (max - min),
                    Rescaling::Target => {
                        // validated: target rescaling always carries a value
                        let target = parameter.value.unwrap();
                        let spread = (max - target).abs().max((target - min).abs());
                        if spread == 0.0 {
                            1.0
                        } else {
                            1.0 - (value - target).abs() / spread
                        }
                    }
                }
            };
            let transcript = transcripts.get_mut(tid).unwrap();
            transcript.set_score(transcript.score() + rescaled * parameter.multiplier);
        }
    }

    apply_requirements(config, transcripts)
}

/// Evaluates the requirements expression for every transcript and
/// zeroes the score of those failing it.
fn apply_requirements(
    config: &Configuration,
    transcripts: &mut BTreeMap<String, Transcript>,
) -> BTreeSet<String> {
    let mut not_passing = BTreeSet::new();
    let requirements = match &config.requirements {
        Some(requirements) => requirements,
        None => return not_passing,
    };
    let compiled = match &requirements.compiled {
        Some(compiled) => compiled,
        None => return not_passing,
    };

    for (tid, transcript) in transcripts.iter_mut() {
        let mut outcomes = BTreeMap::new();
        for (key, filter) in &requirements.parameters {
            let passed = match Metric::from_name(parameter_metric_name(key)) {
                Some(metric) => filter.matches(metric.value(transcript).as_f64()),
                None => false,
            };
            outcomes.insert(key.clone(), passed);
        }
        if !compiled.evaluate(&outcomes) {
            transcript.set_score(0.0);
            not_passing.insert(tid.clone());
        }
    }
    not_passing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterValue, MetricFilter, Operator, Requirements};
    use crate::tests::transcripts::{exon_overlap_trio, scoring_configuration};

    fn pool() -> BTreeMap<String, Transcript> {
        exon_overlap_trio()
            .into_iter()
            .map(|mut t| {
                t.finalize().unwrap();
                (t.tid().to_string(), t)
            })
            .collect()
    }

    #[test]
    fn test_max_rescaling() {
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let mut transcripts = pool();
        score_transcripts(&config, &mut transcripts);

        let lengths: BTreeMap<String, u32> = transcripts
            .iter()
            .map(|(tid, t)| (tid.clone(), t.cdna_length()))
            .collect();
        let best = lengths.iter().max_by_key(|(_, len)| **len).unwrap().0;
        let worst = lengths.iter().min_by_key(|(_, len)| **len).unwrap().0;
        assert_eq!(transcripts[best].score(), 1.0);
        assert_eq!(transcripts[worst].score(), 0.0);
    }

    #[test]
    fn test_min_rescaling_inverts() {
        let config = scoring_configuration("cdna_length", Rescaling::Min, None, 1.0);
        let mut transcripts = pool();
        score_transcripts(&config, &mut transcripts);
        let lengths: BTreeMap<String, u32> = transcripts
            .iter()
            .map(|(tid, t)| (tid.clone(), t.cdna_length()))
            .collect();
        let best = lengths.iter().min_by_key(|(_, len)| **len).unwrap().0;
        assert_eq!(transcripts[best].score(), 1.0);
    }

    #[test]
    fn test_target_rescaling() {
        let mut transcripts = pool();
        let target = transcripts.values().next().unwrap().cdna_length() as f64;
        let config = scoring_configuration("cdna_length", Rescaling::Target, Some(target), 1.0);
        score_transcripts(&config, &mut transcripts);
        for t in transcripts.values() {
            if t.cdna_length() as f64 == target {
                assert_eq!(t.score(), 1.0);
            } else {
                assert!(t.score() < 1.0);
            }
        }
    }

    #[test]
    fn test_multiplier_scales_scores() {
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 5.0);
        let mut transcripts = pool();
        score_transcripts(&config, &mut transcripts);
        let top = transcripts
            .values()
            .map(|t| t.score())
            .fold(0.0, f64::max);
        assert_eq!(top, 5.0);
    }

    #[test]
    fn test_filtered_out_transcripts_score_zero() {
        let mut transcripts = pool();
        let shortest = transcripts
            .values()
            .map(|t| t.cdna_length())
            .min()
            .unwrap();
        let mut config = scoring_configuration("cdna_length", Rescaling::Min, None, 1.0);
        // the shortest transcript is excluded from the pool and must
        // not profit from the min rescaling
        config.scoring.get_mut("cdna_length").unwrap().filter = Some(MetricFilter {
            operator: Operator::Gt,
            value: FilterValue::Number(shortest as f64),
        });
        score_transcripts(&config, &mut transcripts);
        for t in transcripts.values() {
            if t.cdna_length() == shortest {
                assert_eq!(t.score(), 0.0);
            }
        }
        // the rescaling ran over the restricted pool only
        let top = transcripts.values().map(|t| t.score()).fold(0.0, f64::max);
        assert_eq!(top, 1.0);
    }

    #[test]
    fn test_single_member_pool_scores_one() {
        let config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let mut transcripts = pool();
        let keep = transcripts.keys().next().unwrap().clone();
        transcripts.retain(|tid, _| *tid == keep);
        score_transcripts(&config, &mut transcripts);
        assert_eq!(transcripts[&keep].score(), 1.0);
    }

    #[test]
    fn test_requirements_zero_failing_transcripts() {
        let mut config = scoring_configuration("cdna_length", Rescaling::Max, None, 1.0);
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "cdna_length".to_string(),
            MetricFilter {
                operator: Operator::Gt,
                value: FilterValue::Number(1e6),
            },
        );
        config.requirements = Some(Requirements {
            parameters,
            expression: None,
            compiled: None,
        });
        config.validate().unwrap();

        let mut transcripts = pool();
        let failing = score_transcripts(&config, &mut transcripts);
        assert_eq!(failing.len(), transcripts.len());
        for t in transcripts.values() {
            assert_eq!(t.score(), 0.0);
        }
    }
}
