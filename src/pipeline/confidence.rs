use super::types::clamp_unit;

pub const GRAMMAR_WEIGHT: f64 = 0.2;
pub const HUMANIZATION_WEIGHT: f64 = 0.3;
pub const DETECTION_WEIGHT: f64 = 0.3;
pub const PLAGIARISM_WEIGHT: f64 = 0.2;

/// Stage scores feeding the overall confidence. Detection and plagiarism
/// are absent when the caller skipped those checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub grammar: f64,
    pub humanization: f64,
    pub detection: Option<f64>,
    pub plagiarism: Option<f64>,
}

/// Weighted mean of `grammar`, `humanization`, `1 - detection` and
/// `1 - plagiarism`, renormalised over the components that are present.
///
/// Non-decreasing in grammar and humanization, non-increasing in detection
/// and plagiarism. Always in `[0, 1]`.
pub fn confidence(inputs: &ConfidenceInputs) -> f64 {
    let mut components = vec![
        (clamp_unit(inputs.grammar), GRAMMAR_WEIGHT),
        (clamp_unit(inputs.humanization), HUMANIZATION_WEIGHT),
    ];
    if let Some(detection) = inputs.detection {
        components.push((1.0 - clamp_unit(detection), DETECTION_WEIGHT));
    }
    if let Some(plagiarism) = inputs.plagiarism {
        components.push((1.0 - clamp_unit(plagiarism), PLAGIARISM_WEIGHT));
    }

    let total_weight: f64 = components.iter().map(|(_, w)| w).sum();
    let weighted: f64 = components.iter().map(|(v, w)| v * w).sum();
    clamp_unit(weighted / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(grammar: f64, humanization: f64, detection: f64, plagiarism: f64) -> ConfidenceInputs {
        ConfidenceInputs {
            grammar,
            humanization,
            detection: Some(detection),
            plagiarism: Some(plagiarism),
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum = GRAMMAR_WEIGHT + HUMANIZATION_WEIGHT + DETECTION_WEIGHT + PLAGIARISM_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_and_worst_cases() {
        assert!((confidence(&full(1.0, 1.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!(confidence(&full(0.0, 0.0, 1.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn known_value() {
        // 0.2*1.0 + 0.3*0.6 + 0.3*0.9 + 0.2*1.0
        let value = confidence(&full(1.0, 0.6, 0.1, 0.0));
        assert!((value - 0.85).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn skipped_checks_are_renormalised() {
        let value = confidence(&ConfidenceInputs {
            grammar: 1.0,
            humanization: 0.5,
            detection: None,
            plagiarism: None,
        });
        // (0.2*1.0 + 0.3*0.5) / 0.5
        assert!((value - 0.7).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn monotone_in_every_component() {
        let grid = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        let base = full(0.5, 0.5, 0.5, 0.5);
        for low in grid {
            for high in grid.iter().copied().filter(|h| *h >= low) {
                let c = |i: ConfidenceInputs| confidence(&i);
                assert!(
                    c(ConfidenceInputs { grammar: high, ..base })
                        >= c(ConfidenceInputs { grammar: low, ..base })
                );
                assert!(
                    c(ConfidenceInputs { humanization: high, ..base })
                        >= c(ConfidenceInputs { humanization: low, ..base })
                );
                assert!(
                    c(ConfidenceInputs { detection: Some(high), ..base })
                        <= c(ConfidenceInputs { detection: Some(low), ..base })
                );
                assert!(
                    c(ConfidenceInputs { plagiarism: Some(high), ..base })
                        <= c(ConfidenceInputs { plagiarism: Some(low), ..base })
                );
            }
        }
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let value = confidence(&full(2.0, -1.0, f64::NAN, 5.0));
        assert!((0.0..=1.0).contains(&value));
    }
}
