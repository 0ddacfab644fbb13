use humanizer::config::Config;
use humanizer::pipeline::confidence::{ConfidenceInputs, confidence};
use humanizer::pipeline::{ConversionRequest, Pipeline, Tone};
use humanizer::text::FactualTokens;

const SAMPLE: &str =
    "The implementation of artificial intelligence technologies has revolutionized various industries.";

#[tokio::test]
async fn sample_sentence_converts_with_high_confidence() {
    let pipeline = Pipeline::from_config(&Config::default());
    let response = pipeline
        .convert(&ConversionRequest::new(SAMPLE))
        .await
        .expect("valid request should convert");

    assert_eq!(
        response.converted_text,
        "The implementation of artificial intelligence technologies has transformed many industries."
    );
    assert!((response.grammar.score - 1.0).abs() < 1e-9);
    assert!(response.humanized.score > 0.5);
    assert!(response.detection.as_ref().unwrap().score < 0.2);
    assert!(response.plagiarism.as_ref().unwrap().score < 0.1);
    assert!(response.confidence > 0.8, "{}", response.confidence);
}

#[tokio::test]
async fn identical_requests_give_identical_output() {
    let first = Pipeline::from_config(&Config::default());
    let second = Pipeline::from_config(&Config::default());
    let text = "Moreover, the rollout went smoothly. However, users did not notice the new menu. Therefore, we will add a tooltip.";
    for tone in [Tone::Formal, Tone::Casual, Tone::Balanced] {
        let mut request = ConversionRequest::new(text);
        request.tone = tone;
        request.preserve_meaning = false;
        let a = first.convert(&request).await.unwrap();
        let b = second.convert(&request).await.unwrap();
        assert_eq!(a.converted_text, b.converted_text, "{tone}");
        assert!((a.confidence - b.confidence).abs() < 1e-12);
    }
}

#[tokio::test]
async fn numbers_and_names_survive_humanization() {
    let pipeline = Pipeline::from_config(&Config::default());
    let text = "In 2021, Microsoft utilized 3 data centers in Dublin. The OECD report did not mention Azure. Revenue grew by 14 percent.";
    let facts = FactualTokens::extract(text);
    for tone in [Tone::Formal, Tone::Casual, Tone::Balanced] {
        let result = pipeline.humanize(text, tone, true).await.unwrap();
        assert!(
            facts.preserved_in(&result.output_text),
            "{tone}: {}",
            result.output_text
        );
    }
}

#[test]
fn confidence_is_monotone_in_every_component() {
    let grid = [0.0, 0.2, 0.5, 0.8, 1.0];
    let base = ConfidenceInputs {
        grammar: 0.5,
        humanization: 0.5,
        detection: Some(0.5),
        plagiarism: Some(0.5),
    };
    for pair in grid.windows(2) {
        let (low, high) = (pair[0], pair[1]);

        let grammar = |v| confidence(&ConfidenceInputs { grammar: v, ..base });
        assert!(grammar(high) >= grammar(low));

        let humanization = |v| confidence(&ConfidenceInputs { humanization: v, ..base });
        assert!(humanization(high) >= humanization(low));

        let detection = |v| {
            confidence(&ConfidenceInputs {
                detection: Some(v),
                ..base
            })
        };
        assert!(detection(high) <= detection(low));

        let plagiarism = |v| {
            confidence(&ConfidenceInputs {
                plagiarism: Some(v),
                ..base
            })
        };
        assert!(plagiarism(high) <= plagiarism(low));
    }
}
