use crate::infra::{InMemoryProfileRepository, InMemoryPropertyCatalog, JudgmentArg};
use clap::Args;
use rentpro::config::{validate_threshold, AppConfig};
use rentpro::error::AppError;
use rentpro::preferences::{
    CriteriaOrder, Criterion, GateDecision, PairJudgment, PairwiseJudgments,
    PreferenceInput, PreferenceProfileService, PreferenceSubmitter, ServiceAuthority,
    SubmissionGate, UserId,
};
use rentpro::recommendations::{
    PropertyCsvImporter, RecommendationError, RecommendationService, RecommendationsResponse,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_PROFILE_NAME: &str = "Family move";
const DEMO_PRICE_BOOST: f64 = 0.3;

#[derive(Args, Debug, Default)]
pub(crate) struct PreviewArgs {
    /// Pairwise judgment as criterion_a:criterion_b:A_OVER_B|B_OVER_A:intensity (repeatable)
    #[arg(long = "judgment", value_parser = crate::infra::parse_judgment)]
    pub(crate) judgments: Vec<JudgmentArg>,
    /// Profile name checked by the submit gate
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Consistency ratio threshold in (0, 1] (defaults to RENTPRO_CR_THRESHOLD, then 0.10)
    #[arg(long, value_parser = crate::infra::parse_threshold_arg)]
    pub(crate) threshold: Option<f64>,
    /// Print the preview as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional property CSV export used instead of the sample listings
    #[arg(long)]
    pub(crate) properties_csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PreviewReport<'a> {
    criteria_order: &'a [String],
    threshold: f64,
    can_submit: bool,
    #[serde(flatten)]
    decision: &'a GateDecision,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let order = CriteriaOrder::standard();
    let judgments = collect_judgments(&args.judgments)?;
    let threshold = resolve_threshold(args.threshold)?;
    let name = args.name.as_deref().unwrap_or(DEMO_PROFILE_NAME);

    let input = PreferenceInput::from(judgments);
    let decision = SubmissionGate::new(threshold).evaluate(&order, name, &input);

    if args.json {
        let report = PreviewReport {
            criteria_order: order.keys(),
            threshold,
            can_submit: decision.can_submit(),
            decision: &decision,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render_decision(&order, &decision, threshold);
    Ok(())
}

fn resolve_threshold(requested: Option<f64>) -> Result<f64, AppError> {
    match requested {
        Some(value) => Ok(validate_threshold(value)?),
        None => Ok(AppConfig::load()?.analysis.cr_threshold),
    }
}

fn collect_judgments(args: &[JudgmentArg]) -> Result<PairwiseJudgments, AppError> {
    let mut judgments = PairwiseJudgments::new();
    for arg in args {
        for key in [&arg.criterion_a, &arg.criterion_b] {
            if Criterion::from_key(key).is_none() {
                return Err(AppError::Input(format!("unknown criterion '{key}'")));
            }
        }
        if arg.criterion_a == arg.criterion_b {
            return Err(AppError::Input(format!(
                "criterion '{}' cannot be compared with itself",
                arg.criterion_a
            )));
        }
        judgments.set(&arg.criterion_a, &arg.criterion_b, arg.judgment);
    }
    Ok(judgments)
}

fn render_decision(order: &CriteriaOrder, decision: &GateDecision, threshold: f64) {
    match &decision.preview {
        Some(preview) => {
            println!("  Weights:");
            for (key, weight) in order.keys().iter().zip(&preview.weights) {
                println!("    {:<14} {:.3}", key, weight);
            }
            println!(
                "  Consistency ratio: {:.3} (threshold {:.2})",
                preview.consistency_ratio, threshold
            );
        }
        None => println!(
            "  Preview unavailable: all {} pairs need a judgment",
            order.pair_count()
        ),
    }

    if decision.can_submit() {
        println!("  Submit: allowed");
    } else {
        println!("  Submit: blocked");
        for block in &decision.blocks {
            println!("    - {}", block.describe());
        }
    }

    for contradiction in &decision.contradictions {
        println!(
            "  Contradiction in {} (score {:.2}); revisit {} vs {}",
            contradiction.triad.join(" / "),
            contradiction.score,
            contradiction.suggest_pair[0],
            contradiction.suggest_pair[1]
        );
    }
}

fn price_first_judgments() -> PairwiseJudgments {
    let mut judgments = PairwiseJudgments::new();
    judgments.set("price", "size", PairJudgment::favoring_a(3.0));
    judgments.set("price", "property_type", PairJudgment::favoring_a(5.0));
    judgments.set("price", "area_score", PairJudgment::favoring_a(7.0));
    judgments.set("size", "property_type", PairJudgment::favoring_a(2.0));
    judgments.set("size", "area_score", PairJudgment::favoring_a(4.0));
    judgments.set("property_type", "area_score", PairJudgment::favoring_a(2.0));
    judgments
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let order = CriteriaOrder::standard();
    let config = AppConfig::load()?.analysis;
    let gate = SubmissionGate::new(config.cr_threshold);

    println!("RentPro preference demo");

    println!("\nCyclic edit (area_score outranks price)");
    let mut cyclic = price_first_judgments();
    cyclic.set("price", "area_score", PairJudgment::favoring_b(7.0));
    let cyclic_input = PreferenceInput::from(cyclic);
    render_decision(
        &order,
        &gate.evaluate(&order, DEMO_PROFILE_NAME, &cyclic_input),
        config.cr_threshold,
    );

    println!("\nRevised judgments");
    let input = PreferenceInput::from(price_first_judgments());
    render_decision(
        &order,
        &gate.evaluate(&order, DEMO_PROFILE_NAME, &input),
        config.cr_threshold,
    );

    let catalog = match args.properties_csv {
        Some(path) => {
            println!("\nData source: property CSV ({})", path.display());
            InMemoryPropertyCatalog::new(PropertyCsvImporter::from_path(&path)?)
        }
        None => {
            println!("\nData source: sample listings");
            InMemoryPropertyCatalog::seeded()
        }
    };

    let user = UserId("demo-renter".to_string());
    let profiles = Arc::new(PreferenceProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        config,
    ));
    let submitted = submit_profile(&profiles, &user, gate, &order, &input)?;
    println!("Submitted {submitted} comparisons for '{DEMO_PROFILE_NAME}'");

    let recommendations = RecommendationService::new(profiles, Arc::new(catalog));

    println!("\nRecommendations");
    render_recommendations(recommendations.recommend(&user, None));

    println!("\nRecommendations with price boost {DEMO_PRICE_BOOST}");
    render_recommendations(recommendations.recommend(&user, Some(DEMO_PRICE_BOOST)));

    Ok(())
}

fn submit_profile(
    profiles: &Arc<PreferenceProfileService<InMemoryProfileRepository>>,
    user: &UserId,
    gate: SubmissionGate,
    order: &CriteriaOrder,
    input: &PreferenceInput,
) -> Result<usize, AppError> {
    let submitter = PreferenceSubmitter::new(
        Arc::new(ServiceAuthority::new(profiles.clone(), user.clone())),
        gate,
        order.clone(),
    );
    let receipt = submitter.submit(DEMO_PROFILE_NAME, input)?;
    Ok(receipt.comparisons.len())
}

fn render_recommendations(result: Result<RecommendationsResponse, RecommendationError>) {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            println!("  Recommendations unavailable: {err}");
            return;
        }
    };

    let meta = &response.meta;
    if let Some(message) = &meta.message {
        println!("  {message}");
    }
    println!(
        "  Ranked {} of {} available listings ({} missing area score)",
        meta.ranked_properties_count,
        meta.available_properties_total,
        meta.missing_area_score_count
    );
    let weights = meta
        .criteria_order
        .iter()
        .zip(&meta.effective_weights)
        .map(|(key, weight)| format!("{key}={weight:.3}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("  Effective weights: {weights}");

    for (rank, item) in response.items.iter().enumerate() {
        println!(
            "  {}. {} [{}] {:.0}/month, {:.0} m2, score {:.3}",
            rank + 1,
            item.property.title,
            item.property.property_type,
            item.property.price,
            item.property.size,
            item.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::parse_judgment;
    use rentpro::config::AnalysisConfig;
    use rentpro::preferences::{GateBlock, SubmissionError, CR_THRESHOLD};

    #[test]
    fn unknown_criteria_are_rejected() {
        let args = vec![parse_judgment("price:parking:A_OVER_B:3").expect("parsed")];
        assert!(matches!(
            collect_judgments(&args),
            Err(AppError::Input(message)) if message.contains("parking")
        ));
    }

    #[test]
    fn self_comparisons_are_rejected() {
        let args = vec![parse_judgment("size:size:A_OVER_B:3").expect("parsed")];
        assert!(collect_judgments(&args).is_err());
    }

    #[test]
    fn collected_judgments_feed_the_gate() {
        let args: Vec<JudgmentArg> = [
            "price:size:A_OVER_B:3",
            "price:property_type:A_OVER_B:5",
            "price:area_score:A_OVER_B:7",
            "size:property_type:A_OVER_B:2",
            "size:area_score:A_OVER_B:4",
            "property_type:area_score:A_OVER_B:2",
        ]
        .iter()
        .map(|raw| parse_judgment(raw).expect("parsed"))
        .collect();

        let order = CriteriaOrder::standard();
        let judgments = collect_judgments(&args).expect("valid judgments");
        assert!(judgments.is_complete(&order));

        let decision = SubmissionGate::new(CR_THRESHOLD).evaluate(
            &order,
            DEMO_PROFILE_NAME,
            &PreferenceInput::from(judgments),
        );
        assert!(decision.can_submit());
    }

    #[test]
    fn json_report_flattens_the_decision() {
        let order = CriteriaOrder::standard();
        let decision = SubmissionGate::new(CR_THRESHOLD).evaluate(
            &order,
            "",
            &PreferenceInput::from(PairwiseJudgments::new()),
        );
        let report = PreviewReport {
            criteria_order: order.keys(),
            threshold: CR_THRESHOLD,
            can_submit: decision.can_submit(),
            decision: &decision,
        };
        let value = serde_json::to_value(&report).expect("serializable");
        assert_eq!(value["can_submit"], false);
        assert!(value["preview"].is_null());
        assert_eq!(value["blocks"].as_array().map(Vec::len), Some(2));
        assert!(matches!(decision.blocks[0], GateBlock::EmptyProfileName));
    }

    #[test]
    fn explicit_thresholds_outside_unit_interval_are_rejected() {
        assert_eq!(resolve_threshold(Some(0.2)).expect("valid"), 0.2);
        for value in [0.0, -1.0, 1.5, f64::NAN] {
            assert!(matches!(resolve_threshold(Some(value)), Err(AppError::Config(_))));
        }
    }

    #[test]
    fn configured_threshold_is_used_when_none_is_given() {
        std::env::set_var("RENTPRO_CR_THRESHOLD", "0.05");
        let resolved = resolve_threshold(None);
        std::env::remove_var("RENTPRO_CR_THRESHOLD");
        assert_eq!(resolved.expect("config loads"), 0.05);
    }

    #[test]
    fn rejected_submission_is_an_error() {
        let strict = AnalysisConfig {
            cr_threshold: 0.005,
            ..AnalysisConfig::default()
        };
        let profiles = Arc::new(PreferenceProfileService::new(
            Arc::new(InMemoryProfileRepository::default()),
            strict,
        ));
        let order = CriteriaOrder::standard();
        let user = UserId("demo-renter".to_string());
        let input = PreferenceInput::from(price_first_judgments());

        let err = submit_profile(
            &profiles,
            &user,
            SubmissionGate::new(CR_THRESHOLD),
            &order,
            &input,
        )
        .expect_err("authority rejects");
        assert!(matches!(err, AppError::Submission(SubmissionError::Rejected(_))));

        let accepted = Arc::new(PreferenceProfileService::new(
            Arc::new(InMemoryProfileRepository::default()),
            AnalysisConfig::default(),
        ));
        let submitted = submit_profile(
            &accepted,
            &user,
            SubmissionGate::new(CR_THRESHOLD),
            &order,
            &input,
        )
        .expect("accepted");
        assert_eq!(submitted, 6);
    }
}
