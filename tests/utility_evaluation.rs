use serde_json::json;
use synthutil::config::{ClassifierTable, RunConfig};
use synthutil::evaluation::{Average, Metric};
use synthutil::report::{ArtifactSink, DIFF_FILE, JsonDirectorySink, OVERALL_DIFF_FILE};
use synthutil::tasks::{TrainingStage, UtilityEvaluator};
use synthutil::testing::dummies::{SeaTable, randomize_labels};
use synthutil::testing::stubs::SpySearch;
use synthutil::UtilityError;

const ROWS: usize = 1000;
const SEED: u64 = 42;

fn table(value: serde_json::Value) -> ClassifierTable {
    serde_json::from_value(value).unwrap()
}

fn config(classifiers: serde_json::Value) -> RunConfig {
    let mut cfg = RunConfig::new(SeaTable::input_columns(), "class", 0.2).with_classifiers(table(classifiers));
    cfg.random_seed = SEED;
    cfg.synth_method = "test".into();
    cfg
}

fn logistic_regression() -> serde_json::Value {
    json!({
        "lr": {
            "kind": "logistic-regression",
            "mode": "fixed",
            "params_main": {"max_iter": 500, "learning_rate": 0.5}
        }
    })
}

fn balanced_table() -> SeaTable {
    let mut t = SeaTable::new(ROWS, SEED);
    t.threshold = 10.0;
    t
}

#[test]
fn identical_data_has_zero_diff() {
    let data = balanced_table().generate();
    let cfg = config(logistic_regression());
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .run(data.clone(), data)
        .unwrap();

    let report = &outcome.report;
    assert_eq!(report.classifiers().len(), 1);
    for (_, _, value) in report.overall_diff().iter() {
        assert!(value.abs() <= 1e-6, "diff {value}");
    }
    let lr = report.classifier("lr").unwrap();
    assert_eq!(lr.trained_on_original, lr.trained_on_released);
    assert!(lr.trained_on_original.is_complete());
    assert!(outcome.diagnostics.failures.is_empty());
    assert_eq!(lr.confusion_original.total(), 200);
}

#[test]
fn randomized_released_labels_increase_accuracy_diff() {
    let original = balanced_table().generate();
    let mut released = original.clone();
    randomize_labels(&mut released, "class", &["groupA", "groupB"], 7);

    let cfg = config(logistic_regression());
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .run(original, released)
        .unwrap();
    let diff = outcome
        .report
        .overall_diff()
        .get(Metric::Accuracy, Average::Value)
        .unwrap();
    assert!(diff > 0.3, "accuracy diff {diff}");
}

#[test]
fn searched_mode_reuses_the_best_parameters() {
    let data = balanced_table().generate();
    let cfg = config(json!({
        "lr": {
            "kind": "LogisticRegression",
            "mode": "range",
            "params_main": {"learning_rate": 0.5},
            "params_range": {"classifier__max_iter": [5, 50]}
        }
    }));
    let spy = SpySearch::delegating(3);
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .with_search(Box::new(spy.clone()))
        .run(data.clone(), data)
        .unwrap();

    assert_eq!(spy.calls(), 1);
    assert_eq!(spy.searched(), vec!["lr"]);
    let lr = outcome.report.classifier("lr").unwrap();
    assert!(lr.search_score.is_some());
    assert_eq!(lr.parameters["learning_rate"], json!(0.5));
    assert!([json!(5), json!(50)].contains(&lr.parameters["max_iter"]));
}

#[test]
fn released_pass_uses_the_searched_parameters() {
    let data = balanced_table().generate();
    let cfg = config(json!({
        "knn": {
            "kind": "k-neighbors",
            "mode": "searched",
            "params_range": {"n_neighbors": [1, 3, 5]}
        }
    }));
    let mut chosen = serde_json::Map::new();
    chosen.insert("n_neighbors".into(), json!(3));
    let spy = SpySearch::returning(chosen);
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .with_search(Box::new(spy.clone()))
        .run(data.clone(), data)
        .unwrap();

    assert_eq!(spy.calls(), 1);
    let knn = outcome.report.classifier("knn").unwrap();
    assert_eq!(knn.parameters["n_neighbors"], json!(3));
    assert_eq!(knn.trained_on_original, knn.trained_on_released);
}

#[test]
fn failing_classifier_is_excluded_and_recorded() {
    let data = balanced_table().generate();
    let mut classifiers = logistic_regression();
    classifiers["huge-k"] = json!({"kind": "k-neighbors", "params_main": {"n_neighbors": 10000}});
    let cfg = config(classifiers);
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .run(data.clone(), data)
        .unwrap();

    let names: Vec<&str> = outcome.report.classifiers().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["lr"]);
    assert!(outcome.diagnostics.has_failed("huge-k"));
    assert_eq!(outcome.diagnostics.failures[0].stage, TrainingStage::Original);
}

#[test]
fn all_classifiers_failing_is_fatal() {
    let data = balanced_table().generate();
    let cfg = config(json!({"huge-k": {"kind": "k-neighbors", "params_main": {"n_neighbors": 10000}}}));
    let err = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .run(data.clone(), data)
        .unwrap_err();
    assert!(matches!(err, UtilityError::AllClassifiersFailed(1)));
}

#[test]
fn unknown_classifier_kind_is_rejected_before_training() {
    let cfg = config(json!({"svm": {"kind": "SVC"}}));
    assert!(matches!(
        UtilityEvaluator::new(&cfg, &SeaTable::metadata()),
        Err(UtilityError::Config(_))
    ));
}

#[test]
fn artifacts_round_trip_through_the_sink() {
    let data = balanced_table().generate();
    let cfg = config(logistic_regression());
    let outcome = UtilityEvaluator::new(&cfg, &SeaTable::metadata())
        .unwrap()
        .run(data.clone(), data)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    JsonDirectorySink::new(dir.path())
        .write(&outcome.report, &outcome.diagnostics)
        .unwrap();

    let read = |name: &str| -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(name)).unwrap()).unwrap()
    };
    let overall = read(OVERALL_DIFF_FILE);
    assert_eq!(overall["overall"]["accuracy"]["value"], json!(0.0));
    let per_classifier = read(DIFF_FILE);
    assert_eq!(per_classifier["lr"], overall["overall"]);
}
