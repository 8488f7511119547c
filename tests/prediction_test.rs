use colorseason::classifier::prediction::{rank_probabilities, TOP_K};
use colorseason::classifier::{LabelTable, Prediction};

fn labels(n: usize) -> LabelTable {
    LabelTable::from_labels((0..n).map(|i| format!("class-{}", i)).collect()).unwrap()
}

#[test]
fn test_top_k_has_length_five_sorted_descending() {
    let probs = [0.01, 0.3, 0.05, 0.2, 0.14, 0.1, 0.12, 0.08];
    let prediction = Prediction::from_probabilities(&probs, &labels(probs.len())).unwrap();

    assert_eq!(prediction.top_inds.len(), TOP_K);
    for pair in prediction.top_inds.windows(2) {
        assert!(pair[0].0 >= pair[1].0);
    }
}

#[test]
fn test_class_id_matches_head_of_top_k() {
    let probs = [0.1, 0.6, 0.3];
    let prediction = Prediction::from_probabilities(&probs, &labels(3)).unwrap();

    assert_eq!(prediction.class_id, 1);
    assert_eq!(prediction.class_label, "class-1");
    assert_eq!(prediction.top_inds[0].1, prediction.class_label);
    assert!((prediction.top_inds[0].0 - prediction.class_probability).abs() < 1e-6);
}

#[test]
fn test_equal_probabilities_order_by_lower_class_id() {
    let probs = [0.2, 0.2, 0.2, 0.2, 0.2];
    let ranked = rank_probabilities(&probs);
    let ids: Vec<usize> = ranked.iter().map(|&(id, _)| id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    let prediction = Prediction::from_probabilities(&probs, &labels(5)).unwrap();
    assert_eq!(prediction.class_id, 0);
}

#[test]
fn test_json_wire_contract() {
    let probs = [0.05, 0.1, 0.4, 0.2, 0.15, 0.1];
    let prediction = Prediction::from_probabilities(&probs, &labels(6)).unwrap();

    let json = serde_json::to_value(&prediction).unwrap();
    assert!(json.get("class_id").is_some());
    assert!(json.get("class_label").is_some());
    assert!(json.get("class_probability").is_some());
    let top = json.get("top_inds").unwrap().as_array().unwrap();
    assert_eq!(top.len(), TOP_K);
    assert_eq!(json["class_id"], 2);
}

#[test]
fn test_probability_vector_longer_than_labels_is_an_error() {
    let probs = [0.25, 0.25, 0.25, 0.25];
    assert!(Prediction::from_probabilities(&probs, &labels(3)).is_err());
}
