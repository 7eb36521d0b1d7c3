use approx::assert_relative_eq;

use ferrite_classifier::{convert_labels, Error, Matrix, Network};

#[test]
fn saved_network_predicts_identically() {
    let x = Matrix::from_data(vec![
        vec![0.0, 0.2, 0.4],
        vec![0.9, 0.1, 0.3],
        vec![0.5, 0.5, 0.5],
    ]).unwrap();
    let y = convert_labels(&[0, 1, 2]).unwrap();

    let mut net = Network::with_seed(3, &[4], 3, 8).unwrap();
    net.set_alpha(0.5);
    net.set_lambda(0.1);
    net.train(&x, &y, 20).unwrap();

    let path = std::env::temp_dir().join("ferrite_classifier_network.json");
    net.save_json(&path).unwrap();
    let loaded = Network::load_json(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.sizes(), net.sizes());
    assert_relative_eq!(loaded.alpha(), net.alpha());
    assert_relative_eq!(loaded.lambda(), net.lambda());

    let before = net.predict(&x).unwrap();
    let after = loaded.predict(&x).unwrap();
    for (a, b) in before.data.iter().flatten().zip(after.data.iter().flatten()) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn tampered_sizes_are_rejected_on_load() {
    let net = Network::with_seed(2, &[2], 1, 0).unwrap();
    let mut json: serde_json::Value = serde_json::to_value(&net).unwrap();
    json["sizes"] = serde_json::json!([2, 5, 1]);

    let path = std::env::temp_dir().join("ferrite_classifier_tampered.json");
    std::fs::write(&path, json.to_string()).unwrap();
    let result = Network::load_json(&path);
    let _ = std::fs::remove_file(&path);

    assert!(result.is_err());
}

#[test]
fn weights_disagreeing_with_declared_shape_are_rejected_on_load() {
    let net = Network::with_seed(2, &[2], 1, 0).unwrap();
    let mut json: serde_json::Value = serde_json::to_value(&net).unwrap();
    // rows/cols still say 1x3, but the output layer has no weights left.
    json["theta"][1]["data"] = serde_json::json!([[]]);

    let path = std::env::temp_dir().join("ferrite_classifier_short_weights.json");
    std::fs::write(&path, json.to_string()).unwrap();
    let result = Network::load_json(&path);
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result, Err(Error::ShapeMismatch { op: "load_json", .. })));
}

#[test]
fn missing_weight_rows_are_rejected_on_load() {
    let net = Network::with_seed(3, &[2], 2, 0).unwrap();
    let mut json: serde_json::Value = serde_json::to_value(&net).unwrap();
    json["theta"][0]["data"].as_array_mut().unwrap().pop();

    let path = std::env::temp_dir().join("ferrite_classifier_missing_rows.json");
    std::fs::write(&path, json.to_string()).unwrap();
    let result = Network::load_json(&path);
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result, Err(Error::ShapeMismatch { op: "load_json", .. })));
}
