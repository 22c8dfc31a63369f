// Model construction and forward-pass behavior.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cinder_nn::{ActivationFunction, Layer, Matrix, Model, NetError};

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Replaces every dense layer's parameters with zeros.
fn zero_parameters(model: &mut Model) {
    for layer in model.layers.iter_mut() {
        if let Layer::Dense(dense) = layer {
            dense.weights = Matrix::zeros(dense.weights.rows, dense.weights.cols);
            dense.biases = vec![0.0; dense.size];
        }
    }
}

#[test]
fn construction_rejects_empty_layer_list() {
    assert!(matches!(
        Model::new(vec![], &mut rng()),
        Err(NetError::Config(_))
    ));
}

#[test]
fn construction_rejects_missing_input_layer() {
    let layers = vec![
        Layer::dense(2, ActivationFunction::Identity),
        Layer::softmax(),
    ];
    assert!(matches!(
        Model::new(layers, &mut rng()),
        Err(NetError::Config(_))
    ));
}

#[test]
fn construction_rejects_missing_softmax_tail() {
    let layers = vec![
        Layer::input(2),
        Layer::dense(2, ActivationFunction::Identity),
    ];
    assert!(matches!(
        Model::new(layers, &mut rng()),
        Err(NetError::Config(_))
    ));
}

#[test]
fn construction_rejects_non_identity_layer_before_softmax() {
    let layers = vec![
        Layer::input(2),
        Layer::dense(2, ActivationFunction::ReLU),
        Layer::softmax(),
    ];
    assert!(matches!(
        Model::new(layers, &mut rng()),
        Err(NetError::Config(_))
    ));
}

#[test]
fn construction_wires_sizes_through_the_chain() {
    let model = Model::new(
        vec![
            Layer::input(4),
            Layer::dense(3, ActivationFunction::ReLU),
            Layer::dense(2, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng(),
    )
    .unwrap();

    let shapes: Vec<(usize, usize)> = model
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::Dense(d) => Some((d.weights.rows, d.weights.cols)),
            _ => None,
        })
        .collect();
    assert_eq!(shapes, vec![(3, 4), (2, 3)]);
}

#[test]
fn evaluate_rejects_wrong_input_length() {
    let mut model = Model::new(
        vec![
            Layer::input(4),
            Layer::dense(2, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng(),
    )
    .unwrap();
    assert!(matches!(
        model.evaluate(&[1.0, 2.0]),
        Err(NetError::ShapeMismatch { .. })
    ));
}

#[test]
fn zeroed_identity_model_yields_uniform_probabilities() {
    let mut model = Model::new(
        vec![
            Layer::input(3),
            Layer::dense(5, ActivationFunction::Identity),
            Layer::dense(4, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng(),
    )
    .unwrap();
    zero_parameters(&mut model);

    let output = model.evaluate(&[0.7, -1.2, 3.5]).unwrap();
    assert_eq!(output.len(), 4);
    for p in output {
        assert_relative_eq!(p, 0.25, max_relative = 1e-6);
    }
}

#[test]
fn evaluate_overwrites_dense_caches() {
    let mut model = Model::new(
        vec![
            Layer::input(2),
            Layer::dense(2, ActivationFunction::Identity),
            Layer::softmax(),
        ],
        &mut rng(),
    )
    .unwrap();

    model.evaluate(&[1.0, 0.0]).unwrap();
    let first_z = match &model.layers[1] {
        Layer::Dense(d) => d.z.clone(),
        _ => unreachable!(),
    };
    model.evaluate(&[0.0, 1.0]).unwrap();
    let second_z = match &model.layers[1] {
        Layer::Dense(d) => d.z.clone(),
        _ => unreachable!(),
    };
    assert_ne!(first_z, second_z);
}
